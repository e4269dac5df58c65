//! Registry and configuration errors.
//!
//! The tab and visibility computations never fail; malformed inputs degrade
//! to defaults. Only building an endpoint registry from configuration can
//! be rejected.

use thiserror::Error;

/// Errors raised while building an endpoint registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("endpoint name must not be empty")]
    EmptyEndpointName,

    #[error("invalid endpoint name '{0}': only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidEndpointName(String),

    #[error("endpoint '{0}' is already registered")]
    DuplicateEndpoint(String),

    #[error("unknown endpoint mask '{0}'")]
    UnknownMask(String),
}

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;
