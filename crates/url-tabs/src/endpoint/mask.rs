//! Page-type masks controlling where an endpoint applies.
//!
//! Bit values match the host platform's rewrite endpoint constants so a
//! mask round-trips unchanged through the editor snapshot.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

bitflags! {
    /// Set of page types an endpoint is registered for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EndpointMask: u32 {
        const PERMALINK = 1;
        const ATTACHMENT = 1 << 1;
        const DATE = 1 << 2;
        const YEAR = 1 << 3;
        const MONTH = 1 << 4;
        const DAY = 1 << 5;
        const ROOT = 1 << 6;
        const COMMENTS = 1 << 7;
        const SEARCH = 1 << 8;
        const CATEGORIES = 1 << 9;
        const TAGS = 1 << 10;
        const AUTHORS = 1 << 11;
        const PAGES = 1 << 12;
        const ALL_ARCHIVES = Self::DATE.bits()
            | Self::YEAR.bits()
            | Self::MONTH.bits()
            | Self::DAY.bits()
            | Self::CATEGORIES.bits()
            | Self::TAGS.bits()
            | Self::AUTHORS.bits();
        const ALL = 8191;
    }
}

impl Default for EndpointMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl EndpointMask {
    /// Registered for no page type.
    pub const NONE: Self = Self::empty();

    /// Look up a single mask token such as `categories` or `EP_PAGES`.
    fn from_token(token: &str) -> Option<Self> {
        let lower = token.trim().to_ascii_lowercase();
        let name = lower.strip_prefix("ep_").unwrap_or(&lower);
        let mask = match name {
            "none" => Self::NONE,
            "permalink" => Self::PERMALINK,
            "attachment" => Self::ATTACHMENT,
            "date" => Self::DATE,
            "year" => Self::YEAR,
            "month" => Self::MONTH,
            "day" => Self::DAY,
            "root" => Self::ROOT,
            "comments" => Self::COMMENTS,
            "search" => Self::SEARCH,
            "categories" => Self::CATEGORIES,
            "tags" => Self::TAGS,
            "authors" => Self::AUTHORS,
            "pages" => Self::PAGES,
            "all_archives" | "all-archives" => Self::ALL_ARCHIVES,
            "all" => Self::ALL,
            other => return other.parse::<u32>().ok().map(Self::from_bits_truncate),
        };
        Some(mask)
    }
}

impl FromStr for EndpointMask {
    type Err = Error;

    /// Parse a `|`-separated list of mask tokens, e.g. `pages|categories`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('|')
            .filter(|token| !token.trim().is_empty())
            .try_fold(Self::empty(), |acc, token| {
                Self::from_token(token)
                    .map(|mask| acc | mask)
                    .ok_or_else(|| Error::UnknownMask(token.trim().to_string()))
            })
    }
}

impl fmt::Display for EndpointMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl Serialize for EndpointMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for EndpointMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
