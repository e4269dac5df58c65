//! Slug normalization for tab values.
//!
//! Tab slugs are only ever compared in normalized form, so every value read
//! from block attributes or from the request path passes through
//! [`normalize_slug`] first.

/// Convert free text into a URL-safe slug.
///
/// Lowercases the input, turns every run of non-alphanumeric characters
/// into a single hyphen, and trims leading/trailing hyphens. Applying it to
/// an already-normalized slug returns the slug unchanged.
pub fn normalize_slug(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut prev_was_hyphen = true; // Start true to skip leading hyphens

    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_was_hyphen = false;
        } else if !prev_was_hyphen {
            result.push('-');
            prev_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    result
}

/// Compare two raw values by their normalized slugs.
pub fn slugs_match(a: &str, b: &str) -> bool {
    normalize_slug(a) == normalize_slug(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(normalize_slug("Shoes!!"), "shoes");
        assert_eq!(normalize_slug("Red Running Shoes"), "red-running-shoes");
        assert_eq!(normalize_slug("General"), "general");
    }

    #[test]
    fn collapses_runs_and_trims() {
        assert_eq!(normalize_slug("  --Hello,   World!--  "), "hello-world");
        assert_eq!(normalize_slug("a__b..c"), "a-b-c");
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        assert_eq!(normalize_slug("Crème brûlée"), "cr-me-br-l-e");
        assert_eq!(normalize_slug("日本"), "");
    }

    #[test]
    fn empty_and_symbol_only_input() {
        assert_eq!(normalize_slug(""), "");
        assert_eq!(normalize_slug("!!!"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "Shoes!!",
            "  --Hello,   World!--  ",
            "already-normal",
            "MiXeD_case 42",
            "Crème brûlée",
            "",
        ] {
            let once = normalize_slug(raw);
            assert_eq!(normalize_slug(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn slugs_match_ignores_case_and_punctuation() {
        assert!(slugs_match("General", "general"));
        assert!(slugs_match("new arrivals", "New-Arrivals!"));
        assert!(!slugs_match("general", "other"));
    }
}
