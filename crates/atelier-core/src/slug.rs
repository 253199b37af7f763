//! Published-URL slug validation.
//!
//! Validation is client-side only; an invalid slug is rejected before any
//! request is made.

use crate::error::{EditorError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum slug length.
pub const MIN_SLUG_LEN: usize = 3;
/// Maximum slug length.
pub const MAX_SLUG_LEN: usize = 50;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-z0-9-]+$").expect("slug pattern is valid"));

/// Validates a slug for publishing.
///
/// A slug must be non-empty, between [`MIN_SLUG_LEN`] and [`MAX_SLUG_LEN`]
/// characters, and composed only of lowercase letters, digits and hyphens.
///
/// # Errors
///
/// Returns [`EditorError::SlugValidation`] describing the first violation.
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(EditorError::slug_validation("The address cannot be empty."));
    }
    if slug.len() < MIN_SLUG_LEN {
        return Err(EditorError::slug_validation(format!(
            "The address must be at least {MIN_SLUG_LEN} characters long."
        )));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(EditorError::slug_validation(format!(
            "The address must be at most {MAX_SLUG_LEN} characters long."
        )));
    }
    if !SLUG_PATTERN.is_match(slug) {
        return Err(EditorError::slug_validation(
            "The address may only contain lowercase letters, digits and hyphens.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_well_formed_slug() {
        assert!(validate_slug("my-page-2").is_ok());
        assert!(validate_slug("abc").is_ok());
        assert!(validate_slug(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn rejects_too_short_slugs() {
        assert!(matches!(
            validate_slug("ab"),
            Err(EditorError::SlugValidation(_))
        ));
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn rejects_too_long_slugs() {
        assert!(validate_slug(&"a".repeat(51)).is_err());
    }

    #[test]
    fn rejects_uppercase_spaces_and_punctuation() {
        assert!(validate_slug("My Page!").is_err());
        assert!(validate_slug("my_page").is_err());
        assert!(validate_slug("caf\u{e9}-page").is_err());
    }
}
