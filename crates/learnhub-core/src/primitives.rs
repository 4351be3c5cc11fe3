//! # Input Limits
//!
//! Fixed bounds applied by the insert schemas. They keep a single request
//! from parking arbitrarily large strings in memory.

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length, in characters, of short text fields.
///
/// Covers slugs, titles, categories, language tags, links and user fields.
pub const MAX_SHORT_TEXT_LENGTH: usize = 512;

/// Maximum length, in characters, of long text fields.
///
/// Covers theory markdown, source code, setups, abstracts and descriptions.
pub const MAX_LONG_TEXT_LENGTH: usize = 1_048_576;

/// Maximum number of concept tags on one paper.
pub const MAX_TAGS: usize = 64;

/// Whether `value` consists only of RFC 3986 unreserved characters.
///
/// Such a string can be placed in a URL path segment without escaping.
#[must_use]
pub fn is_url_safe(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
}
