//! URL slug derivation
//!
//! Categories, brands and products carry a unique `slug` used in storefront
//! URLs. When a write does not provide one, it is derived from the name.
//!
//! # Rules
//!
//! - the name is NFKD-decomposed and folded to ASCII, so `é` becomes `e`
//!   and `™` becomes `TM`; characters with no ASCII decomposition are dropped
//! - ASCII letters are lower-cased, digits, `_` and `-` are kept
//! - runs of whitespace and hyphens collapse into a single `-`
//! - every other character (punctuation) is dropped
//! - leading and trailing `-` / `_` are trimmed
//!
//! # Example
//!
//! ```
//! use pcshop_shared::catalog::slug::slugify;
//!
//! assert_eq!(slugify("Gaming Laptops"), "gaming-laptops");
//! ```

use unicode_normalization::UnicodeNormalization;

/// Derives a slug from a human-readable name
///
/// May return an empty string (e.g. for a name written entirely in a
/// non-Latin script); callers on the write path treat that as a validation
/// failure.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.nfkd().filter(char::is_ascii) {
        if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
            continue;
        }

        let keep = if ch.is_ascii_alphanumeric() {
            Some(ch.to_ascii_lowercase())
        } else if ch == '_' {
            Some('_')
        } else {
            None
        };

        if let Some(c) = keep {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Returns the explicit slug if it is non-blank, otherwise derives one from `name`
pub fn slug_or_derive(explicit: Option<&str>, name: &str) -> String {
    match explicit.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => slugify(name),
    }
}

/// Checks that a slug only contains characters valid in a URL path segment
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
