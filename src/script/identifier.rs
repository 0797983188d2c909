//! Cache identifiers for scripts
//!
//! A script's identifier is derived from its canonical path or URL and names
//! its folder in the cache. Deriving it twice from the same input always
//! gives the same result.

/// Marker that ends the identifying part of a path or URL
pub const SCRIPT_EXTENSION: &str = ".swift";

/// Character that replaces path separators and spaces
const SEPARATOR: char = '-';

/// Derive a cache-safe identifier from a path or URL.
///
/// Everything from the first `.swift` onwards is dropped, then every path
/// separator and space becomes `-`.
pub fn derive_identifier(path_or_url: &str) -> String {
    let stem = path_or_url
        .split(SCRIPT_EXTENSION)
        .next()
        .unwrap_or(path_or_url);

    stem.chars()
        .map(|c| match c {
            '/' | '\\' | ' ' => SEPARATOR,
            other => other,
        })
        .collect()
}

/// Human-readable name for an identifier: its last segment, title-cased.
pub fn display_name(identifier: &str) -> String {
    let segment = identifier.rsplit(SEPARATOR).next().unwrap_or(identifier);

    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
