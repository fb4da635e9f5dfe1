//! Stable short identifiers for navigation items.

use sha2::{Digest, Sha256};

/// Eight hex characters derived from `value`.
///
/// Identical input always yields the same id, so ids survive rebuilds and
/// can be used as HTML element ids.
#[must_use]
pub fn short_id(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(&digest[..4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_is_stable() {
        assert_eq!(short_id("setup/install.md"), short_id("setup/install.md"));
        assert_eq!(short_id("setup/install.md").len(), 8);
    }

    #[test]
    fn test_short_id_differs() {
        assert_ne!(short_id("a.md"), short_id("b.md"));
    }

    #[test]
    fn test_short_id_known_value() {
        // sha256("") = e3b0c442...
        assert_eq!(short_id(""), "e3b0c442");
    }
}
