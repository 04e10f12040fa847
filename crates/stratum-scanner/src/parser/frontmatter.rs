//! YAML frontmatter parsing for markdown artifacts
//!
//! Commands, agents, and skills carry an optional YAML frontmatter
//! block. Scanning only needs the description for display; the body is
//! kept verbatim.

use gray_matter::engine::YAML;
use gray_matter::Matter;
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// The subset of frontmatter the scanner surfaces
#[derive(Debug, Deserialize)]
struct ArtifactFrontmatter {
    description: Option<String>,
}

/// Extract the `description` frontmatter field, if any.
///
/// Content without frontmatter, or with frontmatter that does not
/// deserialize, yields `None`; artifact content is never rejected for
/// display purposes.
#[must_use]
pub fn extract_description(content: &str) -> Option<String> {
    let matter = Matter::<YAML>::new();
    let parsed = matter.parse(content);

    parsed
        .data
        .and_then(|data| data.deserialize::<ArtifactFrontmatter>().ok())
        .and_then(|fm| fm.description)
}

/// SHA256 hash of artifact content, hex encoded
#[must_use]
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_description() {
        let content = r"---
description: Review the current diff
allowed-tools:
  - Read
---

Look at the diff and report issues.
";
        assert_eq!(
            extract_description(content),
            Some("Review the current diff".to_string())
        );
    }

    #[test]
    fn test_missing_frontmatter() {
        assert_eq!(extract_description("Just a body"), None);
    }

    #[test]
    fn test_frontmatter_without_description() {
        let content = "---\nmodel: opus\n---\n\nBody";
        assert_eq!(extract_description(content), None);
    }

    #[test]
    fn test_sha256_is_stable() {
        assert_eq!(sha256_hex("abc"), sha256_hex("abc"));
        assert_ne!(sha256_hex("abc"), sha256_hex("abd"));
    }
}
