//! Checksum utilities for generated schema fingerprints

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 fingerprint of a rendered schema document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum of rendered text, exactly as it is written to disk
    pub fn of_text(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for progress output
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, content: &str) -> bool {
        *self == Self::of_text(content)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = "{\n  \"title\": \"Unit\"\n}\n";
        assert_eq!(Checksum::of_text(content), Checksum::of_text(content));
    }

    #[test]
    fn test_checksum_sensitive_to_whitespace() {
        let pretty = "{\n  \"a\": 1\n}\n";
        let compact = "{\"a\":1}";
        assert_ne!(Checksum::of_text(pretty), Checksum::of_text(compact));
    }

    #[test]
    fn test_checksum_verification() {
        let content = r#"{"title": "VectorData"}"#;
        let checksum = Checksum::of_text(content);
        assert!(checksum.verify(content));
        assert!(!checksum.verify("different content"));
        assert_eq!(checksum.short().len(), 12);
        assert!(checksum.to_string().starts_with("sha256:"));
    }
}
