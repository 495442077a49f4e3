use sha2::{Sha256, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Lowercase hex, the form stored in blocks.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Anything with a canonical SHA-256 digest.
pub trait Hashable {
    fn hash(&self) -> Hash256;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash256() {
        let hash1 = Hash256::hash(b"hello world");
        let hash2 = Hash256::hash(b"hello world");

        assert_eq!(hash1, hash2);
        assert_eq!(
            hash1.to_hex(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(hash1.to_string(), hash1.to_hex());
        assert_ne!(hash1, Hash256::hash(b"hello world!"));
    }
}
