use std::io::Read;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Default chunk size used when streaming document bytes through the digest.
pub const HASH_CHUNK_SIZE: usize = 8192;

/// SHA-256 digest of a document's raw bytes. Byte-identical uploads always
/// map to the same hash, which keys the clause cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn new(hash: String) -> Result<Self, String> {
        if hash.len() != 64 {
            return Err("Hash must be 64 characters long (SHA-256)".to_string());
        }

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("Hash must contain only hexadecimal characters".to_string());
        }

        Ok(Self(hash.to_lowercase()))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Stream a reader through the digest in fixed-size chunks. The digest is
    /// independent of the chunk size used to feed it.
    pub fn from_reader<R: Read>(reader: &mut R, chunk_size: usize) -> Result<Self, std::io::Error> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; chunk_size.max(1)];

        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(Self(format!("{:x}", hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &ContentHash) -> bool {
        self.0 == other.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_valid_hash() {
        let hash_str = "a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3";
        let hash = ContentHash::new(hash_str.to_string()).unwrap();
        assert_eq!(hash.as_str(), hash_str);
    }

    #[test]
    fn test_invalid_hash_length() {
        let result = ContentHash::new("invalid".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_hash_characters() {
        let hash_str = "g665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3";
        let result = ContentHash::new(hash_str.to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_identical_bytes_identical_hash() {
        let hash1 = ContentHash::from_bytes(b"termination clause");
        let hash2 = ContentHash::from_bytes(b"termination clause");
        let hash3 = ContentHash::from_bytes(b"payment clause");

        assert!(hash1.matches(&hash2));
        assert!(!hash1.matches(&hash3));
    }

    #[test]
    fn test_chunk_size_independence() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

        let one_byte =
            ContentHash::from_reader(&mut Cursor::new(&data), 1).expect("1-byte chunks");
        let full_chunks = ContentHash::from_reader(&mut Cursor::new(&data), HASH_CHUNK_SIZE)
            .expect("8192-byte chunks");
        let whole = ContentHash::from_bytes(&data);

        assert_eq!(one_byte, full_chunks);
        assert_eq!(one_byte, whole);
    }

    #[test]
    fn test_empty_reader() {
        let hash = ContentHash::from_reader(&mut Cursor::new(Vec::new()), HASH_CHUNK_SIZE)
            .expect("empty reader");
        assert_eq!(hash, ContentHash::from_bytes(b""));
    }
}
