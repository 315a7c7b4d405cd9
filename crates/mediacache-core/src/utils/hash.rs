//! Content hashing for cache keys

use sha2::{Digest, Sha256};

/// Number of digest bytes kept in a cache key
pub const CACHE_KEY_BYTES: usize = 16;

/// Calculate the lowercase hex SHA256 digest of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Derive the cache key for a resource URL
///
/// The key is the first 16 bytes of the SHA256 digest of the URL's UTF-8
/// bytes, as 32 lowercase hex characters.
pub fn cache_key(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    digest[..CACHE_KEY_BYTES]
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vectors() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_cache_key_is_digest_prefix() {
        let key = cache_key("abc");
        assert_eq!(key, "ba7816bf8f01cfea414140de5dae2223");
        assert_eq!(key.len(), CACHE_KEY_BYTES * 2);
        assert!(sha256_hex(b"abc").starts_with(&key));
    }

    #[test]
    fn test_cache_key_distinguishes_urls() {
        let a = cache_key("https://cdn.example.com/seg-1.ts");
        let b = cache_key("https://cdn.example.com/seg-2.ts");
        assert_ne!(a, b);
        assert_eq!(a, cache_key("https://cdn.example.com/seg-1.ts"));
    }
}
