//! Byte buffer helpers

use crate::error::Result;

/// Concatenate two buffers into a new one, `first` followed by `second`
pub fn concat_buffers(first: &[u8], second: &[u8]) -> Vec<u8> {
    let mut merged = Vec::with_capacity(first.len() + second.len());
    merged.extend_from_slice(first);
    merged.extend_from_slice(second);
    merged
}

/// Byte-wise equality of two buffers
pub fn buffers_equal(a: &[u8], b: &[u8]) -> bool {
    a == b
}

/// Decode a buffer as UTF-8
///
/// Invalid sequences are an error rather than being replaced.
pub fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Encode text as UTF-8 bytes
pub fn string_to_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Clamp `value` into `[lower, upper]`
///
/// Unlike `Ord::clamp` this never panics: with inverted bounds `upper` wins.
pub fn clamp<T: PartialOrd>(value: T, lower: T, upper: T) -> T {
    let raised = if value < lower { lower } else { value };
    if raised > upper {
        upper
    } else {
        raised
    }
}
