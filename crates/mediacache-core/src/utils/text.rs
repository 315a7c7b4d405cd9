//! String helpers

use crate::error::{Error, Result};

/// Replace `length` characters starting at character `start` with `replacement`
///
/// Positions count Unicode scalar values, not bytes or UTF-16 code units.
/// Callers porting JavaScript string offsets get different positions only
/// for characters outside the Basic Multilingual Plane, which count once
/// here and twice in UTF-16. A range reaching past the end of `text` is
/// rejected.
///
/// # Example
///
/// ```rust
/// use mediacache_core::utils::replace_range;
///
/// let url = replace_range("seg-001.ts", (4, 3), "002").unwrap();
/// assert_eq!(url, "seg-002.ts");
/// ```
pub fn replace_range(text: &str, range: (usize, usize), replacement: &str) -> Result<String> {
    let (start, length) = range;
    let len = text.chars().count();
    let end = start
        .checked_add(length)
        .filter(|end| *end <= len)
        .ok_or_else(|| Error::invalid_range(start, length, len))?;

    let mut replaced = String::with_capacity(text.len() + replacement.len());
    replaced.extend(text.chars().take(start));
    replaced.push_str(replacement);
    replaced.extend(text.chars().skip(end));
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_middle() {
        assert_eq!(replace_range("hello world", (6, 5), "cache").unwrap(), "hello cache");
    }

    #[test]
    fn test_insert_and_delete() {
        assert_eq!(replace_range("abc", (1, 0), "X").unwrap(), "aXbc");
        assert_eq!(replace_range("abc", (0, 3), "").unwrap(), "");
        assert_eq!(replace_range("abc", (3, 0), "d").unwrap(), "abcd");
    }

    #[test]
    fn test_counts_characters() {
        assert_eq!(replace_range("日本語", (1, 1), "-").unwrap(), "日-語");
    }

    #[test]
    fn test_astral_characters_count_once() {
        // U+1F3AC is two UTF-16 code units but one position here
        assert_eq!(replace_range("\u{1F3AC}ab", (1, 1), "x").unwrap(), "\u{1F3AC}xb");
        assert!(replace_range("\u{1F3AC}", (0, 2), "").is_err());
    }

    #[test]
    fn test_range_past_end_rejected() {
        let err = replace_range("abc", (2, 2), "x").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRange {
                start: 2,
                length: 2,
                len: 3
            }
        ));
        assert!(replace_range("abc", (usize::MAX, 1), "x").is_err());
    }
}
