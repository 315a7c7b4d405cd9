//! Helper functions for the media cache
//!
//! Pure, side-effect-free helpers used around the cache: cache-key hashing,
//! byte buffer and string manipulation, and key-value record conversion.

pub mod bytes;
pub mod hash;
pub mod record;
pub mod text;

pub use bytes::{buffers_equal, bytes_to_string, clamp, concat_buffers, string_to_bytes};
pub use hash::{cache_key, sha256_hex};
pub use record::{map_to_record, modify_record, object_to_record, record_to_map, Record};
pub use text::replace_range;
