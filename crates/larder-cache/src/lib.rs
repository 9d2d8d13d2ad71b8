//! Disk-backed caching of HTTP responses.
//!
//! The flow a consuming client follows: derive a [`CacheKey`] from the
//! outgoing request, ask the [`ResponseCache`] for a fresh [`CacheRecord`],
//! and on a miss execute the request for real, feed the response headers to
//! [`compute_ttl_seconds`], and store the record when the TTL is positive.
//! Caching is always best-effort: a failed store or an unreadable entry
//! costs a network round-trip, never the response.

pub mod disk;
pub mod error;
pub mod expiry;
pub mod key;
pub mod record;
pub mod response_cache;

pub use disk::DiskStore;
pub use error::CacheError;
pub use expiry::compute_ttl_seconds;
pub use key::{CacheKey, Protocol};
pub use record::CacheRecord;
pub use response_cache::{CacheStats, ResponseCache};
