//! Response cache shared between request controllers
//!
//! Controllers consult the cache for GET requests only. The cache is handed to
//! each controller explicitly, so tests and callers decide how widely it is
//! shared. Entries live as long as the cache itself; there is no expiry.

mod memory;

pub use memory::MemoryCache;

use serde::Serialize;
use serde_json::Value;

/// Storage for the last successful payload per request URL
pub trait ResponseCache<T>: Send + Sync {
    /// Returns the stored payload for `key`, if any
    fn get(&self, key: &str) -> Option<T>;

    /// Stores `value` under `key`, replacing any previous payload
    fn set(&self, key: &str, value: T);
}

/// Whether a JSON value counts as present
///
/// `null`, `false`, zero and the empty string are empty; arrays and objects
/// are present even when they have no elements.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether a payload may be written to or served from the cache
///
/// Empty payloads (see [`is_truthy`]) are skipped, so a `204 No Content` or a
/// literal `null` body is fetched again instead of being replayed forever.
/// Payloads that cannot be represented as JSON are not cached.
pub fn is_cacheable_payload<T: Serialize>(value: &T) -> bool {
    serde_json::to_value(value).map_or(false, |json| is_truthy(&json))
}
