use crate::error::Result;
use time::Duration;

#[cfg(feature = "cloudflare-kv")]
mod cloudflare_kv;
mod memory;

#[cfg(feature = "cloudflare-kv")]
pub use cloudflare_kv::CloudflareKvFailureStore;
pub use memory::InMemoryFailureStore;

/// Prefix of the keys failed attempts are counted under, followed by the client IP.
pub const FAILURE_KEY_PREFIX: &str = "swagger_auth_failed_";

pub fn failure_key(client_ip: &str) -> String {
    format!("{FAILURE_KEY_PREFIX}{client_ip}")
}

/// Trait for failed-authentication counter backends.
///
/// A counter is created by the first failure for a key and expires `ttl`
/// after the most recent failure. Once expired the key reads as absent, so
/// `failure_count` returns `0` again.
///
/// All methods are async and return Send futures, allowing them to be used
/// safely across thread boundaries in async contexts.
///
/// # Example Implementation
///
/// ```rust
/// use std::collections::HashMap;
/// use std::sync::Arc;
/// use tokio::sync::RwLock;
/// use time::{Duration, OffsetDateTime};
/// use axum_swagger_assets::error::Result;
/// use axum_swagger_assets::FailureStore;
///
/// struct SimpleFailureStore {
///     counters: Arc<RwLock<HashMap<String, (u32, OffsetDateTime)>>>,
/// }
///
/// impl FailureStore for SimpleFailureStore {
///     async fn failure_count(&self, key: &str) -> Result<u32> {
///         let counters = self.counters.read().await;
///         Ok(match counters.get(key) {
///             Some((count, expires_at)) if *expires_at > OffsetDateTime::now_utc() => *count,
///             _ => 0,
///         })
///     }
///
///     async fn record_failure(&self, key: &str, ttl: Duration) -> Result<u32> {
///         let now = OffsetDateTime::now_utc();
///         let mut counters = self.counters.write().await;
///         let count = match counters.get(key) {
///             Some((count, expires_at)) if *expires_at > now => count + 1,
///             _ => 1,
///         };
///         counters.insert(key.to_string(), (count, now + ttl));
///         Ok(count)
///     }
/// }
/// ```
pub trait FailureStore: Send + Sync {
    /// Current number of failures recorded for `key`, `0` when absent or expired
    fn failure_count(&self, key: &str) -> impl std::future::Future<Output = Result<u32>> + Send;

    /// Count one more failure for `key`, pushing its expiry to `ttl` from now.
    /// Returns the updated count.
    fn record_failure(
        &self,
        key: &str,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<u32>> + Send;
}
