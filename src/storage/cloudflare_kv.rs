use crate::error::{Result, SwaggerError};

use crate::storage::FailureStore;
use std::future::Future;
use std::pin::Pin;
use time::Duration;
use worker::kv::KvStore;

/// Cloudflare rejects `expiration_ttl` values below one minute.
const MIN_KV_TTL_SECONDS: u64 = 60;

/// Failure counter storage using Cloudflare Workers KV.
///
/// Each counter is stored as its decimal text under the failure key and
/// expired by KV itself through `expiration_ttl`, so no cleanup is needed.
///
/// # Key Structure
/// - Failure counters: `swagger_auth_failed_{ip}` -> `"3"`
///
/// # Example Usage
///
/// ```rust,no_run
/// use worker::kv::KvStore;
/// use axum_swagger_assets::storage::CloudflareKvFailureStore;
/// # use worker::{Env, Result};
///
/// // In your Cloudflare Worker
/// # fn example(env: Env) -> Result<()> {
/// let kv = env.kv("SWAGGER_AUTH")?;
/// let store = CloudflareKvFailureStore::new(kv);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CloudflareKvFailureStore {
    kv: KvStore,
}

impl CloudflareKvFailureStore {
    /// Create a new CloudflareKvFailureStore instance.
    ///
    /// # Arguments
    /// * `kv` - The Cloudflare KV namespace to keep counters in
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    async fn read_count(&self, key: &str) -> Result<u32> {
        match self.kv.get(key).text().await {
            Ok(Some(data)) => data.trim().parse::<u32>().map_err(|e| {
                SwaggerError::StorageError(format!("Malformed failure counter: {}", e))
            }),
            Ok(None) => Ok(0),
            Err(e) => Err(SwaggerError::StorageError(format!("KV get error: {:?}", e))),
        }
    }

    async fn write_count(&self, key: &str, count: u32, ttl: Duration) -> Result<()> {
        let ttl_seconds = u64::try_from(ttl.whole_seconds())
            .unwrap_or(0)
            .max(MIN_KV_TTL_SECONDS);

        self.kv
            .put(key, count.to_string())
            .map_err(|e| SwaggerError::StorageError(format!("KV put error: {:?}", e)))?
            .expiration_ttl(ttl_seconds)
            .execute()
            .await
            .map_err(|e| SwaggerError::StorageError(format!("KV execute error: {:?}", e)))?;

        Ok(())
    }
}

impl FailureStore for CloudflareKvFailureStore {
    fn failure_count(&self, key: &str) -> impl Future<Output = Result<u32>> + Send {
        let store = self.clone();
        let key = key.to_string();
        let fut = async move { store.read_count(&key).await };

        // SAFETY: Cloudflare Workers run in a single-threaded environment, the
        // future is never polled from another thread.
        unsafe { SendWrapper::new(fut) }
    }

    fn record_failure(&self, key: &str, ttl: Duration) -> impl Future<Output = Result<u32>> + Send {
        let store = self.clone();
        let key = key.to_string();
        let fut = async move {
            // KV has no atomic increment; concurrent failures may collapse into one.
            let count = store.read_count(&key).await?.saturating_add(1);
            store.write_count(&key, count, ttl).await?;
            Ok::<u32, SwaggerError>(count)
        };

        // SAFETY: Same as above
        unsafe { SendWrapper::new(fut) }
    }
}

/// A wrapper to make non-Send futures appear as Send in single-threaded environments
///
/// # Safety
/// This is only safe to use in single-threaded environments like Cloudflare Workers
/// where futures won't actually be sent across threads despite the Send bound requirement.
struct SendWrapper<T>(T);

impl<T> SendWrapper<T> {
    unsafe fn new(inner: T) -> Self {
        Self(inner)
    }
}

unsafe impl<T> Send for SendWrapper<T> {}

impl<T: Future> Future for SendWrapper<T> {
    type Output = T::Output;

    fn poll(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        // SAFETY: We're just forwarding the poll call
        let inner = unsafe { self.map_unchecked_mut(|s| &mut s.0) };
        inner.poll(cx)
    }
}
