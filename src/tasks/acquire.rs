use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::cache::token_cache::TokenCache;
use crate::error::TaskError;
use crate::provider::oauth2::OAuth2Provider;

/// "Get a fresh token and place it in the cache" as a unit of work.
///
/// Re-running simply replaces the cached credential; there is no state to
/// accumulate. Refresh is triggered per invocation — expiry enforcement is
/// delegated entirely to the cache's TTL, not to a renewal loop.
#[derive(Debug, Clone)]
pub struct AcquireTask {
    provider: OAuth2Provider,
    cache: TokenCache,
    key: String,
}

impl AcquireTask {
    pub fn new(provider: OAuth2Provider, cache: TokenCache, key: impl Into<String>) -> Self {
        Self {
            provider,
            cache,
            key: key.into(),
        }
    }

    /// Acquire inline; the caller blocks until the exchange completes.
    pub async fn run(&self) -> Result<(), TaskError> {
        let token = self.provider.acquire().await?;
        self.cache.put(&self.key, token).await;
        info!("token stored under '{}'", self.key);
        Ok(())
    }

    /// Dispatch the acquisition to run independently and wait up to `wait`
    /// for it to finish. On timeout the task is aborted and the caller gets
    /// `TaskError::Timeout`; the cache is either fully updated or untouched
    /// (the underlying put is atomic), so dependent work must stop rather
    /// than assume a token is present.
    pub async fn run_detached(&self, wait: Duration) -> Result<(), TaskError> {
        let task = self.clone();
        let mut handle = tokio::spawn(async move { task.run().await });

        match timeout(wait, &mut handle).await {
            Ok(joined) => joined?,
            Err(_) => {
                warn!("token acquisition exceeded {:?}, aborting", wait);
                handle.abort();
                Err(TaskError::Timeout(wait.as_secs()))
            }
        }
    }
}
