use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::token::Token;

/// In-process token cache: key -> credential, with per-key expiry.
///
/// One live credential per key; `put` overwrites. Expired entries are
/// invisible to `get` (no caller ever sees a stale credential), so expiry
/// enforcement lives entirely here rather than in a renewal loop.
///
/// The cache is injected where needed; cloning shares the same underlying
/// store.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<String, Token>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace the credential stored under `key`.
    pub async fn put(&self, key: &str, token: Token) {
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), token);
    }

    /// Get the credential for `key` if it exists and is not expired.
    /// Never blocks waiting for a fresh credential.
    pub async fn get(&self, key: &str) -> Option<Token> {
        let map = self.inner.read().await;
        map.get(key).cloned().filter(|t| !t.is_expired())
    }

    /// Number of live (unexpired) entries.
    pub async fn live_entries(&self) -> usize {
        let map = self.inner.read().await;
        map.values().filter(|t| !t.is_expired()).count()
    }
}
