//! In-memory verification code cache

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use otp_core::{CodeCache, VerificationEntry};

/// Key prefix for login verification codes
pub const LOGIN_CODE_KEY_PREFIX: &str = "login_cell_phone_number:";

/// Time-bounded code store shared by all request workers
///
/// Each identity maps to at most one entry; `put` replaces unconditionally.
/// Readers never observe an expired entry even if the sweeper has not run.
pub struct InMemoryCodeCache {
    key_prefix: String,
    entries: RwLock<HashMap<String, VerificationEntry>>,
}

impl InMemoryCodeCache {
    pub fn new() -> Self {
        Self::with_key_prefix(LOGIN_CODE_KEY_PREFIX)
    }

    pub fn with_key_prefix(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn key(&self, identity: &str) -> String {
        format!("{}{}", self.key_prefix, identity)
    }

    /// Number of stored entries, expired ones included until swept
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Evict every expired entry, returning how many were removed
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    /// Run [`sweep`](Self::sweep) every `interval` until the cache is dropped
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(live) = cache.upgrade() else {
                    break;
                };
                let removed = live.sweep().await;
                if removed > 0 {
                    debug!(removed, "Swept expired verification codes");
                }
            }
        })
    }
}

impl Default for InMemoryCodeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeCache for InMemoryCodeCache {
    async fn put(&self, identity: &str, code: &str, ttl: Duration) {
        let entry = VerificationEntry::new(identity, code, ttl);
        self.entries.write().await.insert(self.key(identity), entry);
    }

    async fn get(&self, identity: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(&self.key(identity))
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.code.clone())
    }
}
