//! Session-scoped key/value storage.
//!
//! A session is the lifetime of one store instance. Values live until they
//! are removed, the store is dropped, or (optionally) they go unread for
//! longer than the configured idle period.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

/// Key/value storage bounded to one session.
pub trait SessionStore: Send + Sync + 'static {
    /// Read a value.
    fn get(&self, key: &str) -> impl Future<Output = Option<Arc<str>>> + Send;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: Arc<str>) -> impl Future<Output = ()> + Send;

    /// Remove a value if present.
    fn remove(&self, key: &str) -> impl Future<Output = ()> + Send;
}

/// Configuration for [`MokaSessionStore`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Drop entries not read for this long. `None` keeps them for the
    /// life of the store.
    pub idle_timeout: Option<Duration>,

    /// Maximum number of keys.
    pub max_capacity: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: None,
            max_capacity: 64,
        }
    }
}

/// In-memory session store backed by a moka cache.
#[derive(Clone)]
pub struct MokaSessionStore {
    entries: MokaCache<String, Arc<str>>,
}

impl MokaSessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        let mut builder = MokaCache::builder().max_capacity(config.max_capacity);
        if let Some(idle) = config.idle_timeout {
            builder = builder.time_to_idle(idle);
        }

        Self {
            entries: builder.build(),
        }
    }
}

impl Default for MokaSessionStore {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl SessionStore for MokaSessionStore {
    async fn get(&self, key: &str) -> Option<Arc<str>> {
        self.entries.get(key).await
    }

    async fn set(&self, key: &str, value: Arc<str>) {
        self.entries.insert(key.to_string(), value).await;
    }

    async fn remove(&self, key: &str) {
        self.entries.invalidate(key).await;
    }
}
