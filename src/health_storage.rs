use crate::error::StoreError;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Write side of the shared status cache. Nothing in this crate reads it back.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn set_module_status(&self, module: &str, healthy: bool) -> Result<(), StoreError>;
}

pub struct RedisStatusStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisStatusStore {
    pub fn new(redis_url: &str, key_prefix: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            key_prefix: key_prefix.to_string(),
        })
    }

    pub fn key(&self, module: &str) -> String {
        format!("{}{module}", self.key_prefix)
    }
}

#[async_trait]
impl StatusStore for RedisStatusStore {
    async fn set_module_status(&self, module: &str, healthy: bool) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_tokio_connection().await?;

        // plain SET, no expiry
        let _: () = conn.set(self.key(module), healthy).await?;
        Ok(())
    }
}

/// In-memory store that records every write. Can be switched into a failing mode
/// to stand in for an unreachable Redis.
#[derive(Clone, Default)]
pub struct MockStatusStore {
    statuses: Arc<Mutex<HashMap<String, bool>>>,
    writes: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl MockStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        let store = Self::new();
        store.set_unavailable(true);
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn get(&self, module: &str) -> Option<bool> {
        self.statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(module)
            .copied()
    }

    pub fn snapshot(&self) -> HashMap<String, bool> {
        self.statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusStore for MockStatusStore {
    async fn set_module_status(&self, module: &str, healthy: bool) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }

        self.statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(module.to_string(), healthy);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
