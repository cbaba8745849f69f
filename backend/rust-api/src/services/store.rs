//! Key-value state store used to persist selection state between requests.
//!
//! Values are JSON strings. The store offers no transactions: a
//! read-modify-write sequence from two concurrent requests may lose an update.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::metrics::track_store_operation;

pub const COUNTER_KEY: &str = "counter";
pub const TODAY_PUZZLES_KEY: &str = "today_puzzles";
pub const EMAIL_LOGS_KEY: &str = "email_logs";

#[async_trait]
pub trait StateStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Reads `key`, falling back to `default` when nothing is stored.
pub async fn get_or<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: &str,
    default: T,
) -> Result<T, StoreError> {
    Ok(get_json(store, key).await?.unwrap_or(default))
}

pub async fn get_json<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

pub async fn set_json<T: Serialize + ?Sized>(
    store: &dyn StateStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })?;
    store.set(key, raw).await
}

pub struct RedisStore {
    redis: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    pub fn new(redis: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            redis,
            key_prefix: key_prefix.into(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl StateStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.redis.clone();
        let full_key = self.full_key(key);

        track_store_operation("get", async {
            redis::cmd("GET")
                .arg(&full_key)
                .query_async::<Option<String>>(&mut conn)
                .await
                .map_err(StoreError::from)
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut conn = self.redis.clone();
        let full_key = self.full_key(key);

        track_store_operation("set", async {
            redis::cmd("SET")
                .arg(&full_key)
                .arg(value)
                .query_async::<()>(&mut conn)
                .await
                .map_err(StoreError::from)
        })
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.redis.clone();
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

/// Process-local store for tests and single-instance runs. Nothing survives a
/// restart.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        track_store_operation("get", async {
            Ok::<_, StoreError>(self.entries.read().await.get(key).cloned())
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        track_store_operation("set", async {
            self.entries.write().await.insert(key.to_string(), value);
            Ok::<_, StoreError>(())
        })
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
