//! Transient parse-result storage.
//!
//! A parse result lives between the "parse" step and the "generate
//! document" step of the two-step workflow, keyed by session, case and
//! user. Lookups are best-effort consistent: concurrent writes under the
//! same key are last-write-wins, by contract with the HTTP layer.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::ParseResult;
use crate::Result;

/// Builds the store key for one parse result.
///
/// One user parsing two cases, or two users parsing the same case, must
/// not collide, so all three identifiers go into the key.
pub fn parse_result_key(session_id: &str, case_id: &str, user_id: &str) -> String {
    format!("parse:{}:{}:{}", session_id, case_id, user_id)
}

/// Storage capability needed by the orchestrator; the core does not
/// depend on any particular backing technology.
#[async_trait]
pub trait ParseStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ParseResult>>;
    async fn put(&self, key: &str, value: ParseResult) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

struct StoreEntry {
    value: ParseResult,
    expires_at: Option<Instant>,
}

impl StoreEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| Instant::now() > exp).unwrap_or(false)
    }
}

/// Configuration for the in-memory store
#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
    /// TTL applied to every entry (None for no expiration)
    pub ttl: Option<Duration>,
    /// Maximum number of entries
    pub max_entries: usize,
    /// Interval for the expired-entry sweep task
    pub cleanup_interval: Option<Duration>,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            ttl: Some(Duration::from_secs(30 * 60)),
            max_entries: 1_000,
            cleanup_interval: Some(Duration::from_secs(60)),
        }
    }
}

/// In-memory `ParseStore` with TTL expiry.
#[derive(Clone)]
pub struct MemoryParseStore {
    entries: Arc<RwLock<HashMap<String, Arc<StoreEntry>>>>,
    config: MemoryStoreConfig,
}

impl MemoryParseStore {
    pub fn new(config: MemoryStoreConfig) -> Self {
        let store = Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            config,
        };

        if let Some(interval) = store.config.cleanup_interval {
            let entries = Arc::clone(&store.entries);
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(interval).await;
                    let mut entries = entries.write().await;
                    let before = entries.len();
                    entries.retain(|_, v| !v.is_expired());
                    let removed = before - entries.len();
                    if removed > 0 {
                        debug!("Parse store cleanup: removed {} expired entries", removed);
                    }
                }
            });
        }

        store
    }

    pub fn default_config() -> Self {
        Self::new(MemoryStoreConfig::default())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Evict one entry, preferring an expired one.
    fn evict_one(entries: &mut HashMap<String, Arc<StoreEntry>>) {
        let expired_key = entries
            .iter()
            .find(|(_, v)| v.is_expired())
            .map(|(k, _)| k.clone());

        let victim = expired_key.or_else(|| entries.keys().next().cloned());
        if let Some(key) = victim {
            entries.remove(&key);
        }
    }
}

#[async_trait]
impl ParseStore for MemoryParseStore {
    async fn get(&self, key: &str) -> Result<Option<ParseResult>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                debug!("Parse store hit: {}", key);
                Ok(Some(entry.value.clone()))
            }
            _ => {
                debug!("Parse store miss: {}", key);
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, value: ParseResult) -> Result<()> {
        let entry = Arc::new(StoreEntry {
            value,
            expires_at: self.config.ttl.map(|ttl| Instant::now() + ttl),
        });

        let mut entries = self.entries.write().await;
        if entries.len() >= self.config.max_entries && !entries.contains_key(key) {
            Self::evict_one(&mut entries);
        }
        entries.insert(key.to_string(), entry);
        debug!("Stored parse result under key: {}", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        debug!("Deleted parse result for key: {}", key);
        Ok(())
    }
}
