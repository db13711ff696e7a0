//! Response caching
//!
//! The binder consults a [`Cache`] only for idempotent reads (GET descriptors
//! that permit caching). Keys are the canonical form of (endpoint identity,
//! normalized arguments). Eviction policy belongs to the cache, not the
//! binder: [`MemoryCache`] applies a TTL plus a capacity bound.
//!
//! A miss-then-store is not atomic across the process; concurrent callers
//! missing on the same key may both fetch. That is acceptable — there is no
//! exactly-once guarantee on cache population.

use crate::decode::Decoded;
use crate::descriptor::EndpointDescriptor;
use crate::request::CallArgs;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Build the canonical cache key for a call
pub fn cache_key(descriptor: &EndpointDescriptor, args: &CallArgs) -> String {
    format!("{}?{}", descriptor.name, args.canonical())
}

/// Keyed store of decoded responses
#[async_trait]
pub trait Cache: Send + Sync {
    /// Look up a cached value
    async fn get(&self, key: &str) -> Option<Decoded>;

    /// Store a decoded value
    async fn put(&self, key: &str, value: Decoded);
}

struct CacheEntry {
    value: Decoded,
    stored_at: Instant,
}

/// In-memory cache with TTL and capacity eviction
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl MemoryCache {
    /// Create a cache with the given entry TTL and capacity bound
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop all entries
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), 1024)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Decoded> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    async fn put(&self, key: &str, value: Decoded) {
        let mut entries = self.entries.write().await;
        if entries.len() >= self.capacity && !entries.contains_key(key) {
            // Evict expired entries first; if none expired, drop the oldest.
            let expired: Vec<String> = entries
                .iter()
                .filter(|(_, e)| e.stored_at.elapsed() > self.ttl)
                .map(|(k, _)| k.clone())
                .collect();
            if expired.is_empty() {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, e)| e.stored_at)
                    .map(|(k, _)| k.clone());
                if let Some(key) = oldest {
                    entries.remove(&key);
                }
            } else {
                for key in expired {
                    entries.remove(&key);
                }
            }
        }
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
