use crate::error::NarrativeError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A generated narrative as stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedNarrative {
    pub cache_key: String,
    /// Page summary kind (`summary_*`) or block id.
    pub kind: String,
    pub tone: String,
    pub narrative: String,
    pub model: String,
    pub context_hash: String,
}

/// Persistence for generated narratives, keyed by cache key.
///
/// `put` must be an upsert: concurrent identical requests may both miss and
/// both write.
#[async_trait]
pub trait NarrativeStore: Send + Sync {
    async fn get(&self, cache_key: &str) -> Result<Option<CachedNarrative>, NarrativeError>;

    async fn put(&self, entry: &CachedNarrative) -> Result<(), NarrativeError>;

    /// Removes every entry and returns how many there were.
    async fn clear(&self) -> Result<u64, NarrativeError>;
}

/// An in-process store for running without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CachedNarrative>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl NarrativeStore for MemoryStore {
    async fn get(&self, cache_key: &str) -> Result<Option<CachedNarrative>, NarrativeError> {
        Ok(self.entries.read().await.get(cache_key).cloned())
    }

    async fn put(&self, entry: &CachedNarrative) -> Result<(), NarrativeError> {
        self.entries
            .write()
            .await
            .insert(entry.cache_key.clone(), entry.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<u64, NarrativeError> {
        let mut entries = self.entries.write().await;
        let count = entries.len() as u64;
        entries.clear();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, text: &str) -> CachedNarrative {
        CachedNarrative {
            cache_key: key.to_string(),
            kind: "rivalries".to_string(),
            tone: "commissioner".to_string(),
            narrative: text.to_string(),
            model: "Test Model".to_string(),
            context_hash: "0123456789abcdef".to_string(),
        }
    }

    #[tokio::test]
    async fn put_overwrites_and_clear_counts() {
        let store = MemoryStore::new();
        store.put(&entry("a", "first")).await.unwrap();
        store.put(&entry("a", "second")).await.unwrap();
        store.put(&entry("b", "other")).await.unwrap();

        assert_eq!(store.get("a").await.unwrap().unwrap().narrative, "second");
        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.is_empty().await);
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}
