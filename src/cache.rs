//! The durable local transaction cache.
//!
//! Two files under the wallet home make up the cache: `transactions.json`
//! holds the serialized collection and `last_sync.json` holds the RFC 3339
//! timestamp of the last successful write. The cache is owned and mutated
//! exclusively by the sync store; it is a mirror, not a store of record.

use crate::model::Transaction;
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Reads and writes the cached transaction collection.
///
/// The `Cache` struct is immutable and owns copies of the paths it needs.
/// Create a new instance via `Cache::new()`.
#[derive(Debug, Clone)]
pub struct Cache {
    transactions_path: PathBuf,
    last_sync_path: PathBuf,
}

impl Cache {
    /// Creates a new `Cache` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            transactions_path: config.transactions_path(),
            last_sync_path: config.last_sync_path(),
        }
    }

    /// Loads the cached collection.
    ///
    /// A missing file is an ordinary cold start. Any other failure (unreadable
    /// file, malformed JSON) degrades to an empty collection as well: the cache
    /// is reconstructible from the remote source, so losing it only costs a
    /// round trip.
    pub async fn load(&self) -> Vec<Transaction> {
        if !self.transactions_path.is_file() {
            debug!("no transaction cache at {}", self.transactions_path.display());
            return Vec::new();
        }
        match utils::deserialize(&self.transactions_path).await {
            Ok(transactions) => transactions,
            Err(e) => {
                warn!("discarding unreadable transaction cache: {e:#}");
                Vec::new()
            }
        }
    }

    /// Persists the collection and stamps `last_sync.json`.
    pub async fn save(&self, transactions: &[Transaction]) -> Result<()> {
        let json = serde_json::to_string_pretty(transactions)
            .context("Unable to serialize the transaction cache")?;
        utils::write(&self.transactions_path, json).await?;
        utils::write(&self.last_sync_path, Utc::now().to_rfc3339()).await
    }

    /// The time of the last successful `save`, if any.
    pub async fn last_sync(&self) -> Option<DateTime<Utc>> {
        if !self.last_sync_path.is_file() {
            return None;
        }
        let stamp = utils::read(&self.last_sync_path).await.ok()?;
        DateTime::parse_from_rfc3339(stamp.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::seed_transactions;
    use tempfile::TempDir;

    async fn cache_in(dir: &TempDir) -> Cache {
        let home = dir.path().join("wallet");
        let config = Config::create(&home, "http://localhost:8000").await.unwrap();
        Cache::new(&config)
    }

    #[tokio::test]
    async fn test_load_empty_on_cold_start() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir).await;
        assert!(cache.load().await.is_empty());
        assert!(cache.last_sync().await.is_none());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir).await;
        let transactions = seed_transactions();

        cache.save(&transactions).await.unwrap();

        assert_eq!(cache.load().await, transactions);
        assert!(cache.last_sync().await.is_some());
    }

    #[tokio::test]
    async fn test_corrupt_cache_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir).await;
        cache.save(&seed_transactions()).await.unwrap();

        tokio::fs::write(&cache.transactions_path, "{not json")
            .await
            .unwrap();

        assert!(cache.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites_wholesale() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir).await;
        let transactions = seed_transactions();

        cache.save(&transactions).await.unwrap();
        cache.save(&transactions[..2]).await.unwrap();

        assert_eq!(cache.load().await.len(), 2);
    }
}
