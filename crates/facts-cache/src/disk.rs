//! On-disk JSON archival cache.
//!
//! Raw facts documents and CIK table snapshots are written as dated JSON
//! files (`raw/facts_<cik>_<date>.json`, `cik/cik_table_<date>.json`) and
//! reads serve the most recent file. Old snapshots stay on disk until
//! [`FactsCache::invalidate_stale`] removes them, so a failed upstream
//! refresh can always fall back to the last good snapshot.

use async_trait::async_trait;
use chrono::Utc;
use facts_core::{Cik, CikTable, CompanyFacts, FactsCache, FactsError, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, instrument, warn};

/// Subdirectory for raw company facts documents.
const RAW_DIR: &str = "raw";

/// Subdirectory for CIK table snapshots.
const CIK_DIR: &str = "cik";

/// Date format used in archive file names; lexical order is date order.
const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// On-disk JSON archival cache.
#[derive(Debug)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    /// Create a disk cache rooted at `root`, creating its directories.
    ///
    /// # Errors
    /// Returns [`FactsError::Cache`] if the directories cannot be created.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for dir in [RAW_DIR, CIK_DIR] {
            fs::create_dir_all(root.join(dir))
                .await
                .map_err(|e| FactsError::Cache(e.to_string()))?;
        }
        Ok(Self { root })
    }

    fn raw_dir(&self) -> PathBuf {
        self.root.join(RAW_DIR)
    }

    fn cik_dir(&self) -> PathBuf {
        self.root.join(CIK_DIR)
    }

    /// Finds the lexically greatest file in `dir` starting with `prefix`.
    async fn latest_file(dir: &Path, prefix: &str) -> Result<Option<PathBuf>> {
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| FactsError::Cache(e.to_string()))?;

        let mut latest: Option<String> = None;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FactsError::Cache(e.to_string()))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(prefix) && latest.as_deref().is_none_or(|l| name.as_str() > l) {
                latest = Some(name);
            }
        }

        Ok(latest.map(|name| dir.join(name)))
    }

    /// Reads and decodes the most recent archived file with `prefix`.
    async fn read_latest<T: DeserializeOwned>(dir: &Path, prefix: &str) -> Result<Option<T>> {
        let Some(path) = Self::latest_file(dir, prefix).await? else {
            return Ok(None);
        };

        let bytes = fs::read(&path)
            .await
            .map_err(|e| FactsError::Cache(e.to_string()))?;
        let decoded =
            serde_json::from_slice(&bytes).map_err(|e| FactsError::Cache(e.to_string()))?;

        debug!(path = %path.display(), "Loaded archived snapshot");
        Ok(Some(decoded))
    }

    /// Serializes `data` to a dated file in `dir`.
    async fn write_dated<T: serde::Serialize>(dir: &Path, prefix: &str, data: &T) -> Result<()> {
        let date = Utc::now().format(FILE_DATE_FORMAT);
        let path = dir.join(format!("{prefix}{date}.json"));

        let bytes = serde_json::to_vec(data).map_err(|e| FactsError::Cache(e.to_string()))?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| FactsError::Cache(e.to_string()))?;

        debug!(path = %path.display(), "Archived snapshot");
        Ok(())
    }

    /// Removes files in `dir` whose modification time is older than `ttl`.
    async fn remove_stale(dir: &Path, ttl: Duration) -> Result<usize> {
        let mut removed = 0usize;
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| FactsError::Cache(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FactsError::Cache(e.to_string()))?
        {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            let stale = metadata
                .modified()
                .ok()
                .and_then(|m| m.elapsed().ok())
                .is_some_and(|age| age > ttl);

            if stale {
                if let Err(e) = fs::remove_file(entry.path()).await {
                    warn!(path = %entry.path().display(), error = %e, "Failed to remove stale file");
                } else {
                    removed += 1;
                }
            }
        }

        Ok(removed)
    }

    /// Removes every file in `dir`.
    async fn remove_all(dir: &Path) -> Result<()> {
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| FactsError::Cache(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FactsError::Cache(e.to_string()))?
        {
            fs::remove_file(entry.path())
                .await
                .map_err(|e| FactsError::Cache(e.to_string()))?;
        }

        Ok(())
    }
}

#[async_trait]
impl FactsCache for DiskCache {
    #[instrument(skip(self), fields(cik = %cik))]
    async fn get_facts(&self, cik: &Cik) -> Result<Option<CompanyFacts>> {
        let prefix = format!("facts_{cik}_");
        Self::read_latest(&self.raw_dir(), &prefix).await
    }

    #[instrument(skip(self, facts), fields(cik = %cik))]
    async fn put_facts(&self, cik: &Cik, facts: &CompanyFacts) -> Result<()> {
        let prefix = format!("facts_{cik}_");
        Self::write_dated(&self.raw_dir(), &prefix, facts).await
    }

    #[instrument(skip(self))]
    async fn get_cik_table(&self) -> Result<Option<CikTable>> {
        Self::read_latest(&self.cik_dir(), "cik_table_").await
    }

    #[instrument(skip(self, table), fields(tickers = table.len()))]
    async fn put_cik_table(&self, table: &CikTable) -> Result<()> {
        Self::write_dated(&self.cik_dir(), "cik_table_", table).await
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize> {
        let mut removed = Self::remove_stale(&self.raw_dir(), ttl).await?;
        removed += Self::remove_stale(&self.cik_dir(), ttl).await?;

        if removed > 0 {
            debug!("Removed {} stale archive files", removed);
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        Self::remove_all(&self.raw_dir()).await?;
        Self::remove_all(&self.cik_dir()).await?;
        debug!("Cleared archive directories");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facts_core::{CikEntry, Ticker};
    use std::collections::HashMap;

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "facts-cache-test-{tag}-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
    }

    fn sample_facts() -> CompanyFacts {
        serde_json::from_value(serde_json::json!({
            "entityName": "Apple Inc.",
            "facts": { "us-gaap": { "Revenues": { "units": { "USD": [
                { "end": "2023-12-31", "val": 1000.0, "form": "10-K" }
            ]}}}}
        }))
        .unwrap()
    }

    fn sample_table() -> CikTable {
        let mut entries = HashMap::new();
        entries.insert(
            "AAPL".to_string(),
            CikEntry {
                cik: Cik::from_number(320_193),
                title: "Apple Inc.".to_string(),
            },
        );
        CikTable::new(entries)
    }

    #[tokio::test]
    async fn facts_archive_round_trip() {
        let root = temp_root("facts");
        let cache = DiskCache::new(&root).await.unwrap();
        let cik = Cik::new("320193");

        assert!(cache.get_facts(&cik).await.unwrap().is_none());

        cache.put_facts(&cik, &sample_facts()).await.unwrap();

        let cached = cache.get_facts(&cik).await.unwrap().unwrap();
        assert_eq!(cached.entity_name.as_deref(), Some("Apple Inc."));

        // Another entity's archive does not match.
        assert!(cache.get_facts(&Cik::new("789019")).await.unwrap().is_none());

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn reads_most_recent_facts_archive() {
        let root = temp_root("latest-facts");
        let cache = DiskCache::new(&root).await.unwrap();
        let cik = Cik::new("320193");

        let older: CompanyFacts =
            serde_json::from_value(serde_json::json!({ "entityName": "Apple (old filing)" }))
                .unwrap();
        let newer: CompanyFacts =
            serde_json::from_value(serde_json::json!({ "entityName": "Apple (new filing)" }))
                .unwrap();

        // Two dated archives for the same entity, written oldest-last so the
        // selection cannot ride on directory order or write order.
        fs::write(
            root.join(RAW_DIR).join(format!("facts_{cik}_20240201.json")),
            serde_json::to_vec(&newer).unwrap(),
        )
        .await
        .unwrap();
        fs::write(
            root.join(RAW_DIR).join(format!("facts_{cik}_20240101.json")),
            serde_json::to_vec(&older).unwrap(),
        )
        .await
        .unwrap();

        let cached = cache.get_facts(&cik).await.unwrap().unwrap();
        assert_eq!(cached.entity_name.as_deref(), Some("Apple (new filing)"));

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn reads_most_recent_cik_table_archive() {
        let root = temp_root("latest-cik");
        let cache = DiskCache::new(&root).await.unwrap();

        let mut old_entries = HashMap::new();
        old_entries.insert(
            "OLDCO".to_string(),
            CikEntry {
                cik: Cik::from_number(1),
                title: "Old Co".to_string(),
            },
        );
        let mut new_entries = HashMap::new();
        new_entries.insert(
            "NEWCO".to_string(),
            CikEntry {
                cik: Cik::from_number(2),
                title: "New Co".to_string(),
            },
        );

        fs::write(
            root.join(CIK_DIR).join("cik_table_20240201.json"),
            serde_json::to_vec(&CikTable::new(new_entries)).unwrap(),
        )
        .await
        .unwrap();
        fs::write(
            root.join(CIK_DIR).join("cik_table_20240101.json"),
            serde_json::to_vec(&CikTable::new(old_entries)).unwrap(),
        )
        .await
        .unwrap();

        let table = cache.get_cik_table().await.unwrap().unwrap();
        assert!(table.lookup(&Ticker::new("NEWCO")).is_some());
        assert!(table.lookup(&Ticker::new("OLDCO")).is_none());

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn cik_table_survives_on_disk() {
        let root = temp_root("cik");
        let cik = {
            let cache = DiskCache::new(&root).await.unwrap();
            cache.put_cik_table(&sample_table()).await.unwrap();
            Cik::from_number(320_193)
        };

        // A fresh cache instance over the same root still finds the snapshot.
        let cache = DiskCache::new(&root).await.unwrap();
        let table = cache.get_cik_table().await.unwrap().unwrap();
        assert_eq!(table.lookup(&Ticker::new("AAPL")), Some(&cik));

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn clear_empties_archives() {
        let root = temp_root("clear");
        let cache = DiskCache::new(&root).await.unwrap();
        let cik = Cik::new("320193");

        cache.put_facts(&cik, &sample_facts()).await.unwrap();
        cache.put_cik_table(&sample_table()).await.unwrap();
        cache.clear().await.unwrap();

        assert!(cache.get_facts(&cik).await.unwrap().is_none());
        assert!(cache.get_cik_table().await.unwrap().is_none());

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn fresh_files_survive_invalidation() {
        let root = temp_root("stale");
        let cache = DiskCache::new(&root).await.unwrap();
        let cik = Cik::new("320193");

        cache.put_facts(&cik, &sample_facts()).await.unwrap();

        let removed = cache
            .invalidate_stale(Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert!(cache.get_facts(&cik).await.unwrap().is_some());

        let _ = fs::remove_dir_all(&root).await;
    }
}
