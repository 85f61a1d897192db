//! On-disk result cache: one pretty JSON file per run id.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::export::{export_json, import_json};
use crate::runner::{BacktestResult, RunId};

/// Cache for backtest results, keyed by [`RunId`].
///
/// Entries written by a newer schema are treated as unreadable rather than
/// silently misread.
#[derive(Debug, Clone)]
pub struct ResultCache {
    cache_dir: PathBuf,
}

impl ResultCache {
    /// Open a cache rooted at `cache_dir`, creating the directory if needed.
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&cache_dir).with_context(|| {
            format!("failed to create cache directory {}", cache_dir.display())
        })?;
        Ok(Self { cache_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn contains(&self, run_id: &RunId) -> bool {
        self.entry_path(run_id).exists()
    }

    /// `Ok(None)` on a miss.
    pub fn get(&self, run_id: &RunId) -> Result<Option<BacktestResult>> {
        let path = self.entry_path(run_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let result = import_json(&json)
            .with_context(|| format!("bad cache entry {}", path.display()))?;
        Ok(Some(result))
    }

    pub fn put(&self, result: &BacktestResult) -> Result<()> {
        let path = self.entry_path(&result.run_id);
        let json = export_json(result)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn remove(&self, run_id: &RunId) -> Result<()> {
        let path = self.entry_path(run_id);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    /// Delete every entry. Other files in the directory are left alone.
    pub fn clear(&self) -> Result<()> {
        for path in self.entries()? {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn entries(&self) -> Result<Vec<PathBuf>> {
        let dir = std::fs::read_dir(&self.cache_dir)
            .with_context(|| format!("failed to list {}", self.cache_dir.display()))?;
        Ok(dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect())
    }

    fn entry_path(&self, run_id: &RunId) -> PathBuf {
        self.cache_dir.join(format!("{run_id}.json"))
    }
}
