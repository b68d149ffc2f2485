//! File persistence for the catalog.
//!
//! The catalog is read once at start and written once at exit. A missing
//! file is not an error: it simply means there is nothing to load yet.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use crate::codec::{self, Decoded, DecodePolicy};
use crate::domain::Collection;

/// JSON file holding every collection
#[derive(Debug, Clone)]
pub struct CatalogStore {
    /// File read at start
    load_path: PathBuf,

    /// File written at exit (often the same file)
    save_path: PathBuf,
}

impl CatalogStore {
    /// Store that reads and writes the same file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            load_path: path.clone(),
            save_path: path,
        }
    }

    /// Store that writes to a different file than it reads
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }

    pub fn load_path(&self) -> &Path {
        &self.load_path
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Read and decode the catalog. `Ok(None)` when the file does not exist.
    pub async fn load(&self, policy: DecodePolicy) -> Result<Option<Decoded>> {
        let path = &self.load_path;

        if !path.exists() {
            tracing::info!("No catalog at {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;

        let decoded = codec::decode(&content, policy)
            .with_context(|| format!("Failed to decode catalog: {}", path.display()))?;

        tracing::info!(
            collections = decoded.collections.len(),
            skipped = decoded.skipped.len(),
            "Loaded catalog from {}",
            path.display()
        );

        Ok(Some(decoded))
    }

    /// Encode and write the catalog
    pub async fn save(&self, collections: &[Collection]) -> Result<()> {
        let path = &self.save_path;
        let content = codec::encode(collections).context("Failed to encode catalog")?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write catalog: {}", path.display()))?;

        tracing::info!(collections = collections.len(), "Saved catalog to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_nothing() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path().join("libraries.json"));

        let loaded = store.load(DecodePolicy::Strict).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dir").join("libraries.json");
        let store = CatalogStore::new(&path);

        let mut collection = Collection::new("home");
        collection.add("Dune", "Frank Herbert", 1965);
        store.save(&[collection]).await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_separate_save_path() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("in.json");
        let target = temp.path().join("out.json");
        std::fs::write(&source, r#"{"Collection(a)": {"Record(t, x, 1, available)": 1}}"#).unwrap();

        let store = CatalogStore::new(&source).with_save_path(&target);
        let decoded = store.load(DecodePolicy::Strict).await.unwrap().unwrap();
        store.save(&decoded.collections).await.unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert!(written.contains("\"Record(t, x, 1, available)\": 1"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("libraries.json");
        std::fs::write(&path, "not json").unwrap();

        let store = CatalogStore::new(&path);
        assert!(store.load(DecodePolicy::Skip).await.is_err());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path().join("libraries.json"));

        let mut home = Collection::new("Home");
        home.add("Dune", "Frank Herbert", 1965);
        home.add("Emma", "Jane Austen", 1815);
        home.add("Odes", "Horace", -23);
        home.delete(1).unwrap();
        home.get_mut(2).unwrap().toggle_status();
        home.get_mut(3).unwrap().set_status("lost", |_| true);
        let office = Collection::new("Office");

        store.save(&[home.clone(), office]).await.unwrap();
        let decoded = store.load(DecodePolicy::Strict).await.unwrap().unwrap();

        assert!(decoded.skipped.is_empty());
        let names: Vec<_> = decoded.collections.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Home", "Office"]);

        let loaded = &decoded.collections[0];
        assert_eq!(loaded.records(), home.records());
        for record in home.records() {
            assert_eq!(loaded.get(record.id()).unwrap().status(), record.status());
        }
        assert!(decoded.collections[1].is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_file_untouched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("libraries.json");
        std::fs::write(&path, "{}").unwrap();
        let store = CatalogStore::new(&path);

        let mut collection = Collection::new("Home");
        collection.add("Dune", "Frank Herbert", 1965);
        collection.add("Dune", "Frank Herbert", 1965);

        assert!(store.save(&[collection]).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
