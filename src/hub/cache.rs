use crate::config::Config;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub identifier: String,
    pub revision: String,
    pub path: PathBuf,
    pub downloaded_at: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SnapshotIndex {
    snapshots: HashMap<String, SnapshotEntry>,
}

impl SnapshotIndex {
    pub fn load(config: &Config) -> Result<Self> {
        if !config.index_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config.index_path)?;
        let index: SnapshotIndex = toml::from_str(&content)?;
        Ok(index)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(&config.index_path, content)?;
        Ok(())
    }

    pub fn record(&mut self, entry: SnapshotEntry) {
        self.snapshots.insert(entry.identifier.clone(), entry);
    }

    // a cached snapshot only counts when its revision matches
    pub fn find(&self, identifier: &str, revision: &str) -> Option<&SnapshotEntry> {
        self.snapshots
            .get(identifier)
            .filter(|entry| entry.revision == revision)
    }

    pub fn entries(&self) -> Vec<&SnapshotEntry> {
        self.snapshots.values().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_config(dir: &tempfile::TempDir) -> Config {
        Config::at(dir.path().join("data")).unwrap()
    }

    fn entry(identifier: &str, revision: &str) -> SnapshotEntry {
        SnapshotEntry {
            identifier: identifier.to_string(),
            revision: revision.to_string(),
            path: PathBuf::from("/tmp/snap"),
            downloaded_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(&dir);

        let mut index = SnapshotIndex::default();
        index.record(entry("org/model-a", "main"));
        index.save(&config).unwrap();

        let reread = SnapshotIndex::load(&config).unwrap();
        let found = reread.find("org/model-a", "main").unwrap();
        assert_eq!(found.revision, "main");
        assert_eq!(found.path, PathBuf::from("/tmp/snap"));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(&dir);
        let index = SnapshotIndex::load(&config).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn revision_mismatch_is_a_miss() {
        let mut index = SnapshotIndex::default();
        index.record(entry("org/model-a", "main"));

        assert!(index.find("org/model-a", "main").is_some());
        assert!(index.find("org/model-a", "v1.2").is_none());
        assert!(index.find("org/model-b", "main").is_none());
    }

    #[test]
    fn re_recording_replaces_the_entry() {
        let mut index = SnapshotIndex::default();
        index.record(entry("org/model-a", "main"));
        index.record(entry("org/model-a", "v2"));

        assert!(index.find("org/model-a", "main").is_none());
        assert!(index.find("org/model-a", "v2").is_some());
        assert_eq!(index.entries().len(), 1);
    }
}
