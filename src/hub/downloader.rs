use crate::config::Config;
use crate::configuration::CONFIGURATION_FILE;
use crate::error::{Error, Result};
use crate::hub::{SnapshotEntry, SnapshotIndex};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use std::path::PathBuf;

pub const DEFAULT_REVISION: &str = "main";

pub const WEIGHT_FILES: &[&str] = &["model.safetensors", "pytorch_model.bin"];

pub struct SnapshotDownloader {
    config: Config,
    index: SnapshotIndex,
}

impl SnapshotDownloader {
    pub fn new(config: Config) -> Result<Self> {
        let index = SnapshotIndex::load(&config)?;
        Ok(Self { config, index })
    }

    pub fn index(&self) -> &SnapshotIndex {
        &self.index
    }

    pub fn fetch(&mut self, identifier: &str, revision: &str) -> Result<PathBuf> {
        if let Some(entry) = self.index.find(identifier, revision) {
            tracing::info!("Reusing local snapshot for '{}' at {:?}", identifier, entry.path);
            return Ok(entry.path.clone());
        }

        tracing::info!("Fetching snapshot '{}' at revision '{}'", identifier, revision);

        let api = Api::new().map_err(|e| Error::Download(e.to_string()))?;
        let repo = api.repo(Repo::with_revision(
            identifier.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let config_file = repo.get(CONFIGURATION_FILE).map_err(|e| {
            Error::Download(format!("Could not fetch {}: {}", CONFIGURATION_FILE, e))
        })?;

        // Checkpoints are optional at this layer: configuration-only repos
        // are legal, the builder decides what it actually needs.
        let mut weight_file = None;
        for name in WEIGHT_FILES {
            if let Ok(path) = repo.get(name) {
                weight_file = Some(path);
                break;
            }
        }
        if weight_file.is_none() {
            tracing::warn!(
                "No checkpoint file found for '{}', snapshot is configuration-only",
                identifier
            );
        }

        let snapshot_dir = config_file
            .parent()
            .ok_or_else(|| Error::Download("Invalid snapshot path".to_string()))?
            .to_path_buf();

        let entry = SnapshotEntry {
            identifier: identifier.to_string(),
            revision: revision.to_string(),
            path: snapshot_dir.clone(),
            downloaded_at: chrono::Utc::now().to_rfc3339(),
        };
        self.index.record(entry);
        self.index.save(&self.config)?;

        tracing::info!("Snapshot '{}' fetched and indexed", identifier);

        Ok(snapshot_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_hit_at_the_same_revision_skips_the_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::at(dir.path().join("data")).unwrap();

        let cached = dir.path().join("cached-snapshot");
        std::fs::create_dir_all(&cached).unwrap();

        let mut index = SnapshotIndex::default();
        index.record(SnapshotEntry {
            identifier: "org/model-a".to_string(),
            revision: "main".to_string(),
            path: cached.clone(),
            downloaded_at: "2026-01-01T00:00:00+00:00".to_string(),
        });
        index.save(&config).unwrap();

        // The hub is unreachable in tests; an index hit must return the
        // cached path before any client is built.
        let mut downloader = SnapshotDownloader::new(config).unwrap();
        let path = downloader.fetch("org/model-a", "main").unwrap();
        assert_eq!(path, cached);
    }
}
