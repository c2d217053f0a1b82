use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	pub data_dir: PathBuf,
	pub snapshots_dir: PathBuf,
	pub index_path: PathBuf,
}

impl Config {
	pub fn new() -> crate::error::Result<Self> {
		let project_dirs = ProjectDirs::from("", "", "hubload")
			.ok_or_else(|| crate::error::Error::Config("Could not determine config directory".to_string()))?;

		let data_dir = project_dirs.data_dir().to_path_buf();
		Self::at(data_dir)
	}

	pub fn from_env() -> crate::error::Result<Self> {
		if let Ok(data_dir) = std::env::var("HUBLOAD_DATA_DIR") {
			Self::at(PathBuf::from(data_dir))
		} else {
			Self::new()
		}
	}

	pub fn at(data_dir: PathBuf) -> crate::error::Result<Self> {
		let snapshots_dir = data_dir.join("snapshots");
		let index_path = data_dir.join("snapshots.toml");

		std::fs::create_dir_all(&data_dir)?;
		std::fs::create_dir_all(&snapshots_dir)?;

		Ok(Self {
			data_dir,
			snapshots_dir,
			index_path,
		})
	}
}

impl Default for Config {
	fn default() -> Self {
		Self::new().expect("Failed to create default config")
	}
}
