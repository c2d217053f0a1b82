pub mod cache;
pub mod downloader;

pub use cache::{SnapshotEntry, SnapshotIndex};
pub use downloader::{SnapshotDownloader, DEFAULT_REVISION};
