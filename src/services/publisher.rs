//! Hardlink publishing into the media library
//!
//! The download stays where it is (the downloader may still be seeding or
//! cleaning up); the library gets a second name for the same inode. Any file
//! already at the destination is replaced, so publishing twice is harmless.

use std::path::Path;
use std::sync::Arc;

use tokio::fs;
use tracing::{info, warn};

use super::jellyfin::LibraryRefresher;
use crate::error::{ReconcileError, ReconcileResult};

/// Links finished downloads into the library and asks for a rescan
#[derive(Clone)]
pub struct HardlinkPublisher {
    refresher: Arc<dyn LibraryRefresher>,
}

impl HardlinkPublisher {
    pub fn new(refresher: Arc<dyn LibraryRefresher>) -> Self {
        Self { refresher }
    }

    /// Hardlink `source` at `dest`, then request a library rescan.
    ///
    /// Link failures (e.g. `dest` on another filesystem) are returned, not
    /// retried. A failed rescan request is only logged.
    pub async fn publish(&self, source: &Path, dest: &Path) -> ReconcileResult<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ReconcileError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        if !fs::try_exists(source).await.unwrap_or(false) {
            return Err(ReconcileError::SourceVanished {
                path: source.to_path_buf(),
            });
        }

        let link_failure = |e: std::io::Error| ReconcileError::LinkFailure {
            source_path: source.to_path_buf(),
            dest_path: dest.to_path_buf(),
            source: e,
        };

        if fs::symlink_metadata(dest).await.is_ok() {
            info!(path = %dest.display(), "Removing already existing target file");
            fs::remove_file(dest).await.map_err(link_failure)?;
        }

        fs::hard_link(source, dest).await.map_err(link_failure)?;

        if let Err(e) = self.refresher.refresh_library().await {
            warn!(error = %e, "Library refresh request failed");
        }

        Ok(())
    }
}
