//! Queue resolution: release name -> library root
//!
//! The filesystem event usually fires before the tracker has noticed the
//! finished download, so the lookup is polled under a [`RetryPolicy`],
//! nudging the tracker with a refresh command after every miss.
//!
//! When several queue records share a title the first one in API order
//! wins; no further disambiguation is attempted.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ReconcileError, ReconcileResult};
use crate::services::classifier::Classification;
use crate::services::retry::RetryPolicy;

/// The capability the resolver needs from an upstream queue tracker
#[async_trait]
pub trait QueueTracker: Send + Sync {
    /// Short name for logs ("radarr", "sonarr")
    fn name(&self) -> &'static str;

    /// Library folder of the first active download titled `release_name`
    async fn find_library_root(&self, release_name: &str) -> Result<Option<PathBuf>, ClientError>;

    /// Ask the tracker to re-scan its download clients
    async fn refresh_downloads(&self) -> Result<(), ClientError>;
}

/// A library root matched to a classified download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub library_root: PathBuf,
    pub classification: Classification,
}

/// Polls one tracker until its queue shows the release or the policy runs out
#[derive(Clone)]
pub struct TargetResolver {
    tracker: Arc<dyn QueueTracker>,
    policy: RetryPolicy,
}

impl TargetResolver {
    pub fn new(tracker: Arc<dyn QueueTracker>, policy: RetryPolicy) -> Self {
        Self { tracker, policy }
    }

    pub fn tracker_name(&self) -> &'static str {
        self.tracker.name()
    }

    /// Resolve the library root for a classified download
    pub async fn resolve(&self, classification: &Classification) -> ReconcileResult<ResolvedTarget> {
        let tracker = self.tracker.name();
        let release_name = classification.release_name.as_str();
        let mut failed = 0;

        while self.policy.allows_attempt(failed) {
            match self.tracker.find_library_root(release_name).await {
                Ok(Some(library_root)) => {
                    info!(
                        tracker,
                        release = %release_name,
                        root = %library_root.display(),
                        attempts = failed + 1,
                        "Resolved library root"
                    );
                    return Ok(ResolvedTarget {
                        library_root,
                        classification: classification.clone(),
                    });
                }
                Ok(None) => {
                    debug!(tracker, release = %release_name, attempt = failed + 1, "Release not in queue yet");
                }
                Err(e) => {
                    warn!(tracker, release = %release_name, attempt = failed + 1, error = %e, "Queue lookup failed");
                }
            }

            failed += 1;

            if let Err(e) = self.tracker.refresh_downloads().await {
                debug!(tracker, error = %e, "Refresh command failed, continuing");
            }

            if let Some(delay) = self.policy.delay_after(failed) {
                tokio::time::sleep(delay).await;
            }
        }

        Err(ReconcileError::ResolutionExhausted {
            tracker,
            release_name: release_name.to_string(),
            attempts: failed,
        })
    }
}
