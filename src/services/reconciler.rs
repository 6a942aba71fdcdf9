//! Download reconciliation
//!
//! Drives one filesystem event through classify -> resolve -> build path ->
//! publish. Every event ends in exactly one [`Outcome`]; errors are logged
//! here and never reach the watch loop.
//!
//! ```text
//! received -> filtered-out
//! received -> classified -> category-mismatch
//! received -> classified -> resolving -> resolved -> published
//! received -> classified -> resolving -> exhausted
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use super::classifier::{PathClassifier, is_sample};
use super::path_builder::LibraryLayout;
use super::publisher::HardlinkPublisher;
use super::resolver::TargetResolver;
use crate::error::ReconcileError;

/// A new filesystem entry under the watch root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEvent {
    pub path: PathBuf,
    pub is_directory: bool,
}

impl DownloadEvent {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
        }
    }
}

/// Terminal state of one event
#[derive(Debug)]
pub enum Outcome {
    /// Directory, non-video or sample
    FilteredOut,
    /// Not under either tracker's category
    CategoryMismatch,
    /// Series file with no season marker anywhere in its path
    NoSeason,
    Published { destination: PathBuf },
    Dropped(ReconcileError),
}

/// One tracker, the category it owns and how its library is laid out
#[derive(Clone)]
pub struct Route {
    pub category: String,
    pub layout: LibraryLayout,
    pub resolver: TargetResolver,
}

/// Event handler tying the components together
#[derive(Clone)]
pub struct Reconciler {
    classifier: PathClassifier,
    routes: Vec<Route>,
    publisher: HardlinkPublisher,
}

impl Reconciler {
    pub fn new(classifier: PathClassifier, routes: Vec<Route>, publisher: HardlinkPublisher) -> Self {
        Self {
            classifier,
            routes,
            publisher,
        }
    }

    /// Handle one event to completion, including any retry waits
    pub async fn handle(&self, event: &DownloadEvent) -> Outcome {
        let path = event.path.as_path();

        if event.is_directory || !self.classifier.is_video(path) || is_sample(path) {
            debug!(path = %path.display(), "Ignoring non-video entry");
            return Outcome::FilteredOut;
        }

        let outcome = self.reconcile(path).await;
        match &outcome {
            Outcome::FilteredOut => {}
            Outcome::CategoryMismatch => {
                debug!(path = %path.display(), "Path is outside the watched categories");
            }
            Outcome::NoSeason => {
                debug!(path = %path.display(), "No season marker, skipping series file");
            }
            Outcome::Published { destination } => {
                info!(path = %path.display(), destination = %destination.display(), "Linked into library");
            }
            Outcome::Dropped(e @ ReconcileError::LinkFailure { .. })
            | Outcome::Dropped(e @ ReconcileError::CreateDir { .. }) => {
                error!(path = %path.display(), error = ?e, "Failed to publish download");
            }
            Outcome::Dropped(e) => {
                warn!(path = %path.display(), error = %e, "Dropping download event");
            }
        }
        outcome
    }

    async fn reconcile(&self, path: &Path) -> Outcome {
        let classification = match self.classifier.classify(path) {
            Ok(c) => c,
            Err(e) => return Outcome::Dropped(e),
        };

        let Some(route) = self
            .routes
            .iter()
            .find(|r| r.category == classification.category)
        else {
            return Outcome::CategoryMismatch;
        };

        if route.layout == LibraryLayout::Series && classification.season.is_none() {
            return Outcome::NoSeason;
        }

        debug!(
            tracker = route.resolver.tracker_name(),
            release = %classification.release_name,
            "Resolving release"
        );
        let target = match route.resolver.resolve(&classification).await {
            Ok(target) => target,
            Err(e) => return Outcome::Dropped(e),
        };

        let Some(destination) = route.layout.destination(&target, path) else {
            return Outcome::NoSeason;
        };

        match self.publisher.publish(path, &destination).await {
            Ok(()) => Outcome::Published { destination },
            Err(e) => Outcome::Dropped(e),
        }
    }
}
