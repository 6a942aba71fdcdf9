//! Reconciliation components and collaborator clients

pub mod arr_api;
pub mod classifier;
pub mod jellyfin;
pub mod logging;
pub mod path_builder;
pub mod publisher;
pub mod radarr;
pub mod reconciler;
pub mod resolver;
pub mod retry;
pub mod sonarr;
pub mod watcher;

pub use classifier::{Classification, PathClassifier};
pub use jellyfin::{JellyfinClient, LibraryRefresher};
pub use path_builder::LibraryLayout;
pub use publisher::HardlinkPublisher;
pub use radarr::RadarrClient;
pub use reconciler::{DownloadEvent, Outcome, Reconciler, Route};
pub use resolver::{QueueTracker, ResolvedTarget, TargetResolver};
pub use retry::RetryPolicy;
pub use sonarr::SonarrClient;
pub use watcher::DownloadWatcher;
