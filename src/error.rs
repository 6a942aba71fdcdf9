//! Error types for reconciliation and the collaborator clients
//!
//! Reconciliation errors never escape a single download event: the
//! reconciler logs them and moves on to the next event.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for a single reconciliation step.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Why a download event did not end in a published library file.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Path under the watch root has no release folder segment.
    #[error("malformed download path: {}", .path.display())]
    MalformedPath { path: PathBuf },

    /// No queue record matched within the retry budget.
    #[error("{tracker} queue has no record for '{release_name}' after {attempts} attempts")]
    ResolutionExhausted {
        tracker: &'static str,
        release_name: String,
        attempts: u32,
    },

    /// Source file disappeared between the event and the publish step.
    #[error("source file does not exist: {}", .path.display())]
    SourceVanished { path: PathBuf },

    /// Destination parent directory could not be created.
    #[error("failed to create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Hardlink creation (or clearing the stale destination) failed.
    #[error("failed to link {} -> {}", .source_path.display(), .dest_path.display())]
    LinkFailure {
        source_path: PathBuf,
        dest_path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised by the tracker and media-server HTTP clients.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{service} request failed")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status} for {url}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        url: String,
    },

    /// Queue detail lookup returned no entries for a movie that was listed.
    #[error("radarr queue details for movie {movie_id} were empty")]
    EmptyDetail { movie_id: i64 },
}

impl ClientError {
    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ClientError::Http { service, source }
    }
}
