//! Watch loop over the download landing directory
//!
//! `notify` delivers raw events on its own thread; they are converted to
//! [`DownloadEvent`]s and queued on a channel. The loop drains that channel
//! one event at a time, so a reconciliation (retry waits included) always
//! finishes before the next event is looked at. Cancellation is checked
//! between events only.

use std::path::Path;

use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::reconciler::{DownloadEvent, Reconciler};

/// Recursive watcher on the watch root plus its event queue
pub struct DownloadWatcher {
    // Dropping the watcher stops notifications and closes the channel.
    watcher: Option<RecommendedWatcher>,
    events: mpsc::UnboundedReceiver<DownloadEvent>,
}

impl DownloadWatcher {
    /// Start watching `root` recursively
    pub fn start(root: &Path) -> notify::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for download in download_events(event) {
                    if tx.send(download).is_err() {
                        debug!("Watch loop has stopped, discarding event");
                    }
                }
            }
            Err(e) => error!(error = %e, "Watch error"),
        })?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        info!(root = %root.display(), "Watching download directory");
        Ok(Self {
            watcher: Some(watcher),
            events: rx,
        })
    }

    /// Loop over an externally fed queue instead of a live watcher
    pub fn from_receiver(events: mpsc::UnboundedReceiver<DownloadEvent>) -> Self {
        Self {
            watcher: None,
            events,
        }
    }

    /// Process events until `cancel` fires or the queue closes.
    ///
    /// Returns the number of events handled.
    pub async fn run(mut self, reconciler: &Reconciler, cancel: CancellationToken) -> usize {
        let mut handled = 0;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!("Shutdown requested, stopping watch loop");
                    break;
                }

                event = self.events.recv() => {
                    let Some(event) = event else {
                        info!("Event channel closed, stopping watch loop");
                        break;
                    };
                    reconciler.handle(&event).await;
                    handled += 1;
                }
            }
        }

        if let Some(watcher) = self.watcher.take() {
            drop(watcher);
            debug!("Filesystem watcher stopped");
        }
        handled
    }
}

/// New entries only: creations and entries moved in from elsewhere
fn download_events(event: Event) -> Vec<DownloadEvent> {
    let folder_hint = match event.kind {
        EventKind::Create(kind) => kind == CreateKind::Folder,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => false,
        _ => return Vec::new(),
    };

    event
        .paths
        .into_iter()
        .map(|path| {
            let is_directory = folder_hint || path.is_dir();
            DownloadEvent { path, is_directory }
        })
        .collect()
}
