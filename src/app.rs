//! Wiring of clients and components from configuration.
//!
//! Client handles are created once here and shared (read-mostly) by every
//! reconciliation for the life of the process.

use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    HardlinkPublisher, JellyfinClient, LibraryLayout, PathClassifier, RadarrClient, Reconciler,
    RetryPolicy, Route, SonarrClient, TargetResolver,
};

/// Long-lived collaborator handles
#[derive(Clone)]
pub struct Clients {
    pub radarr: Arc<RadarrClient>,
    pub sonarr: Arc<SonarrClient>,
    pub jellyfin: Arc<JellyfinClient>,
}

impl Clients {
    pub fn from_config(config: &Config) -> Self {
        Self {
            radarr: Arc::new(RadarrClient::new(&config.radarr.host, &config.radarr.api_key)),
            sonarr: Arc::new(SonarrClient::new(&config.sonarr.host, &config.sonarr.api_key)),
            jellyfin: Arc::new(JellyfinClient::new(
                &config.jellyfin_address,
                &config.jellyfin_api_key,
            )),
        }
    }
}

/// Build the event handler: movie route first, then series
pub fn build_reconciler(config: &Config, clients: &Clients, policy: RetryPolicy) -> Reconciler {
    let classifier = PathClassifier::new(
        config.watch_root.clone(),
        config.categories(),
        config.video_extensions.clone(),
    );

    let routes = vec![
        Route {
            category: config.radarr.category.clone(),
            layout: LibraryLayout::Movie,
            resolver: TargetResolver::new(clients.radarr.clone(), policy),
        },
        Route {
            category: config.sonarr.category.clone(),
            layout: LibraryLayout::Series,
            resolver: TargetResolver::new(clients.sonarr.clone(), policy),
        },
    ];

    Reconciler::new(
        classifier,
        routes,
        HardlinkPublisher::new(clients.jellyfin.clone()),
    )
}
