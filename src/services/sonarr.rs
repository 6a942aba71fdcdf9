//! Sonarr (series tracker) queue client
//!
//! The queue listing embeds the series, so a single call resolves the
//! library folder.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use super::arr_api::{ArrApi, QUEUE_PAGE_SIZE, REFRESH_MONITORED_DOWNLOADS};
use super::resolver::QueueTracker;
use crate::error::ClientError;

#[derive(Debug, Clone, Deserialize)]
pub struct SonarrQueuePage {
    #[serde(default)]
    pub records: Vec<SonarrQueueRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SonarrQueueRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub series: Option<SonarrSeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SonarrSeries {
    #[serde(default)]
    pub path: Option<String>,
}

/// Sonarr API client
#[derive(Debug, Clone)]
pub struct SonarrClient {
    api: ArrApi,
}

impl SonarrClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api: ArrApi::new("sonarr", base_url, api_key),
        }
    }

    /// Active downloads with series attached, excluding unmatched items
    pub async fn queue(&self) -> Result<SonarrQueuePage, ClientError> {
        self.api
            .get_json(
                "queue",
                &[
                    ("page", "1".to_string()),
                    ("pageSize", QUEUE_PAGE_SIZE.to_string()),
                    ("includeSeries", "true".to_string()),
                    ("includeUnknownSeriesItems", "false".to_string()),
                ],
            )
            .await
    }
}

#[async_trait]
impl QueueTracker for SonarrClient {
    fn name(&self) -> &'static str {
        self.api.service()
    }

    async fn find_library_root(&self, release_name: &str) -> Result<Option<PathBuf>, ClientError> {
        let page = self.queue().await?;
        Ok(first_series_path(&page, release_name))
    }

    async fn refresh_downloads(&self) -> Result<(), ClientError> {
        self.api.post_command(REFRESH_MONITORED_DOWNLOADS).await
    }
}

/// Series folder of the first record titled exactly `release_name`
fn first_series_path(page: &SonarrQueuePage, release_name: &str) -> Option<PathBuf> {
    page.records
        .iter()
        .find(|r| r.title.as_deref() == Some(release_name))
        .and_then(|r| r.series.as_ref())
        .and_then(|s| s.path.as_deref())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}
