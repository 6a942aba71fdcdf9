//! Radarr (movie tracker) queue client
//!
//! Resolution is two calls: list the active queue, then fetch the queue
//! detail of the matching movie to learn its library folder.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::arr_api::{ArrApi, QUEUE_PAGE_SIZE, REFRESH_MONITORED_DOWNLOADS};
use super::resolver::QueueTracker;
use crate::error::ClientError;

/// One page of `/api/v3/queue`
#[derive(Debug, Clone, Deserialize)]
pub struct RadarrQueuePage {
    #[serde(default)]
    pub records: Vec<RadarrQueueRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrQueueRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub movie_id: Option<i64>,
}

/// Entry of `/api/v3/queue/details`
#[derive(Debug, Clone, Deserialize)]
pub struct RadarrQueueDetail {
    #[serde(default)]
    pub movie: Option<RadarrMovie>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrMovie {
    /// Full library folder of the movie
    #[serde(default)]
    pub folder_name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl RadarrMovie {
    pub fn folder(&self) -> Option<PathBuf> {
        self.folder_name
            .as_deref()
            .or(self.path.as_deref())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}

/// Radarr API client
#[derive(Debug, Clone)]
pub struct RadarrClient {
    api: ArrApi,
}

impl RadarrClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api: ArrApi::new("radarr", base_url, api_key),
        }
    }

    /// Active downloads, excluding items Radarr cannot tie to a movie
    pub async fn queue(&self) -> Result<RadarrQueuePage, ClientError> {
        self.api
            .get_json(
                "queue",
                &[
                    ("page", "1".to_string()),
                    ("pageSize", QUEUE_PAGE_SIZE.to_string()),
                    ("includeUnknownMovieItems", "false".to_string()),
                ],
            )
            .await
    }

    pub async fn queue_details(&self, movie_id: i64) -> Result<Vec<RadarrQueueDetail>, ClientError> {
        self.api
            .get_json(
                "queue/details",
                &[
                    ("movieId", movie_id.to_string()),
                    ("includeMovie", "true".to_string()),
                ],
            )
            .await
    }
}

#[async_trait]
impl QueueTracker for RadarrClient {
    fn name(&self) -> &'static str {
        self.api.service()
    }

    async fn find_library_root(&self, release_name: &str) -> Result<Option<PathBuf>, ClientError> {
        let page = self.queue().await?;
        let Some(movie_id) = first_movie_id(&page, release_name) else {
            return Ok(None);
        };

        debug!(release = %release_name, movie_id, "Found queue record, fetching details");
        let details = self.queue_details(movie_id).await?;
        let detail = details
            .into_iter()
            .next()
            .ok_or(ClientError::EmptyDetail { movie_id })?;

        Ok(detail.movie.and_then(|movie| movie.folder()))
    }

    async fn refresh_downloads(&self) -> Result<(), ClientError> {
        self.api.post_command(REFRESH_MONITORED_DOWNLOADS).await
    }
}

/// Movie id of the first record titled exactly `release_name`
fn first_movie_id(page: &RadarrQueuePage, release_name: &str) -> Option<i64> {
    page.records
        .iter()
        .find(|r| r.title.as_deref() == Some(release_name))
        .and_then(|r| r.movie_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUEUE_JSON: &str = r#"{
        "page": 1,
        "pageSize": 100,
        "totalRecords": 3,
        "records": [
            { "title": "Other.Movie.2019", "movieId": 7, "status": "completed" },
            { "title": "Some.Movie.2020", "movieId": 42, "status": "completed" },
            { "title": "Some.Movie.2020", "movieId": 43, "status": "downloading" }
        ]
    }"#;

    #[test]
    fn test_first_matching_title_wins() {
        let page: RadarrQueuePage = serde_json::from_str(QUEUE_JSON).unwrap();
        assert_eq!(first_movie_id(&page, "Some.Movie.2020"), Some(42));
        assert_eq!(first_movie_id(&page, "some.movie.2020"), None);
        assert_eq!(first_movie_id(&page, "Missing"), None);
    }

    #[test]
    fn test_detail_folder() {
        let details: Vec<RadarrQueueDetail> = serde_json::from_str(
            r#"[{ "movieId": 42, "movie": { "title": "Some Movie", "folderName": "/library/Some Movie (2020)", "path": "/ignored" } }]"#,
        )
        .unwrap();
        let folder = details[0].movie.as_ref().and_then(RadarrMovie::folder);
        assert_eq!(folder, Some(PathBuf::from("/library/Some Movie (2020)")));
    }

    #[test]
    fn test_detail_falls_back_to_path() {
        let movie: RadarrMovie = serde_json::from_str(r#"{ "path": "/library/Fallback (1999)" }"#).unwrap();
        assert_eq!(movie.folder(), Some(PathBuf::from("/library/Fallback (1999)")));
    }
}
