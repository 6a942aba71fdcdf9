//! Shared HTTP plumbing for the *arr v3 APIs (Radarr, Sonarr)
//!
//! Both trackers authenticate with an `X-Api-Key` header and accept the same
//! command endpoint. Requests carry no timeout: the resolver's retry loop is
//! the only bound on total wait.

use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;

/// Command that makes a tracker re-poll its download clients
pub const REFRESH_MONITORED_DOWNLOADS: &str = "RefreshMonitoredDownloads";

/// Queue listing page size; one page is all that is ever scanned
pub const QUEUE_PAGE_SIZE: u32 = 100;

#[derive(Debug, Serialize)]
struct CommandBody<'a> {
    name: &'a str,
}

/// Authenticated client for one *arr instance
#[derive(Debug, Clone)]
pub struct ArrApi {
    service: &'static str,
    base_url: String,
    api_key: String,
    client: Client,
}

impl ArrApi {
    pub fn new(service: &'static str, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` with query parameters and decode the JSON body
    pub async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(service = self.service, url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(ClientError::http(self.service))?;

        self.check(response, url)?
            .json()
            .await
            .map_err(ClientError::http(self.service))
    }

    /// POST a named command, e.g. [`REFRESH_MONITORED_DOWNLOADS`]
    pub async fn post_command(&self, name: &str) -> Result<(), ClientError> {
        let url = self.url("command");
        debug!(service = self.service, command = name, "POST command");

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .json(&CommandBody { name })
            .send()
            .await
            .map_err(ClientError::http(self.service))?;

        self.check(response, url).map(|_| ())
    }

    fn check(&self, response: Response, url: String) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ClientError::Status {
                service: self.service,
                status: response.status(),
                url,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slashes() {
        let api = ArrApi::new("radarr", "http://radarr:7878/", "key");
        assert_eq!(api.url("queue"), "http://radarr:7878/api/v3/queue");
        assert_eq!(api.url("/command"), "http://radarr:7878/api/v3/command");
    }

    #[test]
    fn test_command_body_shape() {
        let body = serde_json::to_value(CommandBody {
            name: REFRESH_MONITORED_DOWNLOADS,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "name": "RefreshMonitoredDownloads" }));
    }
}
