//! Jellyfin client: startup authentication check and library rescans

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ClientError;

const SERVICE: &str = "jellyfin";

/// Anything that can be asked to rescan the media library
#[async_trait]
pub trait LibraryRefresher: Send + Sync {
    async fn refresh_library(&self) -> Result<(), ClientError>;
}

/// Subset of `/System/Info` logged at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemInfo {
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Jellyfin API client using a static access token
#[derive(Debug, Clone)]
pub struct JellyfinClient {
    address: String,
    api_key: String,
    client: Client,
}

impl JellyfinClient {
    pub fn new(address: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            address: address.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.address, path.trim_start_matches('/'))
    }

    /// Verify the token against the server once at startup
    pub async fn authenticate(&self) -> Result<SystemInfo, ClientError> {
        let url = self.url("System/Info");
        let response = self
            .client
            .get(&url)
            .header("X-Emby-Token", &self.api_key)
            .send()
            .await
            .map_err(ClientError::http(SERVICE))?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                service: SERVICE,
                status: response.status(),
                url,
            });
        }

        let info: SystemInfo = response.json().await.map_err(ClientError::http(SERVICE))?;
        info!(
            server = info.server_name.as_deref().unwrap_or("unknown"),
            version = info.version.as_deref().unwrap_or("unknown"),
            "Authenticated with Jellyfin"
        );
        Ok(info)
    }
}

#[async_trait]
impl LibraryRefresher for JellyfinClient {
    async fn refresh_library(&self) -> Result<(), ClientError> {
        let url = self.url("Library/Refresh");
        debug!(url = %url, "Requesting library refresh");

        let response = self
            .client
            .post(&url)
            .header("X-Emby-Token", &self.api_key)
            .send()
            .await
            .map_err(ClientError::http(SERVICE))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::Status {
                service: SERVICE,
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
    fn test_url_building() {
        let client = JellyfinClient::new("http://jellyfin:8096/", "token");
        assert_eq!(client.url("/Library/Refresh"), "http://jellyfin:8096/Library/Refresh");
    }

    #[test]
    fn test_system_info_decodes() {
        let info: SystemInfo = serde_json::from_str(
            r#"{ "ServerName": "media", "Version": "10.9.11", "Id": "abc" }"#,
        )
        .unwrap();
        assert_eq!(info.server_name.as_deref(), Some("media"));
        assert_eq!(info.version.as_deref(), Some("10.9.11"));
    }
}
