//! Application configuration management

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Connection details and watch category for one queue tracker
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Base URL, without trailing slash
    pub host: String,

    /// API key sent as `X-Api-Key`
    pub api_key: String,

    /// Folder name under the watch root that belongs to this tracker
    pub category: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Jellyfin server address, without trailing slash
    pub jellyfin_address: String,

    /// Static Jellyfin access token
    pub jellyfin_api_key: String,

    /// Movie tracker (Radarr)
    pub radarr: TrackerConfig,

    /// Series tracker (Sonarr)
    pub sonarr: TrackerConfig,

    /// Download landing directory (NZBGet destination)
    pub watch_root: PathBuf,

    /// Lowercase file suffixes that count as video, e.g. `.mkv`
    pub video_extensions: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Every variable is required; the first missing one fails the load.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} is required", key))
        };

        let watch_root = strip_trailing_separators(&require("NZBGET_DIR")?);
        let video_extensions = parse_extensions(&require("VIDEO_EXTENSIONS")?);
        if video_extensions.is_empty() {
            bail!("VIDEO_EXTENSIONS must list at least one extension");
        }

        let radarr = TrackerConfig {
            host: trim_url(&require("RADARR_HOST")?),
            api_key: require("RADARR_API_KEY")?,
            category: require("RADARR_CATEGORY")?,
        };
        let sonarr = TrackerConfig {
            host: trim_url(&require("SONARR_HOST")?),
            api_key: require("SONARR_API_KEY")?,
            category: require("SONARR_CATEGORY")?,
        };

        if radarr.category == sonarr.category {
            bail!("RADARR_CATEGORY and SONARR_CATEGORY must differ");
        }

        Ok(Self {
            jellyfin_address: trim_url(&require("JELLYFIN_ADDRESS")?),
            jellyfin_api_key: require("JELLYFIN_API_KEY")?,
            radarr,
            sonarr,
            watch_root: PathBuf::from(watch_root),
            video_extensions,
        })
    }

    /// The two watched categories, movie first
    pub fn categories(&self) -> [String; 2] {
        [self.radarr.category.clone(), self.sonarr.category.clone()]
    }
}

fn strip_trailing_separators(path: &str) -> String {
    let trimmed = path.trim_end_matches(std::path::MAIN_SEPARATOR);
    if trimmed.is_empty() {
        // Watching "/" itself
        std::path::MAIN_SEPARATOR.to_string()
    } else {
        trimmed.to_string()
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("JELLYFIN_ADDRESS", "http://jellyfin:8096/"),
            ("JELLYFIN_API_KEY", "jf-key"),
            ("RADARR_CATEGORY", "movies"),
            ("RADARR_HOST", "http://radarr:7878"),
            ("RADARR_API_KEY", "radarr-key"),
            ("SONARR_CATEGORY", "tv"),
            ("SONARR_HOST", "http://sonarr:8989/"),
            ("SONARR_API_KEY", "sonarr-key"),
            ("NZBGET_DIR", "/downloads/completed/"),
            ("VIDEO_EXTENSIONS", ".MKV, .mp4,,.avi"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config> {
        Config::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_loads_complete_environment() {
        let config = load(&full_env()).unwrap();
        assert_eq!(config.jellyfin_address, "http://jellyfin:8096");
        assert_eq!(config.sonarr.host, "http://sonarr:8989");
        assert_eq!(config.watch_root, PathBuf::from("/downloads/completed"));
        assert_eq!(config.video_extensions, vec![".mkv", ".mp4", ".avi"]);
        assert_eq!(config.categories(), ["movies".to_string(), "tv".to_string()]);
    }

    #[test]
    fn test_missing_variable_names_the_key() {
        let mut env = full_env();
        env.remove("SONARR_API_KEY");
        let err = load(&env).unwrap_err();
        assert!(err.to_string().contains("SONARR_API_KEY"));
    }

    #[test]
    fn test_shared_category_is_rejected() {
        let mut env = full_env();
        env.insert("SONARR_CATEGORY", "movies");
        assert!(load(&env).is_err());
    }

    #[test]
    fn test_blank_extension_list_is_rejected() {
        let mut env = full_env();
        env.insert("VIDEO_EXTENSIONS", " , ,");
        assert!(load(&env).is_err());
    }
}
