//! Download path classification
//!
//! Derives everything the reconciler needs from a raw path under the watch
//! root, laid out as `<watch_root>/<category>/<release_name>/<file...>`:
//! - "/downloads/movies/Some.Movie.2020/Some.Movie.2020.mkv" -> category "movies"
//! - "/downloads/tv/Show.S01E02.WEB/Show.S01E02.WEB.mkv" -> season 1, episode marker
//!
//! Pure functions only; nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{ReconcileError, ReconcileResult};

/// The one episode marker release names use: `S01E02`, any case.
static EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)s(?P<season>\d+)e(?P<episode>\d+)").expect("valid episode pattern"));

/// What a download path says about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// One of the configured categories, or empty
    pub category: String,
    /// Release folder name; empty when the category did not match
    pub release_name: String,
    pub season: Option<u32>,
    pub is_episode: bool,
}

impl Classification {
    pub fn has_category(&self) -> bool {
        !self.category.is_empty()
    }
}

/// Classifies paths relative to a fixed watch root and category pair
#[derive(Debug, Clone)]
pub struct PathClassifier {
    watch_root: PathBuf,
    categories: [String; 2],
    video_extensions: Vec<String>,
}

impl PathClassifier {
    pub fn new(
        watch_root: impl Into<PathBuf>,
        categories: [String; 2],
        video_extensions: Vec<String>,
    ) -> Self {
        Self {
            watch_root: watch_root.into(),
            categories,
            video_extensions: video_extensions
                .into_iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    /// Classify a path.
    ///
    /// Paths outside the categories classify with an empty category. A path
    /// inside a category without a release folder is `MalformedPath`.
    pub fn classify(&self, path: &Path) -> ReconcileResult<Classification> {
        let category = self.category(path);
        let release_name = if category.is_empty() {
            String::new()
        } else {
            self.release_name(path)?
        };

        // Markers are only looked for below the watch root.
        let relative = path.strip_prefix(&self.watch_root).unwrap_or(path);
        Ok(Classification {
            category,
            release_name,
            season: season(relative),
            is_episode: is_episode(&relative.to_string_lossy()),
        })
    }

    /// First segment under the watch root, if it is a configured category
    pub fn category(&self, path: &Path) -> String {
        match self.segments(path).into_iter().next() {
            Some(first) if self.categories.contains(&first) => first,
            _ => String::new(),
        }
    }

    /// Second segment under the watch root (the release folder)
    pub fn release_name(&self, path: &Path) -> ReconcileResult<String> {
        self.segments(path)
            .into_iter()
            .nth(1)
            .ok_or_else(|| ReconcileError::MalformedPath {
                path: path.to_path_buf(),
            })
    }

    /// Whether the lowercase path ends with a configured video suffix
    pub fn is_video(&self, path: &Path) -> bool {
        let lower = path.to_string_lossy().to_lowercase();
        self.video_extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }

    fn segments(&self, path: &Path) -> Vec<String> {
        let Ok(relative) = path.strip_prefix(&self.watch_root) else {
            return Vec::new();
        };
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }
}

/// Sample clips ship next to the real file and must never be linked
pub fn is_sample(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().contains("sample")
}

/// Season number from the first episode marker in the path
pub fn season(path: &Path) -> Option<u32> {
    let text = path.to_string_lossy();
    let digits = EPISODE_RE.captures(&text)?.name("season")?.as_str();
    match digits.parse() {
        Ok(season) => Some(season),
        Err(e) => {
            debug!(path = %path.display(), season = digits, error = %e, "Unusable season number");
            None
        }
    }
}

/// Whether the text carries an episode marker
pub fn is_episode(text: &str) -> bool {
    EPISODE_RE.is_match(text)
}
