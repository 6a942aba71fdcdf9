//! Destination paths inside the media library
//!
//! Movies:  `<root>/<release_name><ext>`
//! Series:  `<root>/Season <n>/<release_name><ext>` when the release name is
//! itself an episode name, else `<root>/Season <n>/<original file name>`
//! (season packs, where only the files carry the episode marker).

use std::path::{Path, PathBuf};

use super::classifier::is_episode;
use super::resolver::ResolvedTarget;

/// Folder layout a tracker's library uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryLayout {
    Movie,
    Series,
}

impl LibraryLayout {
    /// Destination for `source`, or `None` when the layout cannot place it
    /// (a series file without a parsed season).
    pub fn destination(&self, target: &ResolvedTarget, source: &Path) -> Option<PathBuf> {
        let release_name = target.classification.release_name.as_str();
        match self {
            LibraryLayout::Movie => Some(target.library_root.join(renamed(release_name, source))),
            LibraryLayout::Series => {
                let season = target.classification.season?;
                let file_name = if is_episode(release_name) {
                    renamed(release_name, source)
                } else {
                    source.file_name()?.to_string_lossy().into_owned()
                };
                Some(
                    target
                        .library_root
                        .join(format!("Season {}", season))
                        .join(file_name),
                )
            }
        }
    }
}

/// Release name carrying over the source's extension (dot included)
fn renamed(release_name: &str, source: &Path) -> String {
    match source.extension() {
        Some(ext) => format!("{}.{}", release_name, ext.to_string_lossy()),
        None => release_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::services::classifier::Classification;

    fn target(root: &str, release: &str, season: Option<u32>) -> ResolvedTarget {
        ResolvedTarget {
            library_root: PathBuf::from(root),
            classification: Classification {
                category: "x".to_string(),
                release_name: release.to_string(),
                season,
                is_episode: season.is_some(),
            },
        }
    }

    #[test]
    fn test_movie_destination() {
        let dest = LibraryLayout::Movie.destination(
            &target("/library/Some Movie (2020)", "Some.Movie.2020", None),
            Path::new("/downloads/movies/Some.Movie.2020/Some.Movie.2020.mkv"),
        );
        assert_eq!(dest, Some(PathBuf::from("/library/Some Movie (2020)/Some.Movie.2020.mkv")));
    }

    #[test]
    fn test_movie_renames_obfuscated_file() {
        let dest = LibraryLayout::Movie.destination(
            &target("/library/Some Movie (2020)", "Some.Movie.2020", None),
            Path::new("/downloads/movies/Some.Movie.2020/a8f3c2e1.MP4"),
        );
        assert_eq!(dest, Some(PathBuf::from("/library/Some Movie (2020)/Some.Movie.2020.MP4")));
    }

    #[test]
    fn test_episode_release_names_the_file() {
        let dest = LibraryLayout::Series.destination(
            &target("/library/Show", "Show.S01E02.WEB", Some(1)),
            Path::new("/downloads/tv/Show.S01E02.WEB/show-102-web.mkv"),
        );
        assert_eq!(dest, Some(PathBuf::from("/library/Show/Season 1/Show.S01E02.WEB.mkv")));
    }

    #[test]
    fn test_season_pack_keeps_file_name() {
        let dest = LibraryLayout::Series.destination(
            &target("/library/Show", "Show.Season.2.Complete", Some(2)),
            Path::new("/downloads/tv/Show.Season.2.Complete/Show.S02E05.mkv"),
        );
        assert_eq!(dest, Some(PathBuf::from("/library/Show/Season 2/Show.S02E05.mkv")));
    }

    #[test]
    fn test_series_without_season_is_skipped() {
        let dest = LibraryLayout::Series.destination(
            &target("/library/Show", "Show.Special", None),
            Path::new("/downloads/tv/Show.Special/Show.Special.mkv"),
        );
        assert_eq!(dest, None);
    }

    #[test]
    fn test_destination_is_deterministic() {
        let target = target("/library/Show", "Show.S10E01", Some(10));
        let source = Path::new("/downloads/tv/Show.S10E01/x.mkv");
        let first = LibraryLayout::Series.destination(&target, source);
        let second = LibraryLayout::Series.destination(&target, source);
        assert_eq!(first, second);
        assert_eq!(first, Some(PathBuf::from("/library/Show/Season 10/Show.S10E01.mkv")));
    }
}
