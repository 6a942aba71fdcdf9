//! arr-linker: links finished downloads into a Jellyfin library
//!
//! Watches the download landing directory, finds the matching Radarr or
//! Sonarr queue entry for each new video file, hardlinks the file into the
//! library folder that entry points at and asks Jellyfin to rescan.

pub mod app;
pub mod config;
pub mod error;
pub mod services;
