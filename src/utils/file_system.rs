//! Tools for working with the file system.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File name of the show-level NFO in a series directory.
pub const SHOW_NFO: &str = "tvshow.nfo";

/// Returns the name of the given path without its last extension.
pub fn try_without_extension(path: impl AsRef<Path>) -> Result<String> {
    let stem = path
        .as_ref()
        .file_stem()
        .ok_or(Error::Path("Failed to get name".to_string()))?;
    let stem = stem
        .to_str()
        .ok_or(Error::Path("Failed to convert name".to_string()))?;

    Ok(stem.to_string())
}

/// Looks for the show NFO of an episode: next to it first, then one
/// directory up for `Show/Season 01/episode.nfo` layouts.
pub fn find_show_nfo(episode_nfo: impl AsRef<Path>) -> Option<PathBuf> {
    let season_dir = episode_nfo.as_ref().parent()?;

    let candidates = [Some(season_dir), season_dir.parent()];
    candidates
        .into_iter()
        .flatten()
        .map(|dir| dir.join(SHOW_NFO))
        .find(|candidate| candidate.is_file())
}

/// Generates a random filename with the specified length.
pub fn random_filename(length: usize) -> String {
    let uuid = Uuid::new_v4().to_string().replace('-', "");

    uuid.chars().take(length).collect()
}

/// A fresh path in the system temporary directory for a tags file.
pub fn temp_tags_path() -> PathBuf {
    std::env::temp_dir().join(format!("nfotags-{}.xml", random_filename(16)))
}

/// Creates the parent directory of the given destination.
/// If the parent directory already exists, nothing is done.
pub fn create_parent_dir(destination: impl AsRef<Path>) -> Result<()> {
    if let Some(parent) = destination.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}

/// Removes a temporary file and logs any errors.
/// Does not propagate errors to avoid interrupting the execution flow.
///
/// # Returns
///
/// `true` if the file was successfully deleted, `false` otherwise
pub async fn remove_temp_file(file_path: impl AsRef<Path> + std::fmt::Debug) -> bool {
    let result = tokio::fs::remove_file(&file_path).await;

    if let Err(ref e) = result {
        log::warn!("Failed to remove temporary file {:?}: {}", file_path, e);
    }

    result.is_ok()
}
