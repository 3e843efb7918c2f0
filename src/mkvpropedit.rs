//! Applies a tags file to a Matroska container with `mkvpropedit`.

use crate::error::{Error, Result};
use crate::executor::{Executor, ProcessOutput};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_EXECUTABLE: &str = "mkvpropedit";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq)]
pub struct TagApplier {
    pub executable: PathBuf,
    pub timeout: Duration,
}

impl Default for TagApplier {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TagApplier {
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    /// Arguments replacing every tag in `media` with the ones in `tags_file`.
    pub fn args(media: &Path, tags_file: &Path) -> Result<Vec<String>> {
        let media = path_str(media)?;
        let tags_file = path_str(tags_file)?;

        Ok(vec![
            media.to_string(),
            "--tags".to_string(),
            format!("all:{tags_file}"),
        ])
    }

    /// Runs `mkvpropedit <media> --tags all:<tags_file>`.
    ///
    /// # Errors
    ///
    /// Any failure to start the tool, a non-zero exit or a timeout.
    pub async fn apply(&self, media: &Path, tags_file: &Path) -> Result<ProcessOutput> {
        let executor = Executor {
            executable_path: self.executable.clone(),
            timeout: self.timeout,
            args: Self::args(media, tags_file)?,
        };

        let output = executor.execute().await?;
        log::info!("Applied tags to {}", media.display());
        log::debug!("{}", output.stdout.trim());

        Ok(output)
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| Error::Path(format!("{} is not valid UTF-8", path.display())))
}
