//! A tool for executing commands.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Represents a command executor.
///
/// # Example
///
/// ```rust,no_run
/// # use std::path::PathBuf;
/// # use std::time::Duration;
/// # use nfotags::executor::Executor;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = Executor {
///     executable_path: PathBuf::from("mkvpropedit"),
///     timeout: Duration::from_secs(30),
///     args: vec!["--version".to_string()],
/// };
///
/// let output = executor.execute().await?;
/// println!("Output: {}", output.stdout);
///
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Executor {
    /// The path to the command executable.
    pub executable_path: PathBuf,
    /// The timeout for the process.
    pub timeout: Duration,

    /// The arguments to pass to the command.
    pub args: Vec<String>,
}

/// Represents the output of a process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    /// The stdout of the process.
    pub stdout: String,
    /// The stderr of the process.
    pub stderr: String,
    /// The exit code of the process.
    pub code: i32,
}

impl Executor {
    /// Executes the command and returns the output.
    ///
    /// # Errors
    ///
    /// This function will return an error if the command could not be executed,
    /// exited with a non-zero code, or timed out.
    pub async fn execute(&self) -> Result<ProcessOutput> {
        log::debug!("Executing command: {:?}", self);

        let mut command = tokio::process::Command::new(&self.executable_path);
        command.stdout(std::process::Stdio::piped());
        command.stderr(std::process::Stdio::piped());
        command.kill_on_drop(true);

        #[cfg(target_os = "windows")]
        {
            command.creation_flags(0x08000000);
        }

        command.args(&self.args);
        let mut child = command.spawn().map_err(|e| {
            Error::Command(format!(
                "Failed to start {}: {}",
                self.executable_path.display(),
                e
            ))
        })?;

        let stdout_handle = child
            .stdout
            .take()
            .ok_or_else(|| Error::Command("Failed to capture stdout".to_string()))?;
        let stderr_handle = child
            .stderr
            .take()
            .ok_or_else(|| Error::Command("Failed to capture stderr".to_string()))?;

        // Drain both pipes while waiting so a chatty child cannot block on a full buffer.
        let stdout_task = tokio::spawn(async move {
            let mut buffer = Vec::new();
            tokio::io::copy(&mut tokio::io::BufReader::new(stdout_handle), &mut buffer).await?;
            Ok::<Vec<u8>, std::io::Error>(buffer)
        });

        let stderr_task = tokio::spawn(async move {
            let mut buffer = Vec::new();
            tokio::io::copy(&mut tokio::io::BufReader::new(stderr_handle), &mut buffer).await?;
            Ok::<Vec<u8>, std::io::Error>(buffer)
        });

        let exit_status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(result) => result?,
            Err(_) => {
                log::warn!("Process timed out after {:?}, killing it", self.timeout);

                if let Err(e) = child.kill().await {
                    log::error!("Failed to kill process after timeout: {}", e);
                }

                return Err(Error::Timeout(self.timeout));
            }
        };

        let stdout_result = match stdout_task.await {
            Ok(Ok(buffer)) => buffer,
            Ok(Err(e)) => return Err(Error::IO(e)),
            Err(e) => return Err(Error::Runtime(e)),
        };

        let stderr_result = match stderr_task.await {
            Ok(Ok(buffer)) => buffer,
            Ok(Err(e)) => return Err(Error::IO(e)),
            Err(e) => return Err(Error::Runtime(e)),
        };

        // mkvpropedit localizes its messages, so don't insist on UTF-8.
        let stdout = String::from_utf8_lossy(&stdout_result).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_result).into_owned();

        let code = exit_status.code().unwrap_or(-1);
        if exit_status.success() {
            return Ok(ProcessOutput {
                stdout,
                stderr,
                code,
            });
        }

        // mkvpropedit reports its errors on stdout.
        let message = if stderr.trim().is_empty() {
            stdout.trim()
        } else {
            stderr.trim()
        };

        Err(Error::Command(format!(
            "Process failed with code {}: {}",
            code, message
        )))
    }
}
