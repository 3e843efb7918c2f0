//! The errors that can occur.

use std::time::Duration;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The possible errors that can occur.
#[derive(Debug, Error)]
pub enum Error {
    /// A field had a shape other than absent, text or a list of texts.
    #[error("Malformed value for {tag}: expected text or a list of texts, found {found}")]
    MalformedInput {
        /// The tag the value was meant for.
        tag: &'static str,
        /// A short description of the shape that was found.
        found: &'static str,
    },
    /// A tag document broke one of its structural rules.
    #[error("Invalid tag document: {0}")]
    StructuralViolation(String),
    /// The NFO root element is not one we know how to map.
    #[error("Unsupported NFO root element <{0}>")]
    UnsupportedNfo(String),

    /// An error occurred while interacting with the file system.
    #[error("An IO error occurred: {0}")]
    IO(#[from] std::io::Error),
    /// An error occurred while parsing an NFO file.
    #[error("An error occurred while parsing XML: {0}")]
    XmlRead(#[from] xml::reader::Error),
    /// An error occurred while rendering the tags document.
    #[error("An error occurred while writing XML: {0}")]
    XmlWrite(#[from] xml::writer::Error),
    /// The configuration file could not be parsed.
    #[error("Malformed config file: {0}")]
    Config(#[from] toml::de::Error),

    /// An error occurred while running a command.
    #[error("Failed to execute command: {0}")]
    Command(String),
    /// An error occurred due to a timeout.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    /// An error occurred while running the runtime.
    #[error("An error occurred while running the runtime: {0}")]
    Runtime(#[from] tokio::task::JoinError),
    /// An error occurred manipulating a path.
    #[error("An invalid path was provided: {0}")]
    Path(String),
}
