//! Error types for untextract.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for untextract operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while fetching, extracting or publishing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error outside of block graph parsing.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A local directory that should be uploaded does not exist.
    #[error("Local path does not exist: {}", .0.display())]
    MissingLocalPath(PathBuf),

    /// A block or result page is missing required fields.
    #[error("Malformed block graph: {0}")]
    MalformedBlockGraph(String),

    /// The analysis job finished with a FAILED status.
    #[error("Analysis job {job_id} failed: {message}")]
    JobFailed {
        /// Job identifier
        job_id: String,
        /// Status message reported by the service
        message: String,
    },

    /// The job did not reach a terminal status within the allowed time.
    #[error("Analysis job {job_id} still in progress after {waited:?}")]
    PollTimeout {
        /// Job identifier
        job_id: String,
        /// Time spent polling
        waited: Duration,
    },

    /// Polling was cancelled by the caller.
    #[error("Polling cancelled")]
    Cancelled,

    /// Error reported by the analysis service.
    #[error("Analysis service error: {0}")]
    Service(String),

    /// Error reported by the object store.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error during rendering (HTML, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
