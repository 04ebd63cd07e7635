//! Error types for batch setup, individual jobs and failure-log persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid batch configuration. Raised before any job is scheduled.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("chunk size must be a positive integer (got {0})")]
    InvalidChunkSize(usize),

    #[error("thread count must be empty or a positive integer (got {0})")]
    InvalidConcurrency(usize),

    #[error("output folder must not be empty")]
    EmptyOutputRoot,
}

/// Errors that prevent a batch from starting or finishing.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Enumeration found no qualifying input.
    #[error("no PDFs found in the given inputs")]
    NoWork,

    /// Two distinct inputs would write the same chunk files.
    #[error("{first} and {second} would both write chunks named {stem}_*.pdf into {dir}")]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        dir: PathBuf,
        stem: String,
    },

    /// The coordinator thread exited without returning the aggregate.
    #[error("batch coordinator thread panicked")]
    CoordinatorLost,
}

/// Failure of a single job, as returned by a [`Transform`](crate::pipeline::Transform).
///
/// Only a description crosses the transform boundary; the source error is rendered with
/// `Display` when converting.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct JobError(pub String);

impl From<String> for JobError {
    fn from(msg: String) -> Self {
        JobError(msg)
    }
}

impl From<&str> for JobError {
    fn from(msg: &str) -> Self {
        JobError(msg.to_string())
    }
}

/// Errors from the PDF split transform.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("failed to create output folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {message}")]
    Save { path: PathBuf, message: String },

    #[error("input has no file name: {0}")]
    NoFileName(PathBuf),
}

impl From<SplitError> for JobError {
    fn from(err: SplitError) -> Self {
        JobError(err.to_string())
    }
}

/// Writing the failure log failed. Reported, but the batch totals stand.
#[derive(Debug, Error)]
#[error("failed to write failure log {path}: {source}")]
pub struct PersistError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
