//! Public and internal types for the pagesplit API and pipeline.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One unit of work: a single input document plus what is needed to place its output.
///
/// `root` is the directory the input was discovered under. For an input given directly as a
/// file it is the file's parent; for a file found by walking a directory argument it is that
/// argument, so the sub-folder structure below it can be mirrored into the output root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkItem {
    pub input: PathBuf,
    pub root: PathBuf,
    /// Pages per output chunk (> 0).
    pub chunk_size: usize,
}

impl WorkItem {
    pub fn new(input: impl Into<PathBuf>, root: impl Into<PathBuf>, chunk_size: usize) -> Self {
        Self {
            input: input.into(),
            root: root.into(),
            chunk_size,
        }
    }

    /// Directory of the input relative to `root`. Empty when the input sits directly in `root`.
    pub fn relative_dir(&self) -> PathBuf {
        self.input
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

/// Why a job failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The transform returned an error (unreadable or corrupt input, write failure, ...).
    Transform(String),
    /// The transform panicked; caught by the worker pool.
    Fault(String),
}

impl FailureReason {
    pub fn is_fault(&self) -> bool {
        matches!(self, FailureReason::Fault(_))
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Transform(msg) => write!(f, "{msg}"),
            FailureReason::Fault(msg) => write!(f, "unexpected fault: {msg}"),
        }
    }
}

/// Outcome of one job. Produced exactly once per [`WorkItem`].
#[derive(Clone, Debug)]
pub enum JobResult {
    Success {
        item: WorkItem,
        outputs: Vec<PathBuf>,
    },
    Failure {
        item: WorkItem,
        reason: FailureReason,
    },
}

impl JobResult {
    pub fn item(&self) -> &WorkItem {
        match self {
            JobResult::Success { item, .. } | JobResult::Failure { item, .. } => item,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobResult::Failure { .. })
    }
}

/// One entry of the failure list: which input failed and why.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub input: PathBuf,
    pub description: String,
    /// True when the failure came from a caught panic rather than a transform error.
    pub fault: bool,
}

/// Counts at one point in time. Always taken under the aggregator lock, so never torn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub processed: usize,
    pub total: usize,
    pub errors: usize,
}

/// Batch-wide state: counts plus failures in completion order.
///
/// `processed == errors + successes`; `errors <= processed <= total`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchAggregate {
    pub total: usize,
    pub processed: usize,
    pub errors: usize,
    pub failures: Vec<FailureRecord>,
}

impl BatchAggregate {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn successes(&self) -> usize {
        self.processed - self.errors
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            processed: self.processed,
            total: self.total,
            errors: self.errors,
        }
    }
}

/// Message from the batch to its observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    Progress {
        processed: usize,
        total: usize,
        errors: usize,
    },
    /// Terminal message. Sent exactly once, after every job has been recorded.
    Done {
        total: usize,
        errors: usize,
        has_failures: bool,
    },
}

impl From<ProgressSnapshot> for StatusMessage {
    fn from(s: ProgressSnapshot) -> Self {
        StatusMessage::Progress {
            processed: s.processed,
            total: s.total,
            errors: s.errors,
        }
    }
}

/// Options for a batch, before validation. Filled by the CLI (defaults, config file, flags)
/// or directly by library callers.
#[derive(Clone, Debug)]
pub struct BatchOpts {
    /// Where chunks (and the error log) are written.
    pub output_root: PathBuf,
    /// Pages per chunk. Must be > 0.
    pub chunk_size: usize,
    /// Worker count. When None, derived from the CPU count, see [`crate::utils::resolve_concurrency`].
    pub concurrency: Option<usize>,
    /// Keep only the first item per canonical input path. Off by default.
    pub dedupe: bool,
    /// Follow symbolic links while walking directories.
    pub follow_links: bool,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            output_root: PathBuf::new(),
            chunk_size: crate::utils::SplitConsts::DEFAULT_CHUNK_SIZE,
            concurrency: None,
            dedupe: false,
            follow_links: false,
        }
    }
}

/// Validated, immutable batch configuration. Build with [`BatchOpts::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    pub output_root: PathBuf,
    pub chunk_size: usize,
    pub concurrency: usize,
    pub dedupe: bool,
    pub follow_links: bool,
}

/// Full options (CLI). Use [`BatchOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    pub batch: BatchOpts,
    /// Show debug logging.
    pub verbose: bool,
    /// Enumerate and list work items without splitting.
    pub dry_run: bool,
    /// Print the final summary as JSON.
    pub json: bool,
    /// Observer poll interval in milliseconds.
    pub tick_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            batch: BatchOpts::default(),
            verbose: false,
            dry_run: false,
            json: false,
            tick_ms: crate::utils::ObserverConsts::TICK_MS,
        }
    }
}
