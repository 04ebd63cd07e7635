//! Failure log file: one block per failed input, written under the output root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::FailureRecord;
use crate::error::PersistError;
use crate::pipeline::FailureSink;
use crate::utils::config::PackagePaths;

/// Writes `error_log.txt` (replacing any previous one). Each failure is the input path on one
/// line and the error description on the next, with a blank line between failures.
#[derive(Clone, Debug)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log at the default file name under `output_root`.
    pub fn in_output_root(output_root: &Path) -> Self {
        Self::new(output_root.join(PackagePaths::get().error_log_filename()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render failures in the log format.
pub fn format_failures(failures: &[FailureRecord]) -> String {
    failures
        .iter()
        .map(|f| format!("{}\n{}\n", f.input.display(), f.description))
        .collect::<Vec<_>>()
        .join("\n")
}

impl FailureSink for FailureLog {
    fn persist(&self, failures: &[FailureRecord]) -> Result<(), PersistError> {
        let to_err = |source| PersistError {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(to_err)?;
        }
        fs::write(&self.path, format_failures(failures)).map_err(to_err)
    }
}
