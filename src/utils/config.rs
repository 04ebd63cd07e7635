//! Application configuration constants and batch option validation.
//! Tuning and defaults in one place.

use std::sync::OnceLock;

use crate::error::ConfigError;
use crate::types::{BatchConfig, BatchOpts};

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    error_log_filename: &'static str,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                error_log_filename: "error_log.txt",
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Config file looked up in the working directory (e.g. `.pagesplit.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Failure log written under the output root when a batch has failures.
    pub fn error_log_filename(&self) -> &str {
        self.error_log_filename
    }
}

// ---- Worker threads ----

/// Bounds for the automatic worker count. Splitting mixes disk I/O and CPU, so the count
/// follows the CPU count but stays within `[floor, ceiling]`.
#[derive(Clone, Copy, Debug)]
pub struct ConcurrencyLimits {
    pub floor: usize,
    pub ceiling: usize,
}

impl Default for ConcurrencyLimits {
    fn default() -> Self {
        Self {
            floor: Self::FLOOR_THREADS,
            ceiling: Self::CEILING_THREADS,
        }
    }
}

impl ConcurrencyLimits {
    pub const FLOOR_THREADS: usize = 2;
    pub const CEILING_THREADS: usize = 8;
}

/// Available CPU threads, as seen by rayon (honours `RAYON_NUM_THREADS`).
pub fn available_threads() -> usize {
    rayon::current_num_threads()
}

/// Worker count for a batch: `requested` when given, otherwise `cpu_count` clamped to
/// [`ConcurrencyLimits`]. A requested 0 is rejected earlier by [`BatchOpts::validate`];
/// here it falls back to the automatic value.
pub fn resolve_concurrency(requested: Option<usize>, cpu_count: usize) -> usize {
    let limits = ConcurrencyLimits::default();
    requested
        .filter(|&n| n > 0)
        .unwrap_or_else(|| cpu_count.clamp(limits.floor, limits.ceiling))
}

impl BatchOpts {
    /// Check options and resolve the worker count. Fails fast, before anything is enumerated
    /// or scheduled.
    pub fn validate(&self, cpu_count: usize) -> Result<BatchConfig, ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        if let Some(0) = self.concurrency {
            return Err(ConfigError::InvalidConcurrency(0));
        }
        if self.output_root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputRoot);
        }
        Ok(BatchConfig {
            output_root: self.output_root.clone(),
            chunk_size: self.chunk_size,
            concurrency: resolve_concurrency(self.concurrency, cpu_count),
            dedupe: self.dedupe,
            follow_links: self.follow_links,
        })
    }
}

// ---- Splitting ----

pub struct SplitConsts;

impl SplitConsts {
    /// Pages per chunk when none is configured.
    pub const DEFAULT_CHUNK_SIZE: usize = 15;
    /// Extension (lowercase) of files that qualify as work.
    pub const INPUT_EXTENSION: &'static str = "pdf";
}

// ---- Observer ----

pub struct ObserverConsts;

impl ObserverConsts {
    /// Poll interval for draining status messages (ms).
    pub const TICK_MS: u64 = 50;
}

// ---- Dry-run output ----

/// With --dry-run, at most this many items are listed on stdout; the rest are counted.
pub const LIST_THRESHOLD: usize = 100;
