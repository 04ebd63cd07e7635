//! Load `.pagesplit.toml` (CLI only). Lib callers pass [`BatchOpts`](crate::BatchOpts) directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct PagesplitToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    output: Option<String>,
    chunk_size: Option<usize>,
    threads: Option<usize>,
    dedupe: Option<bool>,
    follow_links: Option<bool>,
    verbose: Option<bool>,
    tick_ms: Option<u64>,
}

/// Parse config text. Errors carry the toml location.
pub fn parse_pagesplit_toml(s: &str) -> Result<PagesplitToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load the config file at `path`. `Ok(None)` when there is no file there; unreadable or
/// invalid files are errors carrying the path and the toml location.
pub fn load_pagesplit_toml(path: &Path) -> Result<Option<PagesplitToml>> {
    let s = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    parse_pagesplit_toml(&s)
        .map(Some)
        .with_context(|| format!("invalid config file {}", path.display()))
}

/// Default config location: `.pagesplit.toml` in `dir`.
pub fn default_config_path(dir: &Path) -> PathBuf {
    dir.join(PackagePaths::get().config_filename())
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $target:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$file_field {
            $target.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
/// dry_run and json are never in the file.
pub fn apply_file_to_opts(file: &PagesplitToml, opts: &mut Opts) {
    let s = &file.settings;
    if let Some(ref p) = s.output {
        opts.batch.output_root = PathBuf::from(p);
    }
    apply_file_opt!(s, opts.batch, chunk_size => chunk_size);
    if s.threads.is_some() {
        opts.batch.concurrency = s.threads;
    }
    apply_file_opt!(s, opts.batch, dedupe => dedupe);
    apply_file_opt!(s, opts.batch, follow_links => follow_links);
    apply_file_opt!(s, opts, verbose => verbose);
    apply_file_opt!(s, opts, tick_ms => tick_ms);
}
