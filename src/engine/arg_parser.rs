use clap::Parser;
use std::path::PathBuf;

/// Split PDFs into fixed-size page-range chunks, in parallel.
#[derive(Clone, Parser)]
#[command(name = "pagesplit")]
#[command(about = "Split PDFs (or folders of PDFs) into page-range chunks; use --dry-run to list the work only.")]
pub struct Cli {
    /// PDF files and/or folders. Folders are searched recursively.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output folder. Sub-folders of dropped folders are mirrored under it.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Pages per chunk. Default: 15.
    #[arg(long, short = 'c')]
    pub chunk_size: Option<usize>,

    /// Worker threads. Default: CPU count clamped to 2..=8.
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Skip inputs already reached through another argument (same file, canonical path).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub dedupe: Option<bool>,

    /// Follow symbolic links when searching folders.
    #[arg(long, short = 'f', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// List the PDFs that would be split and where their chunks would go; write nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the final summary as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Verbose output. `--verbose=false` overrides a config file setting.
    #[arg(long, short = 'v', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Config file. Default: `.pagesplit.toml` in the current folder, if present.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
