//! CLI command handler: split by default; --dry-run lists the work items only.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::failure_log::FailureLog;
use crate::engine::observer::{DoneSummary, TerminalObserver, print_summary};
use crate::engine::tools::output_dir_for;
use crate::error::BatchError;
use crate::pipeline::{BatchReport, check_output_paths, enumerate_for, observe_batch, start_batch};
use crate::utils::config::{LIST_THRESHOLD, available_threads};
use crate::utils::{
    Colors, apply_file_to_opts, default_config_path, load_pagesplit_toml, setup_logging,
};

/// Build options: defaults, then config file, then CLI flags. The default config file is
/// looked up in the current directory.
///
/// Returns the options and, when the default config file exists but cannot be used, the
/// error to report once logging is set up. An explicit `--config` that is missing or invalid
/// is an error.
pub fn build_opts(cli: &Cli) -> Result<(Opts, Option<anyhow::Error>)> {
    let cwd = std::env::current_dir().ok();
    build_opts_in(cli, cwd.as_deref())
}

/// [`build_opts`] with the default config file looked up in `dir` (none when `dir` is None).
pub fn build_opts_in(cli: &Cli, dir: Option<&Path>) -> Result<(Opts, Option<anyhow::Error>)> {
    let mut opts = Opts::default();
    let mut config_problem = None;

    match (&cli.config, dir) {
        (Some(path), _) => {
            let file = load_pagesplit_toml(path)?
                .with_context(|| format!("config file {} not found", path.display()))?;
            apply_file_to_opts(&file, &mut opts);
        }
        (None, Some(dir)) => match load_pagesplit_toml(&default_config_path(dir)) {
            Ok(Some(file)) => apply_file_to_opts(&file, &mut opts),
            Ok(None) => {}
            Err(e) => config_problem = Some(e),
        },
        (None, None) => {}
    }

    if let Some(ref out) = cli.output {
        opts.batch.output_root = out.clone();
    }
    if let Some(n) = cli.chunk_size {
        opts.batch.chunk_size = n;
    }
    if cli.threads.is_some() {
        opts.batch.concurrency = cli.threads;
    }
    if let Some(v) = cli.dedupe {
        opts.batch.dedupe = v;
    }
    if let Some(v) = cli.follow_links {
        opts.batch.follow_links = v;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    opts.dry_run = cli.dry_run;
    opts.json = cli.json;
    Ok((opts, config_problem))
}

/// Summary printed with --json.
#[derive(Serialize)]
struct JsonSummary<'a> {
    total: usize,
    processed: usize,
    errors: usize,
    failures: &'a [crate::FailureRecord],
    error_log: Option<&'a Path>,
    error_log_failed: Option<String>,
}

/// Run a batch (default) or list the work when --dry-run.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let (opts, config_problem) = build_opts(cli)?;
    setup_logging(opts.verbose);
    if let Some(e) = config_problem {
        warn!("{:#}; continuing without it", e);
    }
    debug!("{} CONFIG:{:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    if opts.dry_run {
        warn!("RUNNING IN DRY-RUN MODE. NO FILES WILL BE WRITTEN.");
        return list_work(&cli.inputs, &opts);
    }

    let handle = start_batch(&cli.inputs, &opts.batch).map_err(describe_batch_error)?;
    info!(
        "Starting... ({} PDFs, threads: {})",
        handle.total(),
        handle.concurrency()
    );

    let failure_log = FailureLog::in_output_root(&opts.batch.output_root);
    let mut observer = TerminalObserver::new(handle.total(), !opts.json);
    let report = observe_batch(
        handle,
        &mut observer,
        &failure_log,
        Duration::from_millis(opts.tick_ms.max(1)),
    )
    .context("batch did not finish")?;

    let summary = observer.done().unwrap_or(DoneSummary {
        total: report.aggregate.total,
        errors: report.aggregate.errors,
        has_failures: report.aggregate.has_failures(),
    });
    if opts.json {
        print_json(&report, &failure_log)?;
    } else {
        print_summary(&summary);
        report_log_outcome(&report, failure_log.path());
    }
    Ok(())
}

fn describe_batch_error(err: BatchError) -> anyhow::Error {
    match err {
        BatchError::Config(e) => anyhow::anyhow!("invalid configuration: {e}"),
        other => anyhow::Error::new(other),
    }
}

fn report_log_outcome(report: &BatchReport, log_path: &Path) {
    match &report.persisted {
        Some(Ok(())) => info!(
            "Failure log: {}",
            Colors::colorize(Colors::PATH, &log_path.display().to_string())
        ),
        Some(Err(e)) => warn!("{}", e),
        None => {}
    }
}

fn print_json(report: &BatchReport, log: &FailureLog) -> Result<()> {
    let agg = &report.aggregate;
    let summary = JsonSummary {
        total: agg.total,
        processed: agg.processed,
        errors: agg.errors,
        failures: &agg.failures,
        error_log: matches!(report.persisted, Some(Ok(()))).then(|| log.path()),
        error_log_failed: report.persist_error().map(|e| e.to_string()),
    };
    let json = serde_json::to_string_pretty(&summary).context("serialize summary")?;
    println!("{json}");
    Ok(())
}

/// --dry-run: enumerate and print each item with its chunk folder.
fn list_work(inputs: &[PathBuf], opts: &Opts) -> Result<()> {
    let config = opts
        .batch
        .validate(available_threads())
        .context("invalid configuration")?;
    let items = enumerate_for(inputs, &config);
    if items.is_empty() {
        return Err(BatchError::NoWork.into());
    }
    check_output_paths(&items, &config.output_root)?;
    for item in items.iter().take(LIST_THRESHOLD) {
        println!(
            "{} -> {}",
            item.input.display(),
            output_dir_for(item, &config.output_root).display()
        );
    }
    if items.len() > LIST_THRESHOLD {
        println!("... and {} more", items.len() - LIST_THRESHOLD);
    }
    info!(
        "{} PDFs would be split into chunks of {} page(s) using {} thread(s)",
        items.len(),
        config.chunk_size,
        config.concurrency
    );
    Ok(())
}
