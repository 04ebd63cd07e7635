use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// Colors used in the end-of-batch summary.
pub struct Colors;

impl Colors {
    pub const OK: &'static str = "green";
    pub const ERROR: &'static str = "red";
    pub const PATH: &'static str = "cyan";

    pub fn colorize(color: &str, text: &str) -> ColoredString {
        text.color(color)
    }
}

/// Target of the per-job guard; its warnings are failed PDFs and its errors are caught panics.
const JOB_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::pipeline::error_handler");

/// How a log line is labelled after the `[pagesplit` prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineTag<'a> {
    /// Info and below: no label.
    Plain,
    /// A PDF that failed to split.
    Failed,
    /// A panic caught while splitting a PDF.
    Fault,
    /// Any other warning or error, with the last segment of its module path.
    Other { level: Level, module: &'a str },
}

pub fn line_tag(level: Level, target: &str) -> LineTag<'_> {
    match level {
        Level::Error if target == JOB_TARGET => LineTag::Fault,
        Level::Warn if target == JOB_TARGET => LineTag::Failed,
        Level::Error | Level::Warn => LineTag::Other {
            level,
            module: target.rsplit("::").next().unwrap_or(target),
        },
        _ => LineTag::Plain,
    }
}

pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // try_init: tests and lib callers may already have a logger installed.
    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // dependencies: warnings only
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            let line = match line_tag(record.level(), record.target()) {
                LineTag::Plain => format!("[{}] {}", name, record.args()),
                LineTag::Failed => format!("[{} {}] {}", name, "FAILED".yellow(), record.args()),
                LineTag::Fault => {
                    format!("[{} {}] {}", name, "FAULT".red().bold(), record.args())
                }
                LineTag::Other { level, module } => {
                    let level_str = match level {
                        Level::Error => "ERROR".red(),
                        _ => "WARN".yellow(),
                    };
                    format!("[{} {} {}] {}", name, level_str, module.white(), record.args())
                }
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
