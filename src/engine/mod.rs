//! Engine module: the split transform, failure log, terminal rendering and CLI

pub mod arg_parser;
pub mod cli;
pub mod failure_log;
pub mod observer;
pub mod progress;
pub mod split;
pub mod tools;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use cli::{build_opts, build_opts_in, handle_run};
pub use failure_log::{FailureLog, format_failures};
pub use observer::{DoneSummary, TerminalObserver};
pub use split::PdfSplitter;
pub use tools::{
    chunk_file_name, chunk_stem, find_output_collision, is_qualifying_file, output_dir_for,
    page_ranges,
};
