//! pagesplit CLI: split PDFs into chunks; use --dry-run to list the work without writing.

use anyhow::Result;
use clap::Parser;
use pagesplit::engine::arg_parser::Cli;
use pagesplit::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
