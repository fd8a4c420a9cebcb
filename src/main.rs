//! Dupesweep CLI: remove duplicate files under a directory.

use clap::Parser;
use dupesweep::ExitCode;
use dupesweep::engine::{Cli, handle_run};
use std::time::Instant;

fn main() -> std::process::ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    match handle_run(&cli) {
        Ok(()) => {
            log::debug!("Total time: {:?}", start_time.elapsed());
            ExitCode::Success.into()
        }
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::from_error(&e).into()
        }
    }
}
