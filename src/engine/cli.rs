//! CLI command handler: run the pipeline and print the report to stdout.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;

use crate::dedupe_dir;
use crate::engine::arg_parser::Cli;
use crate::engine::report::{write_deletions, write_records, write_timings};
use crate::engine::running_as_root;
use crate::utils::setup_logging;

/// Scan `cli.root`, delete duplicates (unless --dry-run) and print the listing.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose());
    let opts = cli.opts();
    if running_as_root() && !opts.dry_run {
        info!("Running as root. Duplicates will be deleted with root privileges.");
    }
    debug!("Sweeping {}...", cli.root.display());
    let report = dedupe_dir(&cli.root, &opts)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_records(&mut out, &report.registry).context("write file listing")?;
    write_deletions(&mut out, &report.outcome, opts.dry_run).context("write deletions")?;
    if cli.timings() {
        write_timings(&mut out, &report.timings).context("write timings")?;
    }
    out.flush().context("flush stdout")?;

    if !report.outcome.failed.is_empty() {
        log::warn!(
            "{} duplicates could not be removed",
            report.outcome.failed.len()
        );
    }
    debug!(
        "{} files, {} duplicates, {} hash failures",
        report.registry.len(),
        report.outcome.deleted.len(),
        report.hash_failures.len()
    );
    Ok(())
}
