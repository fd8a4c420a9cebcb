//! Post-crawl and post-hash summaries of what had to be left out.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::HashFailure;

/// Summarise paths the crawl had to skip. Call after the crawl barrier.
pub fn report_skipped_paths(verbose: bool, skipped_paths: &Arc<Mutex<Vec<(PathBuf, String)>>>) {
    let skipped = skipped_paths.lock().unwrap_or_else(|e| e.into_inner());
    if skipped.is_empty() {
        return;
    }
    log::warn!(
        "Skipped {} paths due to permission errors or access issues; files under them were not considered",
        skipped.len()
    );
    if verbose {
        for (p, msg) in skipped.iter() {
            eprintln!("  skipped: {} ({})", p.display(), msg);
        }
    }
}

/// Summarise files left without a digest. They are never treated as duplicates.
pub fn report_hash_failures(failures: &[HashFailure]) {
    if failures.is_empty() {
        return;
    }
    log::warn!(
        "{} files could not be hashed and were excluded from duplicate detection",
        failures.len()
    );
}
