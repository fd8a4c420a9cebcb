//! Dupesweep: content-based duplicate file remover
//!
//! A run has three phases, each joined before the next begins:
//! 1. crawl: discover every regular file under the root into a [`FileRegistry`], either
//!    sequentially or with one task per subdirectory;
//! 2. hash: a fixed pool of workers computes a 16-byte blake3 digest per file, worker `k` of `n`
//!    owning indices `k, k+n, ...`;
//! 3. resolve: records with equal digests are grouped and every file but the earliest-discovered
//!    one is deleted.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{DupeError, ExitCode};
pub use pipeline::RunReport;
pub use registry::{FileRegistry, SealedRegistry};

use log::debug;
use std::path::Path;

/// Result alias used by public dupesweep API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: crawl `root`, hash every file, delete duplicates (unless `opts.dry_run`).
///
/// Returns the sealed registry (every record, deleted ones included), the deletions and per-phase timings.
/// Fails before any work when `opts.num_threads` is zero, and aborts when a crawl or hash thread
/// cannot be started or joined. Per-file and per-directory I/O errors are logged and skipped.
pub fn dedupe_dir(root: &Path, opts: &Opts) -> Result<RunReport> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    pipeline::run_dedupe(root, opts)
}
