//! Public and internal types for the dupesweep API and pipeline.

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use crate::utils::config::{DEFAULT_HASH_WORKERS, HashingConsts};

/// Content fingerprint of a file: blake3 extended output, 16 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; HashingConsts::DIGEST_LEN]);

impl Digest {
    pub const fn from_bytes(bytes: [u8; HashingConsts::DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HashingConsts::DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex, two digits per byte.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self)
    }
}

/// One discovered regular file. The digest cell is written at most once, during the hash phase.
#[derive(Clone, Debug)]
pub struct FileRecord {
    pub path: PathBuf,
    pub(crate) digest: OnceLock<Digest>,
}

impl FileRecord {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            digest: OnceLock::new(),
        }
    }

    /// The digest, or `None` if it was never computed or the file could not be read.
    pub fn digest(&self) -> Option<Digest> {
        self.digest.get().copied()
    }

    pub fn digest_valid(&self) -> bool {
        self.digest.get().is_some()
    }
}

/// How the crawl phase discovers files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrawlStrategy {
    /// Depth-first walk on the calling thread.
    #[default]
    Sequential,
    /// One task per subdirectory; the phase ends when every spawned task has finished.
    Concurrent,
}

/// Options for [`dedupe_dir`](crate::dedupe_dir). `Default` is a sequential crawl with one hash worker.
#[derive(Clone, Debug)]
pub struct Opts {
    pub crawl: CrawlStrategy,
    /// Hash worker count. Must be at least 1.
    pub num_threads: usize,
    /// Follow symbolic links (stat instead of lstat). Directory cycles are cut.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax, e.g. `*.tmp`, `.git`).
    pub exclude: Vec<String>,
    /// Do not register zero-length files.
    pub skip_empty: bool,
    /// Report duplicates without deleting them.
    pub dry_run: bool,
    /// Compare bytes against the survivor before deleting (guards against digest collisions).
    pub paranoid: bool,
    /// Show a progress bar during the hash phase.
    pub progress: bool,
    /// List every skipped path after the crawl.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            crawl: CrawlStrategy::default(),
            num_threads: DEFAULT_HASH_WORKERS,
            follow_links: false,
            exclude: Vec::new(),
            skip_empty: false,
            dry_run: false,
            paranoid: false,
            progress: false,
            verbose: false,
        }
    }
}

/// Counts from the crawl phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub files: usize,
    pub dirs: usize,
    pub skipped: usize,
}

/// A file whose digest could not be computed.
#[derive(Clone, Debug)]
pub struct HashFailure {
    pub index: usize,
    pub path: PathBuf,
    pub message: String,
}

/// A record removed (or, in dry-run, selected for removal) as a copy of an earlier one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Duplicate {
    pub index: usize,
    pub path: PathBuf,
    pub original_index: usize,
    pub original: PathBuf,
}

/// Result of the resolve phase.
#[derive(Clone, Debug, Default)]
pub struct ResolveOutcome {
    pub deleted: Vec<Duplicate>,
    /// Removal failures: (path, error message).
    pub failed: Vec<(PathBuf, String)>,
    /// Same digest as the survivor but different bytes (paranoid mode only).
    pub collisions: Vec<PathBuf>,
}

/// Wall-clock time per phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseTimings {
    pub total: Duration,
    pub crawl: Duration,
    pub hash: Duration,
    pub resolve: Duration,
}
