//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackageNames {
    pkg_name: &'static str,
    crawl_thread_name: String,
    hash_thread_prefix: String,
}

static PACKAGE_NAMES: OnceLock<PackageNames> = OnceLock::new();

impl PackageNames {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackageNames {
        PACKAGE_NAMES.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackageNames {
                pkg_name: pkg,
                crawl_thread_name: format!("{pkg}-crawl"),
                hash_thread_prefix: format!("{pkg}-hash"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Name of the thread that owns the concurrent crawl scope.
    pub fn crawl_thread_name(&self) -> &str {
        &self.crawl_thread_name
    }

    /// Name for hash worker `k`, e.g. `dupesweep-hash-3`.
    pub fn hash_thread_name(&self, worker: usize) -> String {
        format!("{}-{}", self.hash_thread_prefix, worker)
    }
}

// ---- Registry ----

/// Growth policy of the file registry.
pub struct RegistryConsts;

impl RegistryConsts {
    /// Capacity of a freshly created registry (records).
    pub const INITIAL_CAPACITY: usize = 10;
    /// Capacity multiplier applied when `len == capacity`.
    pub const GROWTH_FACTOR: usize = 2;
}

// ---- Hashing ----

/// Hashing I/O sizes and digest width.
pub struct HashingConsts;

impl HashingConsts {
    /// Chunk size for streaming a file through the hasher (bytes). 32 KiB.
    pub const HASH_READ_CHUNK_SIZE: usize = 32 * 1024;
    /// Digest width in bytes (blake3 extended output truncated to 128 bits).
    pub const DIGEST_LEN: usize = 16;
}

// ---- Worker threads ----

/// Worker count used when the caller does not ask for concurrency.
pub const DEFAULT_HASH_WORKERS: usize = 1;

// ---- Progress ----

/// Progress bar tuning.
pub struct ProgressConsts;

impl ProgressConsts {
    /// Target number of progress updates across all hash workers (~100 total).
    pub const ADAPTIVE_PROGRESS_TARGET_UPDATES: usize = 100;
    /// Minimum chunk size for adaptive progress (avoid too-frequent updates).
    pub const ADAPTIVE_CHUNK_MIN: usize = 10;
}
