//! File registry: ordered record store shared by the crawl tasks, then sealed for hashing and resolving.
//!
//! [`FileRegistry`] is the growable phase-1 form. Appends go through one mutex, which also guards the
//! capacity bookkeeping and any reallocation. [`FileRegistry::seal`] consumes it and yields a
//! [`SealedRegistry`] whose length can no longer change; each record's digest is a write-once cell, so
//! hash workers owning disjoint indices write through `&SealedRegistry` without locking.

use log::{debug, warn};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::types::{Digest, FileRecord};
use crate::utils::config::RegistryConsts;

struct Inner {
    records: Vec<FileRecord>,
    capacity: usize,
}

/// Growable, thread-safe registry used during the crawl.
pub struct FileRegistry {
    inner: Mutex<Inner>,
}

impl Default for FileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::with_capacity(RegistryConsts::INITIAL_CAPACITY)
    }

    /// Registry with room for `capacity` records before the first growth (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                records: Vec::with_capacity(capacity),
                capacity,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking appender cannot leave a half-written record, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a record with no digest. Doubles capacity when full. Returns the record's index.
    pub fn append(&self, path: PathBuf) -> usize {
        let mut inner = self.lock();
        if inner.records.len() == inner.capacity {
            let grown = inner.capacity * RegistryConsts::GROWTH_FACTOR;
            let additional = grown - inner.records.len();
            inner.records.reserve_exact(additional);
            inner.capacity = grown;
            debug!("registry grown to {} records", grown);
        }
        let index = inner.records.len();
        inner.records.push(FileRecord::new(path));
        index
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current logical capacity (doubles on overflow).
    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    /// Snapshot of the record at `index`.
    pub fn get(&self, index: usize) -> Option<FileRecord> {
        self.lock().records.get(index).cloned()
    }

    /// End the append phase. The returned registry has a fixed length.
    pub fn seal(self) -> SealedRegistry {
        let inner = self.inner.into_inner().unwrap_or_else(|e| e.into_inner());
        SealedRegistry {
            records: inner.records.into_boxed_slice(),
        }
    }
}

/// Fixed-size registry used by the hash and resolve phases.
#[derive(Clone, Debug)]
pub struct SealedRegistry {
    records: Box<[FileRecord]>,
}

impl SealedRegistry {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FileRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    /// Store the digest for `index` and mark it valid. Returns false if the index is out of range or
    /// already has a digest (each index has exactly one writer).
    pub fn set_digest(&self, index: usize, digest: Digest) -> bool {
        let Some(record) = self.records.get(index) else {
            warn!("set_digest: index {} out of range ({} records)", index, self.len());
            return false;
        };
        if record.digest.set(digest).is_err() {
            warn!(
                "set_digest: digest for {} already written",
                record.path.display()
            );
            return false;
        }
        true
    }

    /// Paths in registry order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.records.iter().map(|r| r.path.clone()).collect()
    }
}
