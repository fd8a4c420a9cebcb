//! Hash phase: a fixed number of worker threads, worker `k` of `n` owning indices `k, k+n, k+2n, ...`.
//! Ownership is disjoint by construction, so digests are written through a shared `&SealedRegistry`
//! without locking. Per-file failures travel back on a channel and are collected after the join.

use anyhow::Result;
use crossbeam_channel::{Sender, unbounded};
use log::{debug, warn};
use std::sync::atomic::AtomicUsize;
use std::thread;

use crate::HashFailure;
use crate::engine::hashing::hash_file;
use crate::engine::progress::{
    ProgressBar, adaptive_chunk_size, create_progress_bar, finish_progress,
    report_progress_batched,
};
use crate::error::DupeError;
use crate::registry::SealedRegistry;
use crate::utils::config::PackageNames;

/// Indices owned by worker `worker` out of `num_workers`, over a registry of `len` records.
pub fn strided_indices(worker: usize, num_workers: usize, len: usize) -> impl Iterator<Item = usize> {
    (worker..len).step_by(num_workers.max(1))
}

struct WorkerShared<'a> {
    registry: &'a SealedRegistry,
    num_workers: usize,
    failure_tx: Sender<HashFailure>,
    bar: Option<&'a ProgressBar>,
    counter: &'a AtomicUsize,
    chunk_size: usize,
}

fn hash_worker_loop(worker: usize, shared: WorkerShared<'_>) -> usize {
    let mut hashed = 0_usize;
    for index in strided_indices(worker, shared.num_workers, shared.registry.len()) {
        let Some(record) = shared.registry.get(index) else {
            break;
        };
        match hash_file(&record.path) {
            Ok(digest) => {
                if shared.registry.set_digest(index, digest) {
                    hashed += 1;
                }
            }
            Err(e) => {
                let message = format!("{:#}", e);
                warn!("Cannot hash {}: {}", record.path.display(), message);
                let failure = HashFailure {
                    index,
                    path: record.path.clone(),
                    message,
                };
                if let Err(e) = shared.failure_tx.send(failure) {
                    debug!("failure for index {} not reported: {}", index, e);
                }
            }
        }
        report_progress_batched(shared.bar, shared.counter, shared.chunk_size);
    }
    hashed
}

/// Compute digests for every record with `num_workers` threads and wait for all of them.
/// Returns the failures ordered by index. A worker that cannot be started or panics fails the run.
pub fn hash_all(
    registry: &SealedRegistry,
    num_workers: usize,
    show_progress: bool,
) -> Result<Vec<HashFailure>> {
    if num_workers == 0 {
        return Err(DupeError::Usage("worker count must be a positive integer".to_string()).into());
    }
    let total = registry.len();
    let bar = show_progress.then(|| create_progress_bar(total, "Hashing"));
    let counter = AtomicUsize::new(0);
    let chunk_size = adaptive_chunk_size(total);
    let (failure_tx, failure_rx) = unbounded::<HashFailure>();

    let names = PackageNames::get();
    let hashed = thread::scope(|s| -> Result<usize> {
        let mut handles = Vec::with_capacity(num_workers);
        for worker in 0..num_workers {
            let name = names.hash_thread_name(worker);
            let shared = WorkerShared {
                registry,
                num_workers,
                failure_tx: failure_tx.clone(),
                bar: bar.as_ref(),
                counter: &counter,
                chunk_size,
            };
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn_scoped(s, move || hash_worker_loop(worker, shared))
                .map_err(|source| DupeError::TaskSpawn { task: name, source })?;
            handles.push(handle);
        }
        // Join every worker before inspecting any result.
        let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
        let mut hashed = 0;
        for (worker, result) in joined.into_iter().enumerate() {
            hashed += result.map_err(|_| DupeError::TaskJoin {
                task: names.hash_thread_name(worker),
            })?;
        }
        Ok(hashed)
    })?;
    // Dropping the last sender closes the channel so the drain below terminates.
    drop(failure_tx);
    finish_progress(bar.as_ref(), total, chunk_size);

    let mut failures: Vec<HashFailure> = failure_rx.iter().collect();
    failures.sort_by_key(|f| f.index);
    debug!(
        "hash: {} of {} files hashed by {} workers, {} failed",
        hashed,
        total,
        num_workers,
        failures.len()
    );
    Ok(failures)
}
