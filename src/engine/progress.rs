//! Progress bar utilities for the hash phase

use kdam::{Animation, Bar, BarExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::utils::config::ProgressConsts;

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a progress bar over `total` files.
pub fn create_progress_bar(total: usize, desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = total,
        desc = desc,
        animation = Animation::Classic,
        unit = " files"
    )))
}

/// Update progress bar if available
/// Uses try_lock to avoid blocking if mutex is contended (non-blocking)
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    // If lock is contended, skip update (progress bar will catch up on next update)
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Chunk size so that all workers together produce about
/// [`ProgressConsts::ADAPTIVE_PROGRESS_TARGET_UPDATES`] updates.
pub fn adaptive_chunk_size(total: usize) -> usize {
    (total / ProgressConsts::ADAPTIVE_PROGRESS_TARGET_UPDATES).max(ProgressConsts::ADAPTIVE_CHUNK_MIN)
}

/// Increment a shared counter and update the progress bar every `chunk_size` items.
/// Call from parallel workers to reduce lock contention while still updating progress.
pub fn report_progress_batched(pb: Option<&ProgressBar>, counter: &AtomicUsize, chunk_size: usize) {
    let count = counter.fetch_add(1, Ordering::Relaxed);
    if let Some(pb) = pb {
        // Update when we've just completed a full chunk (count is 0-based before this item)
        if (count + 1).is_multiple_of(chunk_size) {
            update_progress_bar(pb, chunk_size);
        }
    }
}

/// Final progress update for the remainder after batched updates, then redraw.
/// Call once after the workers are joined with the same `total` and `chunk_size`.
pub fn finish_progress(pb: Option<&ProgressBar>, total: usize, chunk_size: usize) {
    if let Some(pb) = pb {
        let remaining = total % chunk_size;
        if let Ok(mut bar) = pb.lock() {
            if remaining > 0 {
                let _ = bar.update(remaining);
            }
            let _ = bar.refresh();
        }
        eprintln!();
    }
}
