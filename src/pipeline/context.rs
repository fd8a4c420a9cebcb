//! Crawl context: root, filters and shared skip/accounting state seen by every traversal unit.

use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::engine::tools::is_excluded;
use crate::registry::FileRegistry;
use crate::{CrawlStats, Opts};

/// Shared context for the crawl phase. Built once per run and borrowed by every traversal unit,
/// sequential or concurrent.
pub struct CrawlContext {
    pub root: PathBuf,
    pub exclude: Vec<String>,
    pub follow_links: bool,
    pub skip_empty: bool,
    pub skipped_paths: Arc<Mutex<Vec<(PathBuf, String)>>>,
    pub files: AtomicUsize,
    pub dirs: AtomicUsize,
    /// Canonical directories already entered; only consulted when following links.
    visited: Mutex<HashSet<PathBuf>>,
}

impl CrawlContext {
    pub fn new(root: &Path, opts: &Opts) -> Self {
        Self {
            root: root.to_path_buf(),
            exclude: opts.exclude.clone(),
            follow_links: opts.follow_links,
            skip_empty: opts.skip_empty,
            skipped_paths: Arc::new(Mutex::new(Vec::new())),
            files: AtomicUsize::new(0),
            dirs: AtomicUsize::new(0),
            visited: Mutex::new(HashSet::new()),
        }
    }

    /// Record an entry or subtree that could not be read. The crawl carries on elsewhere.
    pub fn skip(&self, path: PathBuf, msg: String) {
        warn!("Skipping {}: {}", path.display(), msg);
        self.skipped_paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((path, msg));
    }

    pub fn excluded(&self, path: &Path) -> bool {
        path != self.root.as_path() && is_excluded(path, &self.exclude)
    }

    /// Append a regular file to the registry unless it is filtered out.
    pub fn register_file(&self, registry: &FileRegistry, path: PathBuf, len: u64) {
        if self.skip_empty && len == 0 {
            debug!("skip empty file {}", path.display());
            return;
        }
        registry.append(path);
        self.files.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a directory about to be traversed.
    pub fn enter_dir(&self) {
        self.dirs.fetch_add(1, Ordering::Relaxed);
    }

    /// True the first time a directory is seen (by canonical path). Always true when links are not
    /// followed, since a plain tree has no cycles.
    pub fn first_visit(&self, dir: &Path) -> bool {
        if !self.follow_links {
            return true;
        }
        let canonical = match dir.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                self.skip(dir.to_path_buf(), e.to_string());
                return false;
            }
        };
        let first = self
            .visited
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(canonical);
        if !first {
            debug!("already visited {}, not descending", dir.display());
        }
        first
    }

    pub fn stats(&self) -> CrawlStats {
        CrawlStats {
            files: self.files.load(Ordering::Relaxed),
            dirs: self.dirs.load(Ordering::Relaxed),
            skipped: self
                .skipped_paths
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .len(),
        }
    }
}
