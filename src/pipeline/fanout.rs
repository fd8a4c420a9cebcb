//! Concurrent crawl: each directory is a traversal unit, and every subdirectory found spawns a new
//! unit. The spawning unit never waits for its children; the enclosing rayon scope is the barrier
//! that returns only once every unit, including transitively spawned ones, has finished.

use log::debug;
use rayon::Scope;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::registry::FileRegistry;

use super::context::CrawlContext;

/// Spawned/pending counts of traversal units.
#[derive(Default)]
pub struct UnitTracker {
    spawned: AtomicUsize,
    pending: AtomicUsize,
}

/// Held by a running unit; marks it finished on drop (also when the unit unwinds).
struct UnitGuard<'a>(&'a UnitTracker);

impl UnitTracker {
    fn register(&self) {
        self.spawned.fetch_add(1, Ordering::Relaxed);
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    fn start(&self) -> UnitGuard<'_> {
        UnitGuard(self)
    }

    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::Relaxed)
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }
}

impl Drop for UnitGuard<'_> {
    fn drop(&mut self) {
        self.0.pending.fetch_sub(1, Ordering::AcqRel);
    }
}

enum EntryKind {
    Dir,
    File(u64),
    Other,
}

/// Crawl `ctx.root` with one task per directory. Returns the number of units run.
/// Blocks until the whole tree has been traversed.
pub fn crawl_concurrent(ctx: &CrawlContext, registry: &FileRegistry) -> usize {
    let tracker = UnitTracker::default();
    if !ctx.first_visit(&ctx.root) {
        return 0;
    }
    tracker.register();
    rayon::scope(|scope| crawl_dir(scope, ctx, registry, &tracker, ctx.root.clone()));
    debug!(
        "crawl: {} traversal units, {} pending after barrier",
        tracker.spawned(),
        tracker.pending()
    );
    tracker.spawned()
}

/// One traversal unit: list `dir`, register its files, spawn a unit per subdirectory.
fn crawl_dir<'scope>(
    scope: &Scope<'scope>,
    ctx: &'scope CrawlContext,
    registry: &'scope FileRegistry,
    tracker: &'scope UnitTracker,
    dir: PathBuf,
) {
    let _unit = tracker.start();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            ctx.skip(dir, e.to_string());
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                ctx.skip(dir.clone(), e.to_string());
                continue;
            }
        };
        let path = entry.path();
        if ctx.excluded(&path) {
            continue;
        }
        match classify(&entry, ctx.follow_links) {
            Ok(EntryKind::Dir) => {
                if !ctx.first_visit(&path) {
                    continue;
                }
                ctx.enter_dir();
                tracker.register();
                scope.spawn(move |s| crawl_dir(s, ctx, registry, tracker, path));
            }
            Ok(EntryKind::File(len)) => ctx.register_file(registry, path, len),
            Ok(EntryKind::Other) => debug!("not a regular file: {}", path.display()),
            Err(e) => ctx.skip(path, e.to_string()),
        }
    }
}

/// Classify an entry. Following links means a full stat of the target; otherwise the entry's own type.
fn classify(entry: &fs::DirEntry, follow_links: bool) -> std::io::Result<EntryKind> {
    let meta = if follow_links {
        fs::metadata(entry.path())?
    } else {
        entry.metadata()?
    };
    let kind = if meta.is_dir() {
        EntryKind::Dir
    } else if meta.is_file() {
        EntryKind::File(meta.len())
    } else {
        EntryKind::Other
    };
    Ok(kind)
}
