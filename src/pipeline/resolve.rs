//! Resolve phase: group records by digest and remove every file but the earliest-discovered one
//! in each group. Single-threaded; runs only after the hash phase has been joined.

use log::{debug, warn};
use std::collections::HashMap;
use std::io::ErrorKind;

use crate::engine::hashing::files_identical;
use crate::engine::tools::inode_key;
use crate::registry::SealedRegistry;
use crate::{Digest, Duplicate, ResolveOutcome};

/// Options for [`resolve_duplicates`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ResolveOpts {
    /// Select duplicates but leave the files in place.
    pub dry_run: bool,
    /// Compare bytes with the survivor before removing a candidate.
    pub paranoid: bool,
}

/// Equivalence classes of valid digests, each listing record indices in discovery order.
/// Classes are returned in order of their first member. Records without a digest belong to none.
pub fn group_by_digest(registry: &SealedRegistry) -> Vec<Vec<usize>> {
    let mut slot_of: HashMap<Digest, usize> = HashMap::new();
    let mut classes: Vec<Vec<usize>> = Vec::new();
    for (index, record) in registry.iter().enumerate() {
        let Some(digest) = record.digest() else {
            continue;
        };
        let slot = *slot_of.entry(digest).or_insert_with(|| {
            classes.push(Vec::new());
            classes.len() - 1
        });
        classes[slot].push(index);
    }
    classes
}

/// Keep the first record of every class with more than one member and remove the files of the rest.
///
/// Same observable result as comparing every pair `(i, j)` with `i < j` and removing `j` on a match,
/// except that a removed record is never compared or removed again. Records are left untouched in
/// the registry; only the files go away.
///
/// A candidate that resolves to the same file on disk as the survivor (a followed link, a path
/// through an aliased directory, a hard link) is the survivor itself and is never removed.
pub fn resolve_duplicates(registry: &SealedRegistry, opts: ResolveOpts) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();
    for class in group_by_digest(registry) {
        let Some((&keep, rest)) = class.split_first() else {
            continue;
        };
        let Some(original) = registry.get(keep) else {
            continue;
        };
        let original_key = inode_key(&original.path);
        for &index in rest {
            let Some(candidate) = registry.get(index) else {
                continue;
            };
            if original_key.is_some() && inode_key(&candidate.path) == original_key {
                debug!(
                    "{} is the same file as {}; keeping it",
                    candidate.path.display(),
                    original.path.display()
                );
                continue;
            }
            if opts.paranoid {
                match files_identical(&original.path, &candidate.path) {
                    Ok(true) => {}
                    Ok(false) => {
                        warn!(
                            "Digest collision: {} matches {} by digest only; keeping it",
                            candidate.path.display(),
                            original.path.display()
                        );
                        outcome.collisions.push(candidate.path.clone());
                        continue;
                    }
                    Err(e)
                        if e.downcast_ref::<std::io::Error>()
                            .is_some_and(|io| io.kind() == ErrorKind::NotFound)
                            && !candidate.path.exists() =>
                    {
                        debug!("{} already gone", candidate.path.display());
                        continue;
                    }
                    Err(e) => {
                        warn!("Cannot verify {}: {:#}", candidate.path.display(), e);
                        outcome
                            .failed
                            .push((candidate.path.clone(), format!("{:#}", e)));
                        continue;
                    }
                }
            }
            let duplicate = Duplicate {
                index,
                path: candidate.path.clone(),
                original_index: keep,
                original: original.path.clone(),
            };
            if opts.dry_run {
                debug!(
                    "dry run: {} duplicates {}",
                    candidate.path.display(),
                    original.path.display()
                );
                outcome.deleted.push(duplicate);
                continue;
            }
            match std::fs::remove_file(&candidate.path) {
                Ok(()) => {
                    debug!(
                        "removed {} (copy of {})",
                        candidate.path.display(),
                        original.path.display()
                    );
                    outcome.deleted.push(duplicate);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("{} already gone", candidate.path.display());
                }
                Err(e) => {
                    warn!("Cannot delete {}: {}", candidate.path.display(), e);
                    outcome.failed.push((candidate.path.clone(), e.to_string()));
                }
            }
        }
    }
    outcome
}
