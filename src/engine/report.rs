//! Report printing: per-file digest listing, deletions, phase timings.

use std::io::{self, Write};

use crate::registry::SealedRegistry;
use crate::{PhaseTimings, ResolveOutcome};

/// Shown in place of a digest for files that could not be hashed.
pub const UNAVAILABLE_DIGEST: &str = "<unavailable>";

/// `File: <path>` / `Hash: <hex>` for every record, in registry order.
pub fn write_records<W: Write>(out: &mut W, registry: &SealedRegistry) -> io::Result<()> {
    for record in registry.iter() {
        writeln!(out, "File: {}", record.path.display())?;
        match record.digest() {
            Some(digest) => writeln!(out, "Hash: {}", digest)?,
            None => writeln!(out, "Hash: {}", UNAVAILABLE_DIGEST)?,
        }
    }
    Ok(())
}

/// One line per removed (or, in dry-run, selected) duplicate.
pub fn write_deletions<W: Write>(
    out: &mut W,
    outcome: &ResolveOutcome,
    dry_run: bool,
) -> io::Result<()> {
    let prefix = if dry_run {
        "Duplicate file (dry run)"
    } else {
        "Deleted duplicate file"
    };
    for dup in &outcome.deleted {
        writeln!(out, "{}: {}", prefix, dup.path.display())?;
    }
    Ok(())
}

pub fn write_timings<W: Write>(out: &mut W, timings: &PhaseTimings) -> io::Result<()> {
    writeln!(out, "Total time: {:.6}", timings.total.as_secs_f64())?;
    writeln!(out, "Crawl time: {:.6}", timings.crawl.as_secs_f64())?;
    writeln!(out, "Hash time: {:.6}", timings.hash.as_secs_f64())?;
    writeln!(out, "Resolve time: {:.6}", timings.resolve.as_secs_f64())?;
    Ok(())
}
