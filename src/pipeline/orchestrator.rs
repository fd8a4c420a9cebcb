//! Phase orchestration: crawl → seal → hash → resolve, each fully joined before the next starts.

use anyhow::Result;
use log::debug;
use std::path::Path;
use std::thread;
use std::time::Instant;

use crate::engine::tools::check_root_dir;
use crate::error::DupeError;
use crate::pipeline::{self, CrawlContext, ResolveOpts};
use crate::registry::{FileRegistry, SealedRegistry};
use crate::utils::config::PackageNames;
use crate::{CrawlStats, CrawlStrategy, HashFailure, Opts, PhaseTimings, ResolveOutcome};

/// Everything a run produced. The registry keeps every record, including those whose files were removed.
#[derive(Debug)]
pub struct RunReport {
    pub registry: SealedRegistry,
    pub crawl: CrawlStats,
    pub hash_failures: Vec<HashFailure>,
    pub outcome: ResolveOutcome,
    pub timings: PhaseTimings,
}

/// Reject options that make the run meaningless before any work starts.
pub fn validate_opts(opts: &Opts) -> Result<()> {
    if opts.num_threads == 0 {
        return Err(DupeError::Usage("number of threads must be a positive integer".to_string()).into());
    }
    Ok(())
}

/// Phase 1. Populate a fresh registry from `root` with the configured strategy and seal it once
/// every traversal unit has finished.
pub fn crawl(root: &Path, opts: &Opts) -> Result<(SealedRegistry, CrawlStats)> {
    let ctx = CrawlContext::new(root, opts);
    let registry = FileRegistry::new();

    match opts.crawl {
        CrawlStrategy::Sequential => {
            debug!("Crawling serially");
            pipeline::crawl_sequential(&ctx, &registry);
        }
        CrawlStrategy::Concurrent => {
            debug!("Crawling with one task per directory");
            let task = PackageNames::get().crawl_thread_name().to_string();
            thread::scope(|s| -> Result<()> {
                let handle = thread::Builder::new()
                    .name(task.clone())
                    .spawn_scoped(s, || pipeline::crawl_concurrent(&ctx, &registry))
                    .map_err(|source| DupeError::TaskSpawn {
                        task: task.clone(),
                        source,
                    })?;
                handle
                    .join()
                    .map_err(|_| DupeError::TaskJoin { task: task.clone() })?;
                Ok(())
            })?;
        }
    }

    pipeline::report_skipped_paths(opts.verbose, &ctx.skipped_paths);
    let stats = ctx.stats();
    let sealed = registry.seal();
    debug!(
        "crawl done: {} files in {} directories, {} skipped",
        sealed.len(),
        stats.dirs,
        stats.skipped
    );
    Ok((sealed, stats))
}

/// Run all three phases over `root`.
pub fn run_dedupe(root: &Path, opts: &Opts) -> Result<RunReport> {
    validate_opts(opts)?;
    let start = Instant::now();
    let root = check_root_dir(root)?;

    let crawl_start = Instant::now();
    let (registry, crawl_stats) = crawl(&root, opts)?;
    let crawl_time = crawl_start.elapsed();

    let hash_start = Instant::now();
    let hash_failures = pipeline::hash_all(&registry, opts.num_threads, opts.progress)?;
    let hash_time = hash_start.elapsed();
    pipeline::report_hash_failures(&hash_failures);

    let resolve_start = Instant::now();
    let outcome = pipeline::resolve_duplicates(
        &registry,
        ResolveOpts {
            dry_run: opts.dry_run,
            paranoid: opts.paranoid,
        },
    );
    let resolve_time = resolve_start.elapsed();

    Ok(RunReport {
        registry,
        crawl: crawl_stats,
        hash_failures,
        outcome,
        timings: PhaseTimings {
            total: start.elapsed(),
            crawl: crawl_time,
            hash: hash_time,
            resolve: resolve_time,
        },
    })
}
