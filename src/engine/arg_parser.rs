use clap::Parser;
use std::path::PathBuf;

use crate::{CrawlStrategy, Opts};

/// Remove duplicate files under a directory, keeping the first copy found.
///
/// With THREADS the tree is crawled with one task per subdirectory and hashed by THREADS workers;
/// without it the crawl is sequential and a single worker hashes.
#[derive(Clone, Parser)]
#[command(name = "dupesweep")]
#[command(about = "Remove duplicate files (by content) under a directory, keeping the first copy found.")]
pub struct Cli {
    /// Directory to scan.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Number of hash workers (positive integer). Enables the concurrent crawl.
    #[arg(value_name = "THREADS", value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: Option<u32>,

    /// Print total, crawl, hash and resolve times in seconds.
    #[arg(long, short = 't', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub timings: Option<bool>,

    /// Report duplicates without deleting them.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub dry_run: Option<bool>,

    /// Paranoid mode: compare bytes with the kept file before deleting (detect digest collisions).
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub paranoid: Option<bool>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Ignore zero-length files.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub skip_empty: Option<bool>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Show a progress bar while hashing.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub progress: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }

    pub fn timings(&self) -> bool {
        self.timings.unwrap_or(false)
    }

    /// Run options. THREADS selects the concurrent crawl; its absence means sequential with one worker.
    pub fn opts(&self) -> Opts {
        let (crawl, num_threads) = match self.threads {
            Some(n) => (CrawlStrategy::Concurrent, n as usize),
            None => (CrawlStrategy::Sequential, 1),
        };
        Opts {
            crawl,
            num_threads,
            follow_links: self.follow_links.unwrap_or(false),
            exclude: self.exclude.clone(),
            skip_empty: self.skip_empty.unwrap_or(false),
            dry_run: self.dry_run.unwrap_or(false),
            paranoid: self.paranoid.unwrap_or(false),
            progress: self.progress.unwrap_or(false),
            verbose: self.verbose(),
        }
    }
}
