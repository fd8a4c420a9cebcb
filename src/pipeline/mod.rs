//! Pipeline components: crawl (sequential and fan-out), hash pool, resolver, orchestration.

pub mod context;
pub mod error_handler;
pub mod fanout;
pub mod hash_pool;
pub mod orchestrator;
pub mod resolve;
pub mod walk;

pub use context::CrawlContext;
pub use error_handler::{report_hash_failures, report_skipped_paths};
pub use fanout::{UnitTracker, crawl_concurrent};
pub use hash_pool::{hash_all, strided_indices};
pub use orchestrator::{RunReport, crawl, run_dedupe, validate_opts};
pub use resolve::{ResolveOpts, group_by_digest, resolve_duplicates};
pub use walk::{WalkOutcome, crawl_sequential, run_walk_loop, to_outcome_walkdir};
