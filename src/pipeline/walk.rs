//! Sequential crawl: depth-first walk on the calling thread.

use std::path::PathBuf;

use crate::registry::FileRegistry;

use super::context::CrawlContext;

/// One result from a directory walk: either an entry to classify or an error with optional path.
pub enum WalkOutcome {
    Ok(walkdir::DirEntry),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => WalkOutcome::Ok(entry),
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Walk `ctx.root` depth-first and append every regular file to `registry`.
/// Unreadable directories and entries whose status cannot be read are recorded as skipped.
/// When following links, a directory reached again under another path is not descended twice.
pub fn crawl_sequential(ctx: &CrawlContext, registry: &FileRegistry) {
    let iter = walkdir::WalkDir::new(&ctx.root)
        .follow_links(ctx.follow_links)
        .into_iter()
        .filter_entry(|e| {
            !ctx.excluded(e.path()) && (!e.file_type().is_dir() || ctx.first_visit(e.path()))
        })
        .map(to_outcome_walkdir);
    run_walk_loop(ctx, registry, iter);
}

/// Consume `iter`, classifying each entry: directories are counted, regular files registered,
/// anything else (sockets, fifos, unfollowed links) ignored.
pub fn run_walk_loop<I>(ctx: &CrawlContext, registry: &FileRegistry, iter: I)
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut last_path: Option<PathBuf> = None;
    for outcome in iter {
        match outcome {
            WalkOutcome::Ok(entry) => {
                let file_type = entry.file_type();
                if file_type.is_dir() {
                    if entry.depth() > 0 {
                        ctx.enter_dir();
                    }
                } else if file_type.is_file() {
                    match entry.metadata() {
                        Ok(meta) => ctx.register_file(registry, entry.path().to_path_buf(), meta.len()),
                        Err(err) => ctx.skip(entry.path().to_path_buf(), err.to_string()),
                    }
                } else {
                    log::debug!("not a regular file: {}", entry.path().display());
                }
                last_path = Some(entry.into_path());
            }
            WalkOutcome::Err { msg, path } => {
                let to_push = path.unwrap_or_else(|| {
                    PathBuf::from(format!(
                        "<no-path, last was {}>",
                        last_path
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "<none>".to_string())
                    ))
                });
                ctx.skip(to_push, msg);
            }
        }
    }
}
