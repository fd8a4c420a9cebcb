//! Engine module: CLI surface, hashing primitives, path tools, progress and report output

pub mod arg_parser;
pub mod cli;
pub mod hashing;
pub mod progress;
pub mod report;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use hashing::{files_identical, hash_bytes, hash_file, hash_reader};
pub use report::{write_deletions, write_records, write_timings};
pub use tools::{InodeKey, check_root_dir, glob_match, inode_key, is_excluded, running_as_root};
