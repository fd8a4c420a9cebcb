use colored::Colorize;
use env_logger::Builder;
use log::Level;
use std::io::Write;

/// Install the env_logger backend. Dependencies log at warn; this crate at info, or debug when `verbose`.
/// `RUST_LOG` overrides these levels. Safe to call more than once (later calls are ignored).
pub fn setup_logging(verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let _ = logging_builder(verbose, rust_log.as_deref()).try_init();
}

/// Builder behind [`setup_logging`]. `rust_log`, when given, replaces the default filters entirely.
pub fn logging_builder(verbose: bool, rust_log: Option<&str>) -> Builder {
    use log::LevelFilter;

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = Builder::new();
    match rust_log {
        Some(filters) => {
            builder.parse_filters(filters);
        }
        None => {
            builder
                .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
                .filter_module(env!("CARGO_PKG_NAME"), level); // Our crate: use requested level
        }
    }
    builder.format(|buf, record| {
        let name = env!("CARGO_PKG_NAME");
        let line = match record.level() {
            Level::Error | Level::Warn => {
                let level_str = match record.level() {
                    Level::Warn => "WARN".yellow(),
                    Level::Error => "ERROR".red(),
                    _ => unreachable!(),
                };
                let path = record.target().to_string().white();
                format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
            }
            Level::Debug | Level::Trace => {
                format!("[{} {}] {}", name.cyan(), "debug".dimmed(), record.args())
            }
            _ => format!("[{}] {}", name.cyan(), record.args()),
        };
        writeln!(buf, "{}", line)
    });
    builder
}
