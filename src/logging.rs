use std::fs::File;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming a log file path.
pub const LOG_FILE_ENV: &str = "MSGSYNC_LOG";

/// Where `init_tracing` sent log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Initialize tracing.
///
/// `RUST_LOG` takes precedence over `default_filter`. Output goes to stderr,
/// or to a file when `MSGSYNC_LOG` is set. Log files get unique names so
/// concurrent runs do not clobber each other: `{path}.{timestamp}.{pid}`.
/// If the file cannot be created, output falls back to stderr.
pub fn init_tracing(default_filter: &str) -> LogTarget {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let log_file = std::env::var(LOG_FILE_ENV)
        .ok()
        .and_then(|path| open_log_file(&path));

    let Some((path, file)) = log_file else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339());
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init();
        return LogTarget::Stderr;
    };

    let file_layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
    LogTarget::File(path)
}

fn open_log_file(log_path: &str) -> Option<(PathBuf, File)> {
    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = PathBuf::from(format!("{}.{}.{}", log_path, timestamp, pid));

    match File::create(&unique_path) {
        Ok(file) => Some((unique_path, file)),
        Err(err) => {
            eprintln!(
                "Warning: Failed to create log file {}: {}; logging to stderr",
                unique_path.display(),
                err
            );
            None
        }
    }
}
