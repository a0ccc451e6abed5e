use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `resolve_js_modules=debug`.
pub const LOG_ENV: &str = "RESOLVE_JS_LOG";

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// A subscriber appending timestamped lines to the log file at `path`.
pub fn subscriber(path: &Path) -> io::Result<impl Subscriber + Send + Sync + 'static> {
    let file = open_log(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish())
}

/// Installs the log file subscriber for the whole process.
pub fn init(path: &Path) -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(subscriber(path)?)?;
    Ok(())
}
