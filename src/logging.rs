//! Logging setup.
//!
//! The game owns the terminal's alternate screen, so log lines go to a file
//! instead of stderr. Filtering follows `RUST_LOG` (default `info`).

use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

pub const DEFAULT_LOG_FILE: &str = "zombie_survival.log";

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Initialize the logger, writing into `path` (truncated on start).
///
/// Only the first successful call opens the file; later calls return
/// without touching it, so lines already written survive.
pub fn init(path: impl AsRef<Path>) -> std::io::Result<()> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            INSTALLED.store(false, Ordering::SeqCst);
            return Err(e);
        }
    };
    // Another logger may already be installed by the host; keep it
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    Ok(())
}
