// File logging for LANPong
// The terminal belongs to the TUI, so every log line goes to a file instead

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Level;

const LOG_FILE_NAME: &str = "lanpong.log";

/// Where the log ends up: `lanpong.log` in the system temp directory
pub fn log_file_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

pub fn max_level(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the global subscriber. `debug` lowers the level from INFO to DEBUG.
///
/// The file is truncated at startup. To follow a session: `tail -f` the path
/// printed by `--help`.
pub fn init(debug: bool) -> io::Result<PathBuf> {
    let path = log_file_path();
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(true)
        .with_max_level(max_level(debug))
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    Ok(path)
}
