use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

const APP_DIR_NAME: &str = "arcade-snake";

/// Default log file for a binary, next to the persisted score.
#[must_use]
pub fn default_log_path(binary: &str) -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(format!("{binary}.log"));
    base
}

/// Installs a file logger. The terminal is owned by the UI, so nothing goes to stdout.
pub fn init(path: &Path, verbose: bool) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .build();

    WriteLogger::init(level, config, File::create(path)?).map_err(io::Error::other)
}
