use directories::ProjectDirs;
use log::LevelFilter;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::lib::error::{ConfigError, Result};

const LOG_FILE_NAME: &str = "vpa-report.log";

/// Initialize the logger with file and stderr output
///
/// Stdout is reserved for the report itself, so console logs go to stderr.
///
/// # Arguments
///
/// * `verbose` - Enable debug level logging
/// * `quiet` - Suppress console output (logs still written to file)
///
/// # Platform-specific log locations
///
/// * **macOS**: `~/Library/Application Support/io.github.vpa-report/vpa-report.log`
/// * **Linux**: `~/.local/share/vpa-report/vpa-report.log`
/// * **Windows**: `C:\Users\<User>\AppData\Local\vpa-report\data\vpa-report.log`
///
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_path = log_file_path()?;
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| ConfigError::FileError(format!("Failed to open log file: {}", e)))?;

    let mut builder = env_logger::Builder::new();
    builder.filter_level(log_level).format_timestamp_secs();

    if quiet {
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(env_logger::Target::Pipe(Box::new(TeeWriter {
            stderr: std::io::stderr(),
            file: log_file,
        })));
    }

    // A second initialization (e.g. from tests) keeps the first logger.
    if builder.try_init().is_err() {
        return Ok(());
    }

    log::debug!("Logging to: {}", log_path.display());
    Ok(())
}

fn log_file_path() -> Result<PathBuf> {
    let log_dir = match ProjectDirs::from("io.github", "", "vpa-report") {
        Some(proj_dirs) => proj_dirs.data_local_dir().to_path_buf(),
        None => std::env::current_dir().map_err(|e| {
            ConfigError::FileError(format!("Failed to get current directory: {}", e))
        })?,
    };
    fs::create_dir_all(&log_dir)
        .map_err(|e| ConfigError::FileError(format!("Failed to create log directory: {}", e)))?;
    Ok(log_dir.join(LOG_FILE_NAME))
}

/// Writes every record to both stderr and the log file
struct TeeWriter {
    stderr: std::io::Stderr,
    file: fs::File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.stderr.write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.stderr.flush()?;
        self.file.flush()?;
        Ok(())
    }
}
