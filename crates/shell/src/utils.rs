//! Logging and output helpers for the shell.

use std::path::{Path, PathBuf};

use ftlog::{
    appender::{FileAppender, Period},
    LevelFilter, LoggerGuard,
};
use serde::Serialize;

/// The main log file and its `-err` sibling inside `logs_dir`.
///
/// # Errors
///
/// - If `file_name` has no usable stem.
fn log_paths(logs_dir: &Path, file_name: &str) -> Result<(PathBuf, PathBuf), String> {
    let log_path = logs_dir.join(file_name);
    let stem = log_path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Invalid log file name: {file_name:?}"))?;
    let err_path = log_path.with_file_name(format!("{stem}-err"));
    Ok((log_path, err_path))
}

/// Starts logging into a `logs` directory under `out_dir`, so that each run keeps its log next to its traces.
///
/// The main file rotates daily. Warnings from ftlog's own appender go to a sibling file with an `-err` suffix.
///
/// # Arguments
///
/// - `out_dir`: The output directory of the run.
/// - `file_name`: The name of the main log file.
/// - `verbose`: Whether to also log the per-build debug statistics.
///
/// # Errors
///
/// - If the logs directory cannot be created.
/// - If `file_name` has no usable stem.
/// - If a logger is already running.
pub fn configure_logger(out_dir: &Path, file_name: &str, verbose: bool) -> Result<(LoggerGuard, PathBuf), String> {
    let logs_dir = out_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).map_err(|e| format!("Failed to create {logs_dir:?}: {e}"))?;
    let (log_path, err_path) = log_paths(&logs_dir, file_name)?;

    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let guard = ftlog::Builder::new()
        .max_log_level(level)
        .root(FileAppender::builder().path(&log_path).rotate(Period::Day).build())
        .filter("ftlog::appender", "appender-errors", LevelFilter::Warn)
        .appender("appender-errors", FileAppender::new(err_path))
        .try_init()
        .map_err(|e| format!("Failed to start logging to {log_path:?}: {e}"))?;

    Ok((guard, log_path))
}

/// Writes a value as pretty-printed JSON.
///
/// # Errors
///
/// - If the value cannot be serialized.
/// - If the file cannot be written.
pub fn write_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), String> {
    let path = path.as_ref();
    let contents = serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize {path:?}: {e}"))?;
    std::fs::write(path, contents).map_err(|e| format!("Failed to write {path:?}: {e}"))?;
    ftlog::info!("Wrote {path:?}");
    Ok(())
}
