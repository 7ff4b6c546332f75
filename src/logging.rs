// src/logging.rs

use crate::errors::{DuetError, DuetResult};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use std::path::PathBuf;

const MAX_LOG_BYTES: u64 = 1_000_000;
const KEPT_LOG_FILES: usize = 3;

/// Directory for log files. The terminal belongs to the UI, so nothing is
/// logged to stdout or stderr.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("duet")
        .join("logs")
}

/// Starts file logging at `level` unless `RUST_LOG` says otherwise. The
/// returned handle must stay alive for as long as logging is wanted.
pub fn init_logging(level: &str) -> DuetResult<LoggerHandle> {
    Logger::try_with_env_or_str(level)
        .map_err(|e| DuetError::Logging(format!("invalid log level {:?}: {}", level, e)))?
        .log_to_file(FileSpec::default().directory(log_dir()).basename("duet"))
        .rotate(
            Criterion::Size(MAX_LOG_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEPT_LOG_FILES),
        )
        .format(flexi_logger::detailed_format)
        .start()
        .map_err(|e| DuetError::Logging(format!("could not start logger: {}", e)))
}
