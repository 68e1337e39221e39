//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once per process, writing rotating
//!   files when a directory is configured and stderr otherwise.
//!
//! # Invariants
//! - Initialisation is idempotent for identical settings.
//! - A second initialisation with different settings is rejected, never
//!   silently applied.
//! - Initialisation never panics.

use crate::config::LogSettings;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "partlab";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    settings: LogSettings,
    _logger: LoggerHandle,
}

#[derive(Debug)]
pub enum LoggingError {
    AlreadyInitialized { active: LogSettings },
    CreateDir { dir: PathBuf, source: std::io::Error },
    Backend(flexi_logger::FlexiLoggerError),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInitialized { active } => write!(
                f,
                "logging already initialized with level `{}` at {}; refusing to switch",
                active.level,
                describe_sink(active)
            ),
            Self::CreateDir { dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadyInitialized { .. } => None,
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
        }
    }
}

impl From<flexi_logger::FlexiLoggerError> for LoggingError {
    fn from(value: flexi_logger::FlexiLoggerError) -> Self {
        Self::Backend(value)
    }
}

/// Starts logging with `settings`.
///
/// # Errors
/// - `AlreadyInitialized` when logging runs with different settings.
/// - `CreateDir` when the log directory cannot be created.
/// - `Backend` when `flexi_logger` refuses the configuration.
pub fn init_logging(settings: &LogSettings) -> Result<(), LoggingError> {
    let state = LOGGING_STATE.get_or_try_init(|| start_logger(settings))?;
    if &state.settings != settings {
        return Err(LoggingError::AlreadyInitialized {
            active: state.settings.clone(),
        });
    }
    Ok(())
}

/// Settings of the running logger, or `None` before [`init_logging`].
pub fn logging_status() -> Option<LogSettings> {
    LOGGING_STATE.get().map(|state| state.settings.clone())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(settings: &LogSettings) -> Result<LoggingState, LoggingError> {
    let logger = Logger::try_with_str(settings.level)?;
    let logger = match &settings.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
                dir: dir.clone(),
                source,
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .start()?
        }
        None => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::detailed_format)
            .start()?,
    };

    info!(
        "event=logging_init module=core status=ok level={} sink={} version={}",
        settings.level,
        describe_sink(settings),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        settings: settings.clone(),
        _logger: logger,
    })
}

fn describe_sink(settings: &LogSettings) -> String {
    match &settings.dir {
        Some(dir) => dir.display().to_string(),
        None => "stderr".to_string(),
    }
}
