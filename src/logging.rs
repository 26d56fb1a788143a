use std::backtrace::Backtrace;
use std::panic;
use log::{error, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use thiserror::Error;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:<5} {t} - {m}{n}";

/// Sets up logging to file and/or stdout
///
/// Stdout is used regardless of 'log_to_stdout' if no log file is given, so the log always ends up
/// somewhere.
///
/// # Arguments
///
/// * 'log_path' - path to the log file, if any
/// * 'log_level' - level filter for the root logger
/// * 'log_to_stdout' - whether to log to stdout as well
pub fn setup_logger(log_path: Option<&str>, log_level: LevelFilter, log_to_stdout: bool) -> Result<Handle, LoggerError> {
    let mut builder = Config::builder();
    let mut root = Root::builder();

    if let Some(path) = log_path {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(path)
            .map_err(|e| LoggerError(format!("log file {}: {}", path, e)))?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    if log_to_stdout || log_path.is_none() {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    let config = builder
        .build(root.build(log_level))
        .map_err(|e| LoggerError(e.to_string()))?;

    let handle = log4rs::init_config(config)
        .map_err(|e| LoggerError(e.to_string()))?;

    log_panics();

    Ok(handle)
}

/// Routes panics to the log, backtrace included, instead of stderr only
///
fn log_panics() {
    panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::force_capture();
        error!("panic: {}\n{}", info, backtrace);
    }));
}

/// Error depicting errors that occur while setting up logging
///
#[derive(Debug, Error)]
#[error("LoggerError: {0}")]
pub struct LoggerError(pub String);
