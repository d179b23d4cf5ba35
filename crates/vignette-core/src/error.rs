//! Error metadata
//!
//! Library crates define their own `thiserror` enums; this module provides the
//! trait those enums implement so callers (the CLI, embedding services) can
//! decide how to log and report a failure without matching on every variant.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like invalid input
    Debug,
    /// Warning level - for bad uploads and recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Self-description of an error for reporting purposes
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UNSUPPORTED_FORMAT")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same operation may succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Message safe to show to whoever submitted the upload
    fn client_message(&self) -> String;
}

/// Emit a tracing event for `err` at the level it declares.
pub fn log_error<E>(err: &E, context: &str)
where
    E: ErrorMetadata + std::fmt::Display,
{
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %err, code = err.error_code(), "{}", context)
        }
        LogLevel::Warn => {
            tracing::warn!(error = %err, code = err.error_code(), "{}", context)
        }
        LogLevel::Error => {
            tracing::error!(error = %err, code = err.error_code(), "{}", context)
        }
    }
}
