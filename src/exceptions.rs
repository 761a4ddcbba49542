//! Error types for the ili2fgdb launcher

use crate::exit_codes::{
    EXIT_CONFIG_ERROR, EXIT_ERROR, EXIT_IO_ERROR, EXIT_NOT_FOUND, EXIT_PROCESS_ERROR,
    EXIT_VALIDATION_ERROR,
};
use std::fmt;

/// Details of an ili2fgdb run that ended with a non-zero exit status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessFailure {
    /// The full command line that was executed
    pub command: String,
    /// Merged stdout/stderr of the child process
    pub output: String,
    /// Exit code, `-1` if the child was terminated by a signal
    pub exit_code: i32,
}

impl fmt::Display for ProcessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Execution of {} failed\nili2fgdb output:\n{}\n\nReturn code: {}",
            self.command, self.output, self.exit_code
        )
    }
}

/// Main error type for launcher operations
#[derive(Debug)]
pub enum LauncherError {
    /// Runtime configuration is missing or malformed
    Configuration(String),

    /// Archive or bundled artifact could not be found
    NotFound(String),

    /// Request parameters are missing or contradictory
    Validation(String),

    /// ili2fgdb exited with a non-zero status
    Process(ProcessFailure),

    /// IO error
    IoError(std::io::Error),

    /// JSON parsing error
    JsonError(serde_json::Error),

    /// Generic error with message
    Generic(String),
}

impl LauncherError {
    /// Shorthand for a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        LauncherError::Validation(msg.into())
    }

    /// Process exit code a binary should use for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LauncherError::Configuration(_) => EXIT_CONFIG_ERROR,
            LauncherError::NotFound(_) => EXIT_NOT_FOUND,
            LauncherError::Validation(_) => EXIT_VALIDATION_ERROR,
            LauncherError::Process(_) => EXIT_PROCESS_ERROR,
            LauncherError::IoError(_) => EXIT_IO_ERROR,
            LauncherError::JsonError(_) | LauncherError::Generic(_) => EXIT_ERROR,
        }
    }
}

impl fmt::Display for LauncherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LauncherError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            LauncherError::NotFound(msg) => write!(f, "Not found: {msg}"),
            LauncherError::Validation(msg) => write!(f, "Invalid request: {msg}"),
            LauncherError::Process(failure) => write!(f, "{failure}"),
            LauncherError::IoError(err) => write!(f, "IO error: {err}"),
            LauncherError::JsonError(err) => write!(f, "JSON error: {err}"),
            LauncherError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LauncherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LauncherError::IoError(err) => Some(err),
            LauncherError::JsonError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LauncherError {
    fn from(err: std::io::Error) -> Self {
        LauncherError::IoError(err)
    }
}

impl From<serde_json::Error> for LauncherError {
    fn from(err: serde_json::Error) -> Self {
        LauncherError::JsonError(err)
    }
}

impl From<zip::result::ZipError> for LauncherError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(err) => LauncherError::IoError(err),
            other => LauncherError::Generic(format!("invalid zip archive: {other}")),
        }
    }
}

impl From<ProcessFailure> for LauncherError {
    fn from(failure: ProcessFailure) -> Self {
        LauncherError::Process(failure)
    }
}

/// Result type for launcher operations
pub type Result<T> = std::result::Result<T, LauncherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failure_message_carries_everything() {
        let err = LauncherError::from(ProcessFailure {
            command: "java -d64 -jar ili2fgdb.jar --import x.xtf".to_string(),
            output: "Error: model not found".to_string(),
            exit_code: 1,
        });
        let msg = err.to_string();
        assert!(msg.contains("java -d64 -jar ili2fgdb.jar --import x.xtf"));
        assert!(msg.contains("Error: model not found"));
        assert!(msg.contains("Return code: 1"));
        assert_eq!(err.exit_code(), EXIT_PROCESS_ERROR);
    }

    #[test]
    fn test_exit_codes_per_kind() {
        assert_eq!(
            LauncherError::Configuration("x".into()).exit_code(),
            EXIT_CONFIG_ERROR
        );
        assert_eq!(LauncherError::NotFound("x".into()).exit_code(), EXIT_NOT_FOUND);
        assert_eq!(
            LauncherError::validation("x").exit_code(),
            EXIT_VALIDATION_ERROR
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(LauncherError::from(io).exit_code(), EXIT_IO_ERROR);
    }

    #[test]
    fn test_zip_errors_keep_io_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err = LauncherError::from(zip::result::ZipError::Io(io));
        assert!(matches!(err, LauncherError::IoError(_)));

        let err = LauncherError::from(zip::result::ZipError::FileNotFound);
        assert!(matches!(err, LauncherError::Generic(_)));
        assert!(err.to_string().starts_with("invalid zip archive"));
    }
}
