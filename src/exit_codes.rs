//! Standard exit codes for the launcher binary
//!
//! Each `LauncherError` variant maps to one of these so scripts driving the
//! launcher can tell configuration problems from tool failures.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Invalid command-line arguments
pub const EXIT_INVALID_ARGS: i32 = 105;

/// I/O error (extraction, spawn failure, permission denied)
pub const EXIT_IO_ERROR: i32 = 106;

/// Configuration error (missing Java runtime, malformed HTTP_PROXY)
pub const EXIT_CONFIG_ERROR: i32 = 109;

/// Archive or bundled ili2fgdb.jar not found
pub const EXIT_NOT_FOUND: i32 = 111;

/// Request rejected before ili2fgdb was started
pub const EXIT_VALIDATION_ERROR: i32 = 112;

/// ili2fgdb ran and returned a non-zero status
pub const EXIT_PROCESS_ERROR: i32 = 113;

/// Terminated by SIGINT/SIGTERM after cleanup
pub const EXIT_INTERRUPTED: i32 = 130;
