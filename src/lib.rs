//! ili2fgdb launcher
//!
//! Stages the bundled ili2fgdb distribution, assembles its command line for
//! schema imports, imports, exports and updates of Esri File Geodatabases,
//! and runs it on a Java runtime.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,
    unreachable_pub,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,
)]
#![warn(
    // Documentation
    missing_docs,

    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::too_many_arguments,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::single_match_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![allow(
    missing_docs,
)]

pub mod api;
pub mod arguments;
pub mod config;
pub mod exceptions;
pub mod exit_codes;
pub mod launcher;
pub mod logger;
pub mod version;

// Re-export main API
pub use api::{load_request, run_request, run_request_file};
pub use arguments::{
    ArgumentList, BuildContext, ExportRequest, ImportRequest, InheritanceFlags, InheritanceMode,
    OperationKind, OperationRequest, SchemaImportRequest, SpatialReference, UpdateRequest,
};
pub use config::{ProxyConfig, RuntimeConfig};
pub use exceptions::{LauncherError, ProcessFailure, Result};
pub use launcher::{LaunchOptions, Launcher, cleanup_registered, invoke};
