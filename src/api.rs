//! High-level API for one-shot ili2fgdb runs

use crate::arguments::OperationRequest;
use crate::config::RuntimeConfig;
use crate::exceptions::Result;
use crate::launcher::{LaunchOptions, Launcher};
use log::debug;
use std::path::Path;

/// Read a JSON request file, `{"operation": "import", ...}`
pub fn load_request(request_path: &Path) -> Result<OperationRequest> {
    let request_data = std::fs::read_to_string(request_path)?;
    let request: OperationRequest = serde_json::from_str(&request_data)?;
    debug!("📄 Loaded {} request from {request_path:?}", request.kind());
    Ok(request)
}

/// Stage the archive, run a single request and release again
pub fn run_request(
    config: RuntimeConfig,
    options: LaunchOptions,
    request: &OperationRequest,
) -> Result<String> {
    let mut launcher = Launcher::new(config, options)?;
    let output = launcher.run(request);
    launcher.release()?;
    output
}

/// Run the request stored in `request_path`
pub fn run_request_file(
    config: RuntimeConfig,
    options: LaunchOptions,
    request_path: &Path,
) -> Result<String> {
    let request = load_request(request_path)?;
    run_request(config, options, &request)
}
