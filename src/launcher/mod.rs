//! Launcher facade: staged ili2fgdb plus runtime configuration
//!
//! A [`Launcher`] extracts the bundled archive once and then runs any number
//! of operations against the extracted jar until it is released.

pub mod command;
mod extraction;
pub mod staging;

pub use command::{SIDECAR_LOG, ToolCommand, invoke};
pub use staging::{StagedArchive, TOOL_JAR, cleanup_registered};

use crate::arguments::{
    ArgumentList, BuildContext, ExportRequest, ImportRequest, OperationRequest,
    SchemaImportRequest, UpdateRequest, export_args, import_args, schema_import_args, update_args,
};
use crate::config::RuntimeConfig;
use crate::exceptions::{LauncherError, Result};
use crate::version::default_archive_names;
use log::{debug, info};
use std::env;
use std::path::{Path, PathBuf};

/// Options for creating a [`Launcher`]
#[derive(Debug, Default, Clone)]
pub struct LaunchOptions {
    /// Archive to stage, defaults to [`default_archive_path`]
    pub archive: Option<PathBuf>,
    /// Force `--trace` on or off; follows the debug log level when unset
    pub trace: Option<bool>,
}

/// The bundled archive next to the running executable
///
/// `ili2fgdb-<version>.zip` is preferred over `ili2fgdb-<version>.tar.gz`;
/// when neither exists the zip path is returned so staging reports it.
pub fn default_archive_path() -> Result<PathBuf> {
    let exe = env::current_exe()?;
    let dir = exe.parent().ok_or_else(|| {
        LauncherError::NotFound(format!("no parent directory for {}", exe.display()))
    })?;
    Ok(archive_in(dir))
}

fn archive_in(dir: &Path) -> PathBuf {
    let [zip, tar_gz] = default_archive_names().map(|name| dir.join(name));
    if !zip.is_file() && tar_gz.is_file() {
        tar_gz
    } else {
        zip
    }
}

/// Runs ili2fgdb operations from a staged archive
#[derive(Debug)]
pub struct Launcher {
    config: RuntimeConfig,
    staged: StagedArchive,
    trace: Option<bool>,
}

impl Launcher {
    /// Check the runtime, then stage the archive
    pub fn new(config: RuntimeConfig, options: LaunchOptions) -> Result<Self> {
        config.validate()?;

        let archive = match options.archive {
            Some(archive) => archive,
            None => default_archive_path()?,
        };
        let staged = StagedArchive::stage(&archive)?;

        info!(
            "☕ ili2fgdb ready at {} (java {})",
            staged.executable().display(),
            config.java.display()
        );
        Ok(Self {
            config,
            staged,
            trace: options.trace,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Extracted `ili2fgdb.jar`
    pub fn executable(&self) -> &Path {
        self.staged.executable()
    }

    /// Staging directory of the extracted archive
    pub fn workdir(&self) -> &Path {
        self.staged.workdir()
    }

    /// Whether the next call passes `--trace`
    ///
    /// Unless forced through [`LaunchOptions::trace`], this follows the
    /// debug log level at the time of the call.
    pub fn trace(&self) -> bool {
        self.trace
            .unwrap_or_else(|| log::log_enabled!(log::Level::Debug))
    }

    pub fn is_released(&self) -> bool {
        self.staged.is_released()
    }

    /// Create a new geodatabase from an INTERLIS model
    pub fn schema_import(&self, request: &SchemaImportRequest) -> Result<String> {
        let args = schema_import_args(request, &self.context())?;
        self.execute(args)
    }

    /// Import a transfer file into an existing geodatabase
    pub fn import(&self, request: &ImportRequest) -> Result<String> {
        let args = import_args(request, &self.context())?;
        self.execute(args)
    }

    /// Export geodatabase content to a transfer file
    pub fn export(&self, request: &ExportRequest) -> Result<String> {
        let args = export_args(request, &self.context())?;
        self.execute(args)
    }

    /// Update geodatabase content from a transfer file
    pub fn update(&self, request: &UpdateRequest) -> Result<String> {
        let args = update_args(request, &self.context())?;
        self.execute(args)
    }

    /// Run whichever operation `request` names
    pub fn run(&self, request: &OperationRequest) -> Result<String> {
        debug!("📋 Running {} request", request.kind());
        let args = self.arguments_for(request)?;
        self.execute(args)
    }

    /// Arguments `run` would pass for `request`, without running anything
    pub fn arguments_for(&self, request: &OperationRequest) -> Result<ArgumentList> {
        request.arguments(&self.context())
    }

    /// Remove the staging directory; later calls are no-ops
    pub fn release(&mut self) -> Result<()> {
        self.staged.release()
    }

    fn context(&self) -> BuildContext<'_> {
        BuildContext::new(&self.config.proxy, self.trace())
    }

    fn execute(&self, args: ArgumentList) -> Result<String> {
        if self.staged.is_released() {
            return Err(LauncherError::Configuration(
                "launcher already released".to_string(),
            ));
        }
        invoke(&self.config.java, self.staged.executable(), args.as_slice())
    }
}
