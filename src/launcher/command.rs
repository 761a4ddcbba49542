//! Running ili2fgdb on the Java runtime

use crate::arguments::GDB_EXTENSION;
use crate::exceptions::{ProcessFailure, Result};
use log::{debug, error, info, warn};
use std::env;
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Diagnostic file written next to the geodatabase before each run
pub const SIDECAR_LOG: &str = "ili2fgdb_commandLine.log";

/// JVM switches placed between the runtime and the jar
pub const JVM_ARGS: [&str; 2] = ["-d64", "-jar"];

/// A fully assembled ili2fgdb invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    runtime: PathBuf,
    executable: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    pub fn new(runtime: impl Into<PathBuf>, executable: impl Into<PathBuf>, args: &[String]) -> Self {
        Self {
            runtime: runtime.into(),
            executable: executable.into(),
            args: args.to_vec(),
        }
    }

    /// Arguments passed to the runtime: JVM switches, jar, tool arguments
    pub fn runtime_args(&self) -> Vec<String> {
        JVM_ARGS
            .iter()
            .map(|a| a.to_string())
            .chain(std::iter::once(self.executable.to_string_lossy().into_owned()))
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// The command as a single space-joined line
    pub fn command_line(&self) -> String {
        std::iter::once(self.runtime.to_string_lossy().into_owned())
            .chain(self.runtime_args())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Location of the sidecar log: the directory of the first `.gdb` argument
    pub fn sidecar_log_path(&self) -> Option<PathBuf> {
        let gdb = self.args.iter().find(|a| a.ends_with(GDB_EXTENSION))?;
        let gdb = Path::new(gdb);
        let gdb = if gdb.is_absolute() {
            gdb.to_path_buf()
        } else {
            env::current_dir().ok()?.join(gdb)
        };
        Some(gdb.parent()?.join(SIDECAR_LOG))
    }

    /// Write the command line to the sidecar log; failures are only logged
    pub fn write_sidecar_log(&self) -> Option<PathBuf> {
        let Some(path) = self.sidecar_log_path() else {
            debug!("📝 No {GDB_EXTENSION} argument, skipping {SIDECAR_LOG}");
            return None;
        };
        match fs::write(&path, self.command_line()) {
            Ok(()) => {
                debug!("📝 Wrote command line to {path:?}");
                Some(path)
            }
            Err(e) => {
                warn!("⚠️ Could not write {path:?}: {e}");
                None
            }
        }
    }

    /// Run to completion, returning the merged stdout/stderr
    ///
    /// Blocks until the tool exits. A non-zero exit becomes a
    /// [`ProcessFailure`] carrying the command line, output and exit code.
    pub fn run(&self) -> Result<String> {
        let command_line = self.command_line();
        info!("🚀 Executing {command_line}");
        self.write_sidecar_log();

        // stdout and stderr share one file so the interleaving is kept
        let mut capture: File = tempfile::tempfile()?;
        let stdout = capture.try_clone()?;
        let stderr = capture.try_clone()?;

        let status = Command::new(&self.runtime)
            .args(self.runtime_args())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status()?;

        capture.seek(SeekFrom::Start(0))?;
        let mut raw = Vec::new();
        capture.read_to_end(&mut raw)?;
        let output = String::from_utf8_lossy(&raw).into_owned();
        debug!("📜 ili2fgdb output:\n{output}");

        if status.success() {
            info!("✅ ili2fgdb finished");
            return Ok(output);
        }

        let failure = ProcessFailure {
            command: command_line,
            output,
            exit_code: status.code().unwrap_or(-1),
        };
        error!("❌ {failure}");
        Err(failure.into())
    }
}

/// Run `executable` with `args` on `runtime`
pub fn invoke(runtime: &Path, executable: &Path, args: &[String]) -> Result<String> {
    ToolCommand::new(runtime, executable, args).run()
}
