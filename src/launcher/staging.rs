//! Staging of the bundled ili2fgdb distribution
//!
//! Each [`StagedArchive`] owns a freshly created, randomly named directory,
//! so several launchers (threads or processes) never share extracted files.
//! The directory goes away on [`StagedArchive::release`], on drop, or through
//! [`cleanup_registered`] when the process exits without running destructors.

use super::extraction::extract_archive;
use crate::exceptions::{LauncherError, Result};
use log::{debug, info, warn};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::TempDir;

/// File name of the tool inside the archive, expected one level down
pub const TOOL_JAR: &str = "ili2fgdb.jar";

/// Prefix of staging directories below the system temp dir
pub const WORKDIR_PREFIX: &str = "ili2fgdb-";

/// Staging directories not yet released, removed by [`cleanup_registered`]
static EXIT_REGISTRY: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

fn register(path: &Path) {
    let mut registry = EXIT_REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
    registry.push(path.to_path_buf());
}

fn unregister(path: &Path) {
    let mut registry = EXIT_REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
    registry.retain(|p| p != path);
}

#[cfg(test)]
fn is_registered(path: &Path) -> bool {
    let registry = EXIT_REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
    registry.iter().any(|p| p.starts_with(path))
}

/// Remove a directory tree, treating "already gone" as success
fn remove_dir_if_present(path: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Remove every staging directory that was never released
///
/// Meant for exit paths that skip destructors (`process::exit`, signal
/// handlers). Returns the number of directories actually removed.
pub fn cleanup_registered() -> usize {
    let pending: Vec<PathBuf> = {
        let mut registry = EXIT_REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        registry.drain(..).collect()
    };

    let mut removed = 0;
    for path in pending {
        match remove_dir_if_present(&path) {
            Ok(true) => {
                debug!("🧹 Removed staging directory {path:?}");
                removed += 1;
            }
            Ok(false) => {}
            Err(e) => warn!("⚠️ Failed to remove staging directory {path:?}: {e}"),
        }
    }
    removed
}

/// An extracted ili2fgdb distribution
#[derive(Debug)]
pub struct StagedArchive {
    workdir: Option<TempDir>,
    path: PathBuf,
    executable: PathBuf,
}

impl StagedArchive {
    /// Extract `archive` into a new staging directory and locate `ili2fgdb.jar`
    pub fn stage(archive: &Path) -> Result<Self> {
        Self::stage_in(archive, &env::temp_dir())
    }

    /// Like [`stage`](Self::stage), with the staging directory below `parent`
    pub fn stage_in(archive: &Path, parent: &Path) -> Result<Self> {
        if !archive.is_file() {
            return Err(LauncherError::NotFound(format!(
                "archive {} not found",
                archive.display()
            )));
        }

        let workdir = tempfile::Builder::new()
            .prefix(WORKDIR_PREFIX)
            .tempdir_in(parent)?;
        let path = workdir.path().to_path_buf();

        // Registered before extraction; an error below drops `staged`,
        // which unregisters and removes the directory again
        register(&path);
        let mut staged = Self {
            workdir: Some(workdir),
            path,
            executable: PathBuf::new(),
        };
        info!("📤 Unpacking {} to {}", archive.display(), staged.path.display());

        extract_archive(archive, &staged.path)?;

        staged.executable = locate_tool(&staged.path).ok_or_else(|| {
            LauncherError::NotFound(format!(
                "{TOOL_JAR} could not be found inside {}",
                archive.display()
            ))
        })?;
        debug!("🎯 Located {}", staged.executable.display());

        Ok(staged)
    }

    /// The staging directory
    pub fn workdir(&self) -> &Path {
        &self.path
    }

    /// Path of the extracted `ili2fgdb.jar`
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn is_released(&self) -> bool {
        self.workdir.is_none()
    }

    /// Remove the staging directory; calling it again is a no-op
    pub fn release(&mut self) -> Result<()> {
        let Some(workdir) = self.workdir.take() else {
            return Ok(());
        };
        unregister(&self.path);

        // The exit registry may already have removed it
        if !workdir.path().exists() {
            return Ok(());
        }
        match workdir.close() {
            Ok(()) => {
                debug!("🧹 Released staging directory {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for StagedArchive {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("⚠️ Failed to remove staging directory {:?}: {e}", self.path);
        }
    }
}

/// Find `*/ili2fgdb.jar` below `workdir`
fn locate_tool(workdir: &Path) -> Option<PathBuf> {
    let pattern = format!(
        "{}/*/{TOOL_JAR}",
        glob::Pattern::escape(&workdir.to_string_lossy())
    );
    let mut matches: Vec<PathBuf> = glob::glob(&pattern)
        .ok()?
        .filter_map(std::result::Result::ok)
        .filter(|p| p.is_file())
        .collect();
    matches.sort();
    matches.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tar(path: &Path, entries: &[&str]) {
        let mut builder = tar::Builder::new(fs::File::create(path).unwrap());
        for entry in entries {
            let data = b"PK";
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, entry, &data[..]).unwrap();
        }
        builder.finish().unwrap();
    }

    #[test]
    fn test_stage_and_release_twice() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("ili2fgdb.tar");
        write_tar(&archive, &["ili2fgdb-3.11.3/ili2fgdb.jar", "ili2fgdb-3.11.3/README.txt"]);

        let mut staged = StagedArchive::stage(&archive).unwrap();
        let workdir = staged.workdir().to_path_buf();
        assert!(workdir.is_dir());
        assert!(
            workdir
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(WORKDIR_PREFIX)
        );
        assert_eq!(
            staged.executable(),
            workdir.join("ili2fgdb-3.11.3").join(TOOL_JAR)
        );

        staged.release().unwrap();
        assert!(staged.is_released());
        assert!(!workdir.exists());
        staged.release().unwrap();
    }

    #[test]
    fn test_each_stage_gets_its_own_directory() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("ili2fgdb.tar");
        write_tar(&archive, &["dist/ili2fgdb.jar"]);

        let first = StagedArchive::stage(&archive).unwrap();
        let second = StagedArchive::stage(&archive).unwrap();
        assert_ne!(first.workdir(), second.workdir());

        let paths = [first.workdir().to_path_buf(), second.workdir().to_path_buf()];
        drop(first);
        drop(second);
        assert!(paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn test_missing_archive() {
        let dir = TempDir::new().unwrap();
        let err = StagedArchive::stage(&dir.path().join("nope.tar.gz")).unwrap_err();
        assert!(matches!(err, LauncherError::NotFound(_)));
    }

    #[test]
    fn test_jar_must_be_one_level_down() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("flat.tar");
        write_tar(&archive, &["ili2fgdb.jar", "a/b/ili2fgdb.jar"]);

        let err = StagedArchive::stage(&archive).unwrap_err();
        assert!(matches!(err, LauncherError::NotFound(_)));
        assert!(err.to_string().contains(TOOL_JAR));
    }

    #[test]
    fn test_release_tolerates_vanished_directory() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("ili2fgdb.tar");
        write_tar(&archive, &["dist/ili2fgdb.jar"]);

        let mut staged = StagedArchive::stage(&archive).unwrap();
        fs::remove_dir_all(staged.workdir()).unwrap();
        staged.release().unwrap();
    }

    #[test]
    fn test_remove_dir_if_present() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("stage");
        fs::create_dir(&target).unwrap();
        assert!(remove_dir_if_present(&target).unwrap());
        assert!(!remove_dir_if_present(&target).unwrap());
    }

    fn staging_dirs(parent: &Path) -> Vec<PathBuf> {
        fs::read_dir(parent)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with(WORKDIR_PREFIX))
            })
            .collect()
    }

    #[test]
    fn test_registered_while_staged() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("ili2fgdb.tar");
        write_tar(&archive, &["dist/ili2fgdb.jar"]);
        let parent = dir.path().join("stage");
        fs::create_dir(&parent).unwrap();

        let mut staged = StagedArchive::stage_in(&archive, &parent).unwrap();
        assert!(staged.workdir().starts_with(&parent));
        assert!(is_registered(staged.workdir()));

        staged.release().unwrap();
        assert!(!is_registered(&parent));
        assert!(staging_dirs(&parent).is_empty());
    }

    #[test]
    fn test_failed_stage_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let parent = dir.path().join("stage");
        fs::create_dir(&parent).unwrap();

        let broken = dir.path().join("broken.tar.gz");
        fs::write(&broken, [0x1f, 0x8b, 0x00, 0x01, 0x02]).unwrap();
        assert!(StagedArchive::stage_in(&broken, &parent).is_err());

        let no_jar = dir.path().join("no-jar.tar");
        write_tar(&no_jar, &["dist/README.txt"]);
        let err = StagedArchive::stage_in(&no_jar, &parent).unwrap_err();
        assert!(matches!(err, LauncherError::NotFound(_)));

        assert!(!is_registered(&parent));
        assert!(staging_dirs(&parent).is_empty());
    }

    #[test]
    fn test_stage_zip_archive() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("ili2fgdb-3.11.3.zip");
        let mut writer = zip::ZipWriter::new(fs::File::create(&archive).unwrap());
        writer
            .start_file("ili2fgdb-3.11.3/ili2fgdb.jar", zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, b"PK").unwrap();
        writer.finish().unwrap();

        let staged = StagedArchive::stage(&archive).unwrap();
        assert_eq!(
            staged.executable(),
            staged.workdir().join("ili2fgdb-3.11.3").join(TOOL_JAR)
        );
        assert!(staged.executable().is_file());
    }
}
