//! Archive extraction into the staging directory

use crate::exceptions::{LauncherError, Result};
use flate2::read::GzDecoder;
use log::{debug, trace};
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tar::Archive;
use zip::ZipArchive;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZIP_MAGIC: [u8; 4] = *b"PK\x03\x04";
const EMPTY_ZIP_MAGIC: [u8; 4] = *b"PK\x05\x06";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveFormat {
    Zip,
    TarGz,
    Tar,
}

impl ArchiveFormat {
    fn detect(magic: &[u8]) -> Self {
        if magic.starts_with(&ZIP_MAGIC) || magic.starts_with(&EMPTY_ZIP_MAGIC) {
            ArchiveFormat::Zip
        } else if magic.starts_with(&GZIP_MAGIC) {
            ArchiveFormat::TarGz
        } else {
            ArchiveFormat::Tar
        }
    }

    fn name(self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::Tar => "tar",
        }
    }
}

fn outside_staging(path: impl std::fmt::Debug) -> LauncherError {
    LauncherError::Generic(format!(
        "archive entry {path:?} points outside the staging directory"
    ))
}

/// Extract a zip, tar or tar.gz archive into `dest_dir`, returns the number of entries
pub(super) fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<usize> {
    let mut file = File::open(archive_path)?;

    let mut magic = [0u8; 4];
    let read = file.read(&mut magic)?;
    let format = ArchiveFormat::detect(&magic[..read]);
    file.seek(SeekFrom::Start(0))?;

    debug!(
        "📦 Extracting {} archive {archive_path:?} to {dest_dir:?}",
        format.name()
    );

    if !dest_dir.exists() {
        fs::create_dir_all(dest_dir)?;
    }

    let reader = BufReader::new(file);
    let count = match format {
        ArchiveFormat::Zip => unpack_zip(reader, dest_dir)?,
        ArchiveFormat::TarGz => unpack_tar(GzDecoder::new(reader), dest_dir)?,
        ArchiveFormat::Tar => unpack_tar(reader, dest_dir)?,
    };

    debug!("✅ Extracted {count} entries");
    Ok(count)
}

/// Unpack every tar entry below `dest_dir`
fn unpack_tar<R: Read>(reader: R, dest_dir: &Path) -> Result<usize> {
    let mut tar = Archive::new(reader);
    let mut count = 0;

    for entry_result in tar.entries()? {
        let mut entry = entry_result?;
        let path = entry.path()?.into_owned();
        trace!("📄 Extracting: {path:?}");

        // unpack_in refuses entries that would land outside dest_dir
        if !entry.unpack_in(dest_dir)? {
            return Err(outside_staging(path));
        }
        count += 1;
    }

    Ok(count)
}

/// Unpack every zip entry below `dest_dir`
fn unpack_zip<R: Read + Seek>(reader: R, dest_dir: &Path) -> Result<usize> {
    let mut zip = ZipArchive::new(reader)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        // enclosed_name is None for absolute paths and `..` components
        let Some(relative) = entry.enclosed_name() else {
            return Err(outside_staging(entry.name()));
        };
        let target = dest_dir.join(relative);
        trace!("📄 Extracting: {target:?}");

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
    }

    Ok(zip.len())
}
