//! Version information for the launcher and the bundled tool

/// Current version of the launcher crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the bundled ili2fgdb distribution (set by build.rs)
pub const TOOL_VERSION: &str = env!("ILI2FGDB_TOOL_VERSION");

/// Git commit hash (set at compile time)
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// File name of the archive shipped next to the launcher binary
pub fn default_archive_name() -> String {
    format!("ili2fgdb-{TOOL_VERSION}.zip")
}

/// Accepted archive names, in lookup order
pub fn default_archive_names() -> [String; 2] {
    [
        default_archive_name(),
        format!("ili2fgdb-{TOOL_VERSION}.tar.gz"),
    ]
}

/// Get full version string with optional build information
pub fn full_version() -> String {
    let mut version = format!("{VERSION} (ili2fgdb {TOOL_VERSION})");

    if let Some(commit) = GIT_COMMIT {
        version.push_str(&format!(" [{}]", &commit[..8.min(commit.len())]));
    }

    version
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_archive_name_carries_tool_version() {
        let name = default_archive_name();
        assert!(name.starts_with("ili2fgdb-"));
        assert!(name.ends_with(".zip"));
        assert!(name.contains(TOOL_VERSION));
    }

    #[test]
    fn test_zip_is_looked_up_before_tar_gz() {
        let [first, second] = default_archive_names();
        assert_eq!(first, default_archive_name());
        assert_eq!(second, format!("ili2fgdb-{TOOL_VERSION}.tar.gz"));
    }

    #[test]
    fn test_full_version_mentions_both_versions() {
        let version = full_version();
        assert!(version.starts_with(VERSION));
        assert!(version.contains(TOOL_VERSION));
    }
}
