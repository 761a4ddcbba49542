//! ili2fgdb command-line assembly
//!
//! Every operation kind has a pure builder in [`assembly`] turning a typed
//! request into an [`ArgumentList`]. The ordering of tokens follows what
//! ili2fgdb has always been called with; the transfer/model file is last.

pub mod assembly;
pub mod inheritance;
pub mod requests;

pub use assembly::{export_args, import_args, schema_import_args, update_args};
pub use inheritance::{InheritanceFlags, InheritanceMode};
pub use requests::{
    ExportRequest, ImportRequest, OperationKind, OperationRequest, SchemaImportRequest,
    SpatialReference, UpdateRequest,
};

use crate::config::ProxyConfig;
use std::fmt;
use std::path::Path;

/// Extension every File Geodatabase path must carry
pub const GDB_EXTENSION: &str = ".gdb";

/// Inputs shared by all builders that do not come from the request
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    /// Proxy passed as `--proxy`/`--proxyPort`
    pub proxy: &'a ProxyConfig,
    /// Prepend `--trace`
    pub trace: bool,
}

impl<'a> BuildContext<'a> {
    pub fn new(proxy: &'a ProxyConfig, trace: bool) -> Self {
        Self { proxy, trace }
    }
}

/// Ordered list of command-line tokens
///
/// Builder methods take and return `self` so each assembly reads top to
/// bottom in the order the tokens end up on the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArgumentList {
    tokens: Vec<String>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bare flag
    pub fn flag(mut self, name: &str) -> Self {
        self.tokens.push(name.to_string());
        self
    }

    /// Append a bare flag if `enabled`
    pub fn flag_if(self, name: &str, enabled: bool) -> Self {
        if enabled { self.flag(name) } else { self }
    }

    /// Append `name value`
    pub fn option(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.tokens.push(name.to_string());
        self.tokens.push(value.to_string());
        self
    }

    /// Append `name value` if the value is set and not empty
    pub fn option_if_set(self, name: &str, value: Option<&str>) -> Self {
        match non_empty(value) {
            Some(value) => self.option(name, value),
            None => self,
        }
    }

    /// Append a single value token
    pub fn positional(mut self, value: impl fmt::Display) -> Self {
        self.tokens.push(value.to_string());
        self
    }

    /// Append a single value token if set and not empty
    pub fn positional_if_set(self, value: Option<&str>) -> Self {
        match non_empty(value) {
            Some(value) => self.positional(value),
            None => self,
        }
    }

    /// Append pre-built tokens
    pub fn extend<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True if `token` appears anywhere in the list
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Value following the first occurrence of `flag`
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.tokens
            .iter()
            .position(|t| t == flag)
            .and_then(|i| self.tokens.get(i + 1))
            .map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tokens
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

impl From<ArgumentList> for Vec<String> {
    fn from(list: ArgumentList) -> Self {
        list.into_vec()
    }
}

/// Collapse `Some("")` into `None`
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Path as a command-line token, `None` for unset or empty paths
pub(crate) fn path_token(path: Option<&Path>) -> Option<String> {
    path.map(|p| p.to_string_lossy().into_owned())
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let args = ArgumentList::new()
            .flag("--import")
            .option("--dbfile", "out.gdb")
            .flag_if("--deleteData", false)
            .flag_if("--importTid", true)
            .option_if_set("--topics", Some("Topic_A"))
            .option_if_set("--dataset", None)
            .positional("data.xtf");

        assert_eq!(
            args.as_slice(),
            [
                "--import",
                "--dbfile",
                "out.gdb",
                "--importTid",
                "--topics",
                "Topic_A",
                "data.xtf"
            ]
        );
        assert_eq!(
            args.to_string(),
            "--import --dbfile out.gdb --importTid --topics Topic_A data.xtf"
        );
    }

    #[test]
    fn test_empty_values_are_unset() {
        let args = ArgumentList::new()
            .option_if_set("--models", Some(""))
            .positional_if_set(Some(""))
            .positional_if_set(None);
        assert!(args.is_empty());
    }

    #[test]
    fn test_value_of() {
        let args = ArgumentList::new()
            .option("--defaultSrsCode", 2056)
            .option("--fgdbXyResolution", 0.0001);
        assert_eq!(args.value_of("--defaultSrsCode"), Some("2056"));
        assert_eq!(args.value_of("--fgdbXyResolution"), Some("0.0001"));
        assert_eq!(args.value_of("--missing"), None);
        assert!(args.contains("2056"));
    }

    #[test]
    fn test_path_token() {
        assert_eq!(
            path_token(Some(Path::new("C:/out/test.gdb"))),
            Some("C:/out/test.gdb".to_string())
        );
        assert_eq!(path_token(Some(Path::new(""))), None);
        assert_eq!(path_token(None), None);
    }
}
