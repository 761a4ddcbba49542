//! Runtime configuration: Java runtime location and HTTP proxy
//!
//! The library never reads the environment on its own. Callers build a
//! [`RuntimeConfig`] once (usually through [`RuntimeConfig::from_env`]) and
//! hand it to the launcher.

use crate::exceptions::{LauncherError, Result};
use log::debug;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Environment variable holding the proxy as `scheme://host:port`
pub const PROXY_ENV: &str = "HTTP_PROXY";

/// Environment variable overriding the Java runtime path
pub const JAVA_ENV: &str = "ILI2FGDB_JAVA";

/// Platform default location of the 64-bit Java runtime
#[cfg(windows)]
pub const DEFAULT_JAVA_EXE: &str = r"C:\ProgramData\Oracle\Java\javapath\java.exe";
#[cfg(not(windows))]
pub const DEFAULT_JAVA_EXE: &str = "/usr/bin/java";

/// Proxy forwarded to ili2fgdb for model repository lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    /// Parse `scheme://host:port`
    ///
    /// The host is everything before the last `:` with any scheme removed,
    /// the port is everything after it.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let (head, port) = value.rsplit_once(':').ok_or_else(|| {
            LauncherError::Configuration(format!(
                "{PROXY_ENV} '{value}' does not contain a port (expected scheme://host:port)"
            ))
        })?;

        let host = match head.split_once("://") {
            Some((_, rest)) => rest,
            None => head,
        };
        let host = host.trim_end_matches('/');
        if host.is_empty() {
            return Err(LauncherError::Configuration(format!(
                "{PROXY_ENV} '{value}' does not contain a host"
            )));
        }

        let port = port.trim_end_matches('/').parse::<u16>().map_err(|e| {
            LauncherError::Configuration(format!(
                "{PROXY_ENV} '{value}' has an invalid port '{port}': {e}"
            ))
        })?;

        Ok(ProxyConfig {
            host: host.to_string(),
            port,
        })
    }

    /// Read and parse `HTTP_PROXY`
    pub fn from_env() -> Result<Self> {
        let value = env::var(PROXY_ENV).map_err(|e| {
            LauncherError::Configuration(format!(
                "could not evaluate environment variable {PROXY_ENV}: {e}"
            ))
        })?;
        Self::parse(&value)
    }
}

impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Everything the launcher needs from its surroundings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Java runtime used to run the jar
    pub java: PathBuf,
    /// Proxy passed as `--proxy`/`--proxyPort`
    pub proxy: ProxyConfig,
}

impl RuntimeConfig {
    pub fn new(java: impl Into<PathBuf>, proxy: ProxyConfig) -> Self {
        Self {
            java: java.into(),
            proxy,
        }
    }

    /// Build from `ILI2FGDB_JAVA` (or the platform default) and `HTTP_PROXY`
    pub fn from_env() -> Result<Self> {
        let java = env::var_os(JAVA_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JAVA_EXE));
        debug!("☕ Java runtime: {}", java.display());
        Ok(Self::new(java, ProxyConfig::from_env()?))
    }

    /// Like [`from_env`](Self::from_env), but falls back to `java` on `PATH`
    /// when the configured runtime does not exist
    pub fn discover() -> Result<Self> {
        let mut config = Self::from_env()?;
        if !config.java.is_file() {
            if let Ok(found) = which::which("java") {
                debug!(
                    "🔍 {} not found, using {} from PATH",
                    config.java.display(),
                    found.display()
                );
                config.java = found;
            }
        }
        Ok(config)
    }

    /// Fail unless the Java runtime exists
    pub fn validate(&self) -> Result<()> {
        if !self.java.is_file() {
            return Err(LauncherError::Configuration(format!(
                "Java runtime {} was not found",
                self.java.display()
            )));
        }
        Ok(())
    }
}
