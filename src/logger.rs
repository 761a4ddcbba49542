//! Logging setup for the launcher binary
//!
//! Plain mode goes through `env_logger`; `json:<level>` switches to a JSON
//! line logger writing to `ILI2FGDB_LOG_PATH` or stderr.

use chrono::{Local, Utc};
use log::{Level, Log, Metadata, Record};
use serde_json::json;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;

/// Environment variable holding the log level (`debug`, `json:trace`, ...)
pub const LOG_LEVEL_ENV: &str = "ILI2FGDB_LOG_LEVEL";

/// Environment variable holding the JSON log file path
pub const LOG_PATH_ENV: &str = "ILI2FGDB_LOG_PATH";

/// JSON logger implementation
#[derive(Debug)]
pub struct JsonLogger {
    level: Level,
    target_file: Mutex<Option<std::fs::File>>,
}

/// Split `json:debug` / `json` / `debug` into (json mode, level name)
fn parse_level_spec(level_str: &str) -> (bool, &str) {
    if let Some(stripped) = level_str.strip_prefix("json:") {
        (true, stripped)
    } else if level_str == "json" {
        (true, "info")
    } else {
        (false, level_str)
    }
}

fn parse_level_filter(level: &str) -> log::LevelFilter {
    match level {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        "off" => log::LevelFilter::Off,
        _ => log::LevelFilter::Info,
    }
}

impl JsonLogger {
    /// Create a new JSON logger
    pub fn new(level: Level, log_path: Option<String>) -> Self {
        let target_file = if let Some(path) = log_path {
            OpenOptions::new().create(true).append(true).open(path).ok()
        } else {
            None
        };

        JsonLogger {
            level,
            target_file: Mutex::new(target_file),
        }
    }

    /// Initialize the logger with the given level spec, returns the effective level name
    pub fn init_with_level(level_str: &str) -> String {
        let (use_json, actual_level) = parse_level_spec(level_str);
        let level_filter = parse_level_filter(actual_level);

        if !use_json {
            let result = env_logger::Builder::new()
                .filter_level(level_filter)
                .format(|buf, record| {
                    use std::io::Write;

                    writeln!(
                        buf,
                        "[{} {} {}] {}",
                        Local::now().format("%Y-%m-%dT%H:%M:%S"),
                        record.level(),
                        record.target(),
                        record.args()
                    )
                })
                .try_init();
            if let Err(e) = result {
                eprintln!("Failed to initialize logger: {e}");
            }
            return actual_level.to_string();
        }

        let Some(level) = level_filter.to_level() else {
            log::set_max_level(log::LevelFilter::Off);
            return actual_level.to_string();
        };

        let logger = Box::new(JsonLogger::new(level, env::var(LOG_PATH_ENV).ok()));

        if let Err(e) = log::set_boxed_logger(logger) {
            eprintln!("Failed to initialize JSON logger: {e}");
            return actual_level.to_string();
        }

        log::set_max_level(level_filter);
        actual_level.to_string()
    }

    /// Initialize from `ILI2FGDB_LOG_LEVEL`, defaulting to `info`
    pub fn init() -> String {
        let log_level = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string());
        Self::init_with_level(&log_level)
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let log_entry = json!({
            "@timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            "@level": record.level().to_string().to_lowercase(),
            "@message": record.args().to_string(),
            "@module": record.target(),
            "@pid": std::process::id(),
        });

        let json_string = format!(
            "{}\n",
            serde_json::to_string(&log_entry).unwrap_or_default()
        );

        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.write_all(json_string.as_bytes());
                let _ = file.flush();
                return;
            }
        }
        let _ = io::stderr().write_all(json_string.as_bytes());
        let _ = io::stderr().flush();
    }

    fn flush(&self) {
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.flush();
            }
        }
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_spec_parsing() {
        assert_eq!(parse_level_spec("json:debug"), (true, "debug"));
        assert_eq!(parse_level_spec("json"), (true, "info"));
        assert_eq!(parse_level_spec("warn"), (false, "warn"));
        assert_eq!(parse_level_filter("trace"), log::LevelFilter::Trace);
        assert_eq!(parse_level_filter("bogus"), log::LevelFilter::Info);
    }

    #[test]
    fn test_json_logger_writes_lines_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("launcher.jsonl");
        let logger = JsonLogger::new(Level::Info, Some(path.to_string_lossy().to_string()));

        logger.log(
            &Record::builder()
                .args(format_args!("staged archive"))
                .level(Level::Info)
                .target("ili2fgdb::launcher")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("too chatty"))
                .level(Level::Debug)
                .target("ili2fgdb::launcher")
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(entry["@level"], "info");
        assert_eq!(entry["@message"], "staged archive");
        assert_eq!(entry["@module"], "ili2fgdb::launcher");
    }
}
