//! `--trace` follows the log level at call time
//!
//! Kept in its own test binary: it installs the global logger and moves the
//! global max level.

use ili2fgdb::logger::JsonLogger;
use ili2fgdb::{
    LaunchOptions, Launcher, OperationRequest, ProxyConfig, RuntimeConfig, UpdateRequest,
};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_archive(dir: &Path) -> PathBuf {
    let path = dir.join("ili2fgdb.tar");
    let mut builder = tar::Builder::new(fs::File::create(&path).unwrap());
    let data = b"PK\x03\x04";
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "dist/ili2fgdb.jar", &data[..])
        .unwrap();
    builder.finish().unwrap();
    path
}

fn launcher(dir: &Path, trace: Option<bool>) -> Launcher {
    let java = dir.join("java");
    fs::write(&java, "").unwrap();
    let proxy = ProxyConfig::parse("http://proxy.example.ch:8080").unwrap();
    let options = LaunchOptions {
        archive: Some(write_archive(dir)),
        trace,
    };
    Launcher::new(RuntimeConfig::new(java, proxy), options).unwrap()
}

fn traced(launcher: &Launcher, request: &OperationRequest) -> bool {
    launcher.arguments_for(request).unwrap().contains("--trace")
}

#[test]
fn test_trace_tracks_max_level_between_calls() {
    assert_eq!(JsonLogger::init_with_level("json:debug"), "debug");

    let dir = TempDir::new().unwrap();
    let request = OperationRequest::Update(UpdateRequest::new(
        dir.path().join("data.gdb"),
        dir.path().join("data.xtf"),
    ));

    log::set_max_level(LevelFilter::Info);
    let following = launcher(dir.path(), None);
    let forced_on = launcher(dir.path(), Some(true));
    let forced_off = launcher(dir.path(), Some(false));
    assert!(!traced(&following, &request));

    // Raised after construction, picked up by the next call
    log::set_max_level(LevelFilter::Debug);
    assert!(following.trace());
    assert!(traced(&following, &request));

    log::set_max_level(LevelFilter::Warn);
    assert!(!traced(&following, &request));

    for level in [LevelFilter::Warn, LevelFilter::Debug] {
        log::set_max_level(level);
        assert!(traced(&forced_on, &request));
        assert!(!traced(&forced_off, &request));
    }
}
