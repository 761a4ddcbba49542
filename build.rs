use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Version of the bundled ili2fgdb distribution; decides the default archive name
    let tool_version = if let Ok(v) = env::var("ILI2FGDB_TOOL_VERSION") {
        v
    } else {
        let version_file = Path::new("TOOL_VERSION");
        if version_file.exists() {
            fs::read_to_string(version_file)
                .unwrap_or_else(|_| "3.11.3".to_string())
                .trim()
                .to_string()
        } else {
            "3.11.3".to_string()
        }
    };

    println!("cargo:rustc-env=ILI2FGDB_TOOL_VERSION={}", tool_version);
    println!("cargo:rerun-if-changed=TOOL_VERSION");
    println!("cargo:rerun-if-env-changed=ILI2FGDB_TOOL_VERSION");
}
