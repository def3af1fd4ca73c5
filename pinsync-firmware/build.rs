//! Build script for pinsync-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates lines.json at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate the embedded line allow-list at compile time
///
/// Runs on the host, so full serde_json is available. Catching a bad
/// allow-list here keeps the firmware's own parse path a formality.
fn validate_config() {
    println!("cargo:rerun-if-changed=lines.json");

    let config_path = Path::new("lines.json");
    if !config_path.exists() {
        panic!(
            "lines.json not found!\n\
             The firmware embeds its line allow-list from lines.json in the \
             pinsync-firmware directory."
        );
    }

    let text = match fs::read_to_string(config_path) {
        Ok(text) => text,
        Err(e) => panic!("failed to read lines.json: {}", e),
    };

    let config: serde_json::Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => panic!("invalid JSON in lines.json: {}", e),
    };

    let mut errors = Vec::new();

    match config.get("lines").and_then(|v| v.as_array()) {
        Some(lines) if !lines.is_empty() => {
            for (i, line) in lines.iter().enumerate() {
                match line.get("pin").and_then(|v| v.as_u64()) {
                    Some(pin) if pin <= 29 => {}
                    Some(pin) => {
                        errors.push(format!("lines[{}]: pin {} out of range 0-29", i, pin))
                    }
                    None => errors.push(format!("lines[{}]: missing 'pin'", i)),
                }
                match line.get("direction").and_then(|v| v.as_str()) {
                    Some("input") | Some("output") => {}
                    Some(dir) => errors.push(format!(
                        "lines[{}]: direction '{}' must be 'input' or 'output'",
                        i, dir
                    )),
                    None => errors.push(format!("lines[{}]: missing 'direction'", i)),
                }
            }
        }
        Some(_) => errors.push("'lines' cannot be empty".to_string()),
        None => errors.push("missing 'lines' array".to_string()),
    }

    if let Some(reserved) = config.get("reserved") {
        match reserved.as_array() {
            Some(pins) => {
                for (i, pin) in pins.iter().enumerate() {
                    if pin.as_u64().is_none() {
                        errors.push(format!("reserved[{}]: must be a pin number", i));
                    }
                }
            }
            None => errors.push("'reserved' must be an array".to_string()),
        }
    }

    if !errors.is_empty() {
        panic!(
            "invalid lines.json:\n{}",
            errors
                .iter()
                .map(|e| format!("  - {}", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=lines.json validated successfully");
}
