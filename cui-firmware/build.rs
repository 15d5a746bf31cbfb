//! Build script for cui-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates cui.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys of the `[cui]` table and their expected kinds
const BOOL_KEYS: &[&str] = &["manage_buttons", "manage_leds", "manage_uart"];
const PERIOD_KEYS: &[&str] = &[
    "led_blink_period_ms",
    "button_long_press_ms",
    "write_timeout_ms",
    "assert_flash_period_ms",
];
const MAX_TITLE_LEN: usize = 32;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate cui.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=cui.toml");

    let config_path = Path::new("cui.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: cui.toml not found!                                      ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a cui.toml configuration file.              ║\n\
            ║  Please create one in the cui-firmware directory.                ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read cui.toml                                  ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in cui.toml                          ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let errors = validate_cui_table(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid [cui] configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=cui.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check the `[cui]` table; every key is optional but must be well-formed
fn validate_cui_table(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let table = match config.get("cui") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[cui] must be a table".to_string());
            return errors;
        }
        None => {
            errors.push("Missing [cui] section".to_string());
            return errors;
        }
    };

    for (key, value) in table {
        let key = key.as_str();
        if BOOL_KEYS.contains(&key) {
            if !value.is_bool() {
                errors.push(format!("[cui] {} must be true or false", key));
            }
        } else if PERIOD_KEYS.contains(&key) {
            match value.as_integer() {
                Some(ms) if ms > 0 && ms <= i64::from(u32::MAX) => {}
                _ => errors.push(format!("[cui] {} must be a positive integer", key)),
            }
        } else if key == "multi_menu_title" {
            match value.as_str() {
                Some(title) if title.len() <= MAX_TITLE_LEN => {}
                Some(_) => errors.push(format!(
                    "[cui] multi_menu_title longer than {} bytes",
                    MAX_TITLE_LEN
                )),
                None => errors.push("[cui] multi_menu_title must be a string".to_string()),
            }
        } else {
            errors.push(format!("[cui] unknown key '{}'", key));
        }
    }

    errors
}
