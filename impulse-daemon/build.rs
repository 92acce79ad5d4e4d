//! Build script for impulse-daemon
//!
//! Validates the embedded impulse.toml at compile time so a broken default
//! configuration never ships.

use std::fs;
use std::path::Path;

fn main() {
    validate_config();
}

/// Validate impulse.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=impulse.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("impulse.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read impulse.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in impulse.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_movement(&config, &mut errors);
    validate_pins(&config, &mut errors);
    validate_calibration(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in impulse.toml                    ║\n\
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

fn validate_movement(config: &toml::Value, errors: &mut Vec<String>) {
    let movement = match config.get("movement") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[movement] must be a table".to_string());
            return;
        }
        None => {
            errors.push("Missing [movement] section".to_string());
            return;
        }
    };

    for key in ["hour_a", "hour_b", "hour_coupled"] {
        match movement.get(key) {
            Some(toml::Value::Boolean(_)) => {}
            Some(_) => errors.push(format!("[movement] {} must be true or false", key)),
            None => errors.push(format!("[movement] missing '{}'", key)),
        }
    }
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let pins = match config.get("pins") {
        Some(toml::Value::Table(t)) => t,
        _ => {
            errors.push("Missing [pins] section".to_string());
            return;
        }
    };

    for key in ["minute", "hour_a", "hour_b"] {
        match pins.get(key) {
            Some(toml::Value::String(s)) => {
                let s = s.trim().trim_start_matches('!');
                let valid = s
                    .strip_prefix("gpio")
                    .map_or(false, |n| n.parse::<u32>().is_ok());
                if !valid {
                    errors.push(format!("[pins] {} must look like \"gpio26\" or \"!gpio26\"", key));
                }
            }
            Some(_) => errors.push(format!("[pins] {} must be a string", key)),
            None if key == "minute" => errors.push("[pins] missing 'minute'".to_string()),
            None => {}
        }
    }
}

fn validate_calibration(config: &toml::Value, errors: &mut Vec<String>) {
    let calibration = match config.get("calibration") {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    for key in ["park_minute", "hour_compensation_minutes"] {
        if let Some(toml::Value::Integer(v)) = calibration.get(key) {
            if *v < 0 || *v >= 60 {
                errors.push(format!("[calibration] {} must be 0-59", key));
            }
        }
    }
    for key in ["tracking_second", "correction_second"] {
        if let Some(toml::Value::Integer(v)) = calibration.get(key) {
            if *v < 0 || *v >= 60 {
                errors.push(format!("[calibration] {} must be 0-59", key));
            }
        }
    }
}
