use super::{error_label, json_pretty, warning_label, EXIT_SUCCESS, EXIT_VALIDATION_ERROR};
use hyperiso_schema::{
    parse_override, parse_settings_file, prepare, RawSettings, ValidationOutcome, BUILD_NAME_KEY,
};
use std::path::Path;
use tracing::debug;

pub fn run(
    settings: Option<&Path>,
    overrides: &[String],
    build_name: Option<&str>,
    json: bool,
) -> Result<u8, String> {
    let raw = load_settings(settings, overrides, build_name)?;

    match prepare(&raw) {
        ValidationOutcome::Valid { config, warnings } => {
            if json {
                let payload = serde_json::json!({
                    "valid": true,
                    "config": config,
                    "warnings": warnings,
                    "errors": [],
                });
                println!("{}", json_pretty(&payload)?);
            } else {
                for warning in &warnings {
                    println!("{}: {warning}", warning_label());
                }
                let rendered = toml::to_string_pretty(&config)
                    .map_err(|e| format!("failed to render configuration: {e}"))?;
                println!("settings valid for build '{}'", config.build_name);
                print!("{rendered}");
            }
            Ok(EXIT_SUCCESS)
        }
        ValidationOutcome::Invalid { errors, .. } => {
            if json {
                let items: Vec<_> = errors
                    .iter()
                    .map(|e| serde_json::json!({ "kind": e.kind(), "message": e.to_string() }))
                    .collect();
                let payload = serde_json::json!({
                    "valid": false,
                    "warnings": [],
                    "errors": items,
                });
                println!("{}", json_pretty(&payload)?);
            } else {
                for err in &errors {
                    println!("{}: {err}", error_label());
                }
                let noun = if errors.len() == 1 { "error" } else { "errors" };
                println!("{} {noun} found", errors.len());
            }
            Ok(EXIT_VALIDATION_ERROR)
        }
    }
}

/// Settings file first, then `--set` overrides in order, then `--build-name`.
pub fn load_settings(
    settings: Option<&Path>,
    overrides: &[String],
    build_name: Option<&str>,
) -> Result<RawSettings, String> {
    let mut raw = match settings {
        Some(path) => {
            debug!("reading settings from {}", path.display());
            parse_settings_file(path).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => RawSettings::new(),
    };

    for item in overrides {
        let (key, value) = parse_override(item).map_err(|e| e.to_string())?;
        if raw.set(key.as_str(), value).is_some() {
            debug!("override replaces {key}");
        }
    }

    if let Some(name) = build_name {
        raw.set(BUILD_NAME_KEY, name);
    }

    Ok(raw)
}
