pub mod check;
pub mod completions;
pub mod keys;

use console::Style;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_VALIDATION_ERROR: u8 = 2;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn error_label() -> String {
    Style::new().red().bold().apply_to("error").to_string()
}

pub fn warning_label() -> String {
    Style::new().yellow().bold().apply_to("warning").to_string()
}
