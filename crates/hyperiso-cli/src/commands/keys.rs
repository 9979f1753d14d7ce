use super::{json_pretty, EXIT_SUCCESS};
use hyperiso_schema::SCHEMA;

pub fn run(json: bool) -> Result<u8, String> {
    if json {
        let items: Vec<_> = SCHEMA
            .iter()
            .map(|spec| {
                serde_json::json!({
                    "key": spec.key,
                    "type": spec.kind,
                    "default": spec.default,
                    "description": spec.description,
                })
            })
            .collect();
        println!("{}", json_pretty(&items)?);
    } else {
        let width = SCHEMA.iter().map(|spec| spec.key.len()).max().unwrap_or(0);
        for spec in SCHEMA {
            let default = if spec.default.is_empty() {
                String::new()
            } else {
                format!(" (default: {})", spec.default)
            };
            println!(
                "{:<width$}  {:<9} {}{default}",
                spec.key, spec.kind, spec.description
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
