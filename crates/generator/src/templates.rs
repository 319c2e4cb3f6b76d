//! Template loading and management

use clientgen_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("md_escape", md_escape_filter);

    tera.add_raw_template("REPORT.md", include_str!("../templates/REPORT.md.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load REPORT.md template: {}", e))
        })?;

    Ok(tera)
}

/// Filter escaping characters that break a markdown table cell
fn md_escape_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("md_escape filter expects a string"))?;

    Ok(Value::String(s.replace('|', "\\|").replace('\n', " ")))
}
