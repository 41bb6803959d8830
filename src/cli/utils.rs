//! Shared CLI utilities.

use serde_json::Value;

/// Parse a `KEY=VALUE` pair for `--set`. The value is kept as a string and
/// may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) =
        raw.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), Value::from(value)))
}
