use crate::cli::Context;
use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::Value;

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Dotted key path, e.g. `database.host`
    pub path: String,
    /// JSON value; anything that is not valid JSON is stored as a string
    pub value: String,
}

pub fn execute(args: SetArgs, context: &Context) -> Result<()> {
    let value = parse_value(&args.value);
    let manager = context.open_manager()?;
    manager
        .set(&args.path, value.clone())
        .with_context(|| format!("Failed to set {}", args.path))?;

    context
        .output
        .success(&format!("Set {} = {}", args.path, value));
    Ok(())
}

/// JSON when it parses, otherwise the raw text
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("5432"), json!(5432));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value(r#"{"a": 1}"#), json!({"a": 1}));
        assert_eq!(parse_value("db.local"), json!("db.local"));
    }
}
