use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl FromStr for ConfigFormat {
    type Err = anyhow::Error;

    fn from_str(format: &str) -> Result<Self> {
        match format.to_lowercase().as_str() {
            "json" => Ok(ConfigFormat::Json),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            _ => bail!("Unsupported format: {}. Use json, toml, or yaml", format),
        }
    }
}

impl ConfigFormat {
    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

/// Render a document in the specified format
pub fn export(value: &Value, format: ConfigFormat) -> Result<String> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(value)?,
        ConfigFormat::Toml => toml::to_string_pretty(value)
            .context("Document cannot be expressed as TOML (TOML has no null)")?,
        ConfigFormat::Yaml => serde_yml::to_string(value)?,
    };
    Ok(output)
}

/// Render a document with syntax highlighting when stdout is a terminal
pub fn export_highlighted(value: &Value, format: ConfigFormat) -> Result<String> {
    use syntect::easy::HighlightLines;
    use syntect::highlighting::Style;
    use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};
    use two_face::theme::EmbeddedThemeName;
    use two_face::{syntax, theme};

    let output = export(value, format)?;

    if !atty::is(atty::Stream::Stdout) {
        return Ok(output);
    }

    let ps = syntax::extra_newlines();
    let ts = theme::extra();
    let syntax = ps
        .find_syntax_by_extension(format.extension())
        .unwrap_or_else(|| ps.find_syntax_plain_text());
    let theme = ts.get(EmbeddedThemeName::Base16OceanDark);

    let mut h = HighlightLines::new(syntax, theme);
    let mut highlighted = String::new();
    for line in LinesWithEndings::from(&output) {
        let ranges: Vec<(Style, &str)> = h.highlight_line(line, &ps)?;
        highlighted.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
    }

    Ok(highlighted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<ConfigFormat>().unwrap(), ConfigFormat::Json);
        assert_eq!("yml".parse::<ConfigFormat>().unwrap(), ConfigFormat::Yaml);
        assert_eq!("toml".parse::<ConfigFormat>().unwrap(), ConfigFormat::Toml);
        assert!("xml".parse::<ConfigFormat>().is_err());
    }

    #[test]
    fn test_export_formats() {
        let doc = json!({"database": {"host": "db.local", "port": 5432}});

        let json_output = export(&doc, ConfigFormat::Json).unwrap();
        assert!(json_output.contains("\"host\": \"db.local\""));

        let toml_output = export(&doc, ConfigFormat::Toml).unwrap();
        assert!(toml_output.contains("[database]"));
        assert!(toml_output.contains("port = 5432"));

        let yaml_output = export(&doc, ConfigFormat::Yaml).unwrap();
        assert!(yaml_output.contains("host: db.local"));
    }

    #[test]
    fn test_toml_rejects_null() {
        assert!(export(&json!({"a": null}), ConfigFormat::Toml).is_err());
    }

    #[test]
    fn test_syntax_highlighting() {
        // Falls back to plain text when stdout is not a terminal
        let highlighted = export_highlighted(&json!({"a": 1}), ConfigFormat::Json);
        assert!(highlighted.is_ok());
    }
}
