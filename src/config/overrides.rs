use serde::Serialize;
use std::path::PathBuf;

/// Settings given on the command line. Unset fields are left out when
/// serialized so they never mask lower layers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules_dir: Option<PathBuf>,
}

impl CliOverrides {
    pub fn is_empty(&self) -> bool {
        self.source_path.is_none()
            && self.artifact_path.is_none()
            && self.root_type.is_none()
            && self.modules_dir.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let overrides = CliOverrides {
            root_type: Some("AppConfig".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&overrides).unwrap();
        assert_eq!(value, serde_json::json!({"root_type": "AppConfig"}));
        assert!(!overrides.is_empty());
        assert!(CliOverrides::default().is_empty());
    }
}
