// @generated by config-keys. Do not edit by hand.
// This file is replaced on every regeneration; edit the source document instead.

/// A value whose samples disagreed in scalar kind, kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct WidenedString(pub String);
impl WidenedString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl<'de> serde::Deserialize<'de> for WidenedString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match <serde_json::Value as serde::Deserialize>::deserialize(deserializer)? {
            serde_json::Value::String(text) => Ok(WidenedString(text)),
            serde_json::Value::Number(number) => Ok(WidenedString(number.to_string())),
            serde_json::Value::Bool(flag) => Ok(WidenedString(flag.to_string())),
            other => Err(serde::de::Error::custom(format!("expected a scalar, found {other}"))),
        }
    }
}
/// Inferred from `webcam_plugin`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[allow(non_camel_case_types)]
pub struct WebcamPlugin_P {
    pub fps: i64,
}
/// Inferred from `servers[]`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ServersItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<bool>,
}
/// Root of the configuration document.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ConfigKeys {
    pub r#type: String,
    #[serde(rename = "maxRetries")]
    pub max_retries: i64,
    #[serde(rename = "max_retries")]
    pub max_retries_2: i64,
    pub ports: Vec<WidenedString>,
    pub ratio: Vec<f64>,
    pub tags: Vec<Option<serde_json::Value>>,
    pub webcam_plugin: WebcamPlugin_P,
    pub servers: Vec<ServersItem>,
}
impl ConfigKeys {
    /// Deserialize the whole configuration document.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
    /// Parse the configuration document from JSON text.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
