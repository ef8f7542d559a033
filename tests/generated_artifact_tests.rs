//! The generated artifact compiles and reads back the document it came from

use config_keys::{build, generate_rust};
use quote::ToTokens;

const DOCUMENT: &str = include_str!("fixtures/mixed_document.json");
const ARTIFACT: &str = include_str!("fixtures/mixed_document.rs");

#[allow(dead_code)]
mod generated {
    include!("fixtures/mixed_document.rs");
}

use generated::{ConfigKeys, WidenedString};

fn tokens(source: &str) -> String {
    syn::parse_file(source)
        .expect("source should parse")
        .into_token_stream()
        .to_string()
}

#[test]
fn test_fixture_matches_generator_output() {
    let raw: serde_json::Value = serde_json::from_str(DOCUMENT).unwrap();
    let code = generate_rust(&build(&raw).unwrap());
    assert_eq!(tokens(&code), tokens(ARTIFACT));
}

#[test]
fn test_generated_types_read_the_document() {
    let config = ConfigKeys::from_json_str(DOCUMENT).unwrap();

    assert_eq!(config.r#type, "primary");
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.max_retries_2, 5);
    assert_eq!(
        config.ports,
        vec![WidenedString("80".to_string()), WidenedString("http".to_string())]
    );
    assert_eq!(config.ratio, vec![1.0, 2.5]);
    assert!(config.tags.is_empty());
    assert_eq!(config.webcam_plugin.fps, 30);
    assert_eq!(config.servers.len(), 2);
    assert_eq!(config.servers[0].tls, Some(true));
    assert_eq!(config.servers[1].tls, None);
}

#[test]
fn test_generated_types_serialize_without_absent_options() {
    let config = ConfigKeys::from_value(serde_json::from_str(DOCUMENT).unwrap()).unwrap();
    let servers = serde_json::to_value(&config.servers).unwrap();
    assert_eq!(
        servers,
        serde_json::json!([{"name": "a", "tls": true}, {"name": "b"}])
    );

    let back = serde_json::to_value(&config).unwrap();
    assert_eq!(back["maxRetries"], 3);
    assert_eq!(back["max_retries"], 5);
    assert_eq!(back["ports"], serde_json::json!(["80", "http"]));
}
