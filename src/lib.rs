//! # config-keys - typed accessors for JSON configuration documents
//!
//! Infers a schema for an arbitrary JSON configuration document, generates one
//! Rust struct per record shape, and keeps the generated file in sync as the
//! document is loaded, updated and consolidated from module templates.
//!
//! ## Quick Start
//!
//! ```no_run
//! use config_keys::{ConfigManager, TypedValue};
//! use serde_json::json;
//!
//! # fn main() -> config_keys::Result<()> {
//! let manager = ConfigManager::initialize(".config")?;
//! let config = manager.save(json!({"database": {"host": "db.local"}}))?;
//! assert_eq!(config.lookup("database.host").and_then(TypedValue::as_str), Some("db.local"));
//! # Ok(())
//! # }
//! ```
//!
//! The generated `config_keys.rs` can then be included by the consuming crate
//! for compile-time access to the same document.

pub mod accessor;
pub mod artifact;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod manager;
pub mod merge;
pub mod schema;
pub mod templates;

pub use accessor::{AccessorRoot, RecordView, TypedValue};
pub use cli::{Cli, Output};
pub use codegen::generate_rust;
pub use config::GeneratorConfig;
pub use error::{KeysError, Result, StructuralError};
pub use manager::{ConfigManager, ManagerOptions, PipelineState};
pub use schema::{FieldShape, SchemaTree, build, infer};
pub use templates::{ConsolidationSummary, Fragment, consolidate};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
