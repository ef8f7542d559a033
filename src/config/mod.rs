//! Settings for the generator itself
//!
//! These control where the source document and artifact live and how
//! templates are discovered. They are unrelated to the configuration
//! documents the tool generates code for.

pub mod core;
pub mod formats;
pub mod overrides;

pub use core::GeneratorConfig;
pub use formats::ConfigFormat;
pub use overrides::CliOverrides;
