//! Accessor source generation
//!
//! The generator is a pure function of the schema tree; writing the result to
//! disk is left to [`crate::artifact`].

pub mod rust;

pub use rust::{GENERATED_HEADER, generate_rust, rust_type};
