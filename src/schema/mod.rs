//! Schema inference for arbitrary JSON documents
//!
//! - [`infer`] - shape inference over sample values, with union-of-fields for lists of objects
//! - [`naming`] - type and field identifier synthesis and collision handling
//! - [`tree`] - the ordered tree of named records for one document

pub mod infer;
pub mod naming;
pub mod path;
pub mod shape;
pub mod tree;

pub use infer::{infer, infer_value};
pub use naming::NameRegistry;
pub use path::{KeyPath, Segment};
pub use shape::{FieldShape, PrimitiveKind, RecordShape};
pub use tree::{DEFAULT_ROOT_TYPE, FieldDef, FieldType, RecordDef, SchemaTree, build, build_with_root};
