pub mod consolidate;
pub mod generate;
pub mod get;
pub mod save;
pub mod set;
pub mod show;
pub mod types;
