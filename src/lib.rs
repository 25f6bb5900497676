// GameVault - Personal video game catalog over a pluggable local namespace

pub mod backend;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod json_file;
pub mod models;
pub mod sqlite;
pub mod stats;
pub mod store;
pub mod table;
pub mod validation;

// Re-export main types for convenience
pub use backend::{Backend, MemoryBackend};
pub use catalog::{Catalog, CatalogError, ViewFilter};
pub use config::{BackendKind, Config, FileConfig};
pub use filter::Filter;
pub use json_file::JsonFileBackend;
pub use models::{Game, GameFormData, Platform, Status};
pub use sqlite::SqliteBackend;
pub use stats::CatalogStats;
pub use store::{DEFAULT_NAMESPACE, Store, StoreError};
pub use validation::{GameForm, ValidationErrors, validate, validate_at};
