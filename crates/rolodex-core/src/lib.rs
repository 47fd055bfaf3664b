// Core types shared across all Rolodex crates
pub mod config;
pub mod model;
pub mod table;
pub mod value;

// Re-export commonly used types for convenience
pub use config::{AuthConfig, ConfigError, DatabaseConfig, GateKind, RolodexConfig, ServerConfig};
pub use model::{Client, Commission, Identity};
pub use table::{ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, TableDescriptor};
pub use value::{CellValue, QueryResult, ResultRow};
