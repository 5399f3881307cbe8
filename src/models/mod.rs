//! Data models for the SQL gateway.
//!
//! All entities here are created fresh per operation call and discarded
//! when the call returns; nothing is mutated after construction.

pub mod schema;
pub mod value;

pub use schema::{ColumnDescriptor, SchemaCatalog};
pub use value::CellValue;
