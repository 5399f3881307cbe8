//! Database access layer.
//!
//! This module provides the gateway's core path:
//! - Connection gateway (one short-lived connection per call)
//! - Query execution inside read-committed transactions
//! - Schema introspection
//! - Row-to-JSON encoding

pub mod encode;
pub mod gateway;
pub mod introspect;
pub mod query;

pub use encode::{EncodeRow, TypeCategory, categorize_type};
pub use gateway::{ConnectionGateway, DatabaseKind, DbConnection};
pub use introspect::SchemaIntrospector;
pub use query::{QueryExecutor, ResultSet};
