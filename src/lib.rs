//! SQL Gateway MCP Server Library
//!
//! A minimal, stateless SQL gateway exposed over MCP (Model Context
//! Protocol). Three operations against one configured database
//! (PostgreSQL, MySQL, SQLite): health check, schema listing, and
//! ad hoc query execution with JSON results.

pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::GatewayError;
pub use mcp::GatewayService;
pub use tools::GatewayTools;
