//! MCP server integration module.
//!
//! Bridges the MCP protocol and the gateway operations using the rmcp
//! framework.

pub mod service;

pub use service::GatewayService;
