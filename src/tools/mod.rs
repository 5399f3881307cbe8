//! Public gateway operations.

pub mod gateway;

pub use gateway::GatewayTools;
