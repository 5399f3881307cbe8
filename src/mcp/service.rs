//! MCP service implementation using rmcp.
//!
//! Defines the GatewayService struct exposing the three gateway
//! operations as MCP tools. Each tool returns a plain string: the
//! operations already fold their errors into the string body, so there
//! is nothing for the protocol layer to fail on.

use crate::tools::GatewayTools;
use rmcp::{
    ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    schemars::JsonSchema,
    tool, tool_handler, tool_router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Input for the query tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// SQL statement to execute verbatim
    pub sql: String,
}

#[derive(Clone)]
pub struct GatewayService {
    /// Shared operation handler
    tools: Arc<GatewayTools>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl GatewayService {
    pub fn new(tools: Arc<GatewayTools>) -> Self {
        Self {
            tools,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl GatewayService {
    #[tool(description = "Tests if the database connection is good and alive.")]
    async fn health_check(&self) -> String {
        self.tools.health_check().await
    }

    #[tool(
        description = "Get a list of all tables with their respective schema, columns and types."
    )]
    async fn get_schema(&self) -> String {
        self.tools.get_schema().await
    }

    #[tool(description = "Execute a query into the database and return the result as a JSON.")]
    async fn query(&self, Parameters(input): Parameters<QueryInput>) -> String {
        self.tools.query(&input.sql).await
    }
}

#[tool_handler]
impl ServerHandler for GatewayService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sql-gateway-mcp".to_owned(),
                title: Some("SQL Gateway MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-focused SQL gateway for a single configured database.\n\
                \n\
                ## Tools\n\
                - `health_check`: verify the database is reachable\n\
                - `get_schema`: list all tables with their columns and types\n\
                - `query`: run a SQL statement and get the rows as JSON\n\
                \n\
                Failures never raise protocol errors: `health_check` returns\n\
                \"Connection failed: <msg>\" and the JSON tools return\n\
                `{\"error\": \"<msg>\"}` in the response body."
                    .to_string(),
            ),
        }
    }
}
