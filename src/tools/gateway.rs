//! The three public operations: health check, schema, query.
//!
//! Errors are data here. Every internal failure folds into the
//! operation's documented return shape - a string prefix for the health
//! check, an `{"error": ...}` object for the JSON operations - carrying
//! the driver's message verbatim. Nothing is raised past this boundary,
//! so the transport layer needs no failure handling of its own.
//!
//! Each call records one line with the injected audit log before doing
//! any work; for query, the line carries the literal SQL text.

use crate::audit::AuditLog;
use crate::db::{ConnectionGateway, QueryExecutor, SchemaIntrospector};
use crate::error::{GatewayError, GatewayResult};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use tracing::info;

/// Health check success message.
pub const HEALTH_OK: &str = "Connection is OK";

/// Handler for the gateway's public operations.
pub struct GatewayTools {
    gateway: Arc<ConnectionGateway>,
    audit: Arc<dyn AuditLog>,
}

impl GatewayTools {
    pub fn new(gateway: Arc<ConnectionGateway>, audit: Arc<dyn AuditLog>) -> Self {
        Self { gateway, audit }
    }

    /// Test that the database is reachable.
    ///
    /// Opens a connection and immediately closes it. Returns exactly
    /// "Connection is OK" on success, "Connection failed: <msg>" on any
    /// failure.
    pub async fn health_check(&self) -> String {
        self.audit.record("Called health_check()");

        match self.gateway.open().await {
            Ok(conn) => {
                let _ = conn.close().await;
                info!("Health check passed");
                HEALTH_OK.to_string()
            }
            Err(e) => {
                info!(error = %e, "Health check failed");
                format!("Connection failed: {e}")
            }
        }
    }

    /// Enumerate base-table schema as a compact JSON object
    /// (table name -> array of {schema, name, type}).
    pub async fn get_schema(&self) -> String {
        self.audit.record("Called get_schema()");

        match self.get_schema_inner().await {
            Ok(body) => body,
            Err(e) => {
                info!(error = %e, sql_state = ?e.sql_state(), "Schema scan failed");
                error_body(&e)
            }
        }
    }

    /// Execute `sql` verbatim and return the row set as a compact JSON
    /// array of row objects. Any failure - syntax, constraint, driver -
    /// becomes `{"error": "<msg>"}` instead of the array.
    pub async fn query(&self, sql: &str) -> String {
        self.audit.record(&format!("Called query({sql})"));

        match self.query_inner(sql).await {
            Ok(body) => body,
            Err(e) => {
                info!(error = %e, sql_state = ?e.sql_state(), "Query failed");
                error_body(&e)
            }
        }
    }

    async fn get_schema_inner(&self) -> GatewayResult<String> {
        let conn = self.gateway.open().await?;
        let catalog = SchemaIntrospector::scan(conn).await?;
        info!(tables = catalog.table_count(), "Schema scan complete");

        serde_json::to_string(&catalog.into_json())
            .map_err(|e| GatewayError::encoding(e.to_string()))
    }

    async fn query_inner(&self, sql: &str) -> GatewayResult<String> {
        let conn = self.gateway.open().await?;
        let rows = QueryExecutor::run(conn, sql).await?;
        info!(rows = rows.len(), "Query executed");

        let body = JsonValue::Array(rows.into_iter().map(JsonValue::Object).collect());
        serde_json::to_string(&body).map_err(|e| GatewayError::encoding(e.to_string()))
    }
}

/// The documented error shape for the JSON operations.
fn error_body(err: &GatewayError) -> String {
    json!({ "error": err.to_string() }).to_string()
}
