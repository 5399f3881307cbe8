//! Integration tests for the schema listing operation against SQLite.

use sql_gateway_mcp::audit::NoopAuditLog;
use sql_gateway_mcp::db::ConnectionGateway;
use sql_gateway_mcp::tools::GatewayTools;
use serde_json::Value as JsonValue;
use sqlx::{Connection, SqliteConnection};
use std::sync::Arc;
use tempfile::TempDir;

async fn seeded_database(statements: &[&str]) -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let descriptor = format!("sqlite:{}?mode=rwc", dir.path().join("data.db").display());

    let mut conn = SqliteConnection::connect(&descriptor).await.unwrap();
    for sql in statements {
        sqlx::query(sql).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();

    (dir, descriptor)
}

fn tools_for(descriptor: &str) -> GatewayTools {
    let gateway = Arc::new(ConnectionGateway::new(descriptor).unwrap());
    GatewayTools::new(gateway, Arc::new(NoopAuditLog))
}

async fn schema_of(statements: &[&str]) -> (TempDir, JsonValue) {
    let (dir, descriptor) = seeded_database(statements).await;
    let body = tools_for(&descriptor).get_schema().await;
    let parsed = serde_json::from_str(&body).unwrap();
    (dir, parsed)
}

#[tokio::test]
async fn test_empty_database_yields_empty_object() {
    let (_dir, schema) = schema_of(&[]).await;
    assert_eq!(schema, serde_json::json!({}));
}

#[tokio::test]
async fn test_tables_keyed_by_name_with_column_descriptors() {
    let (_dir, schema) = schema_of(&[
        "CREATE TABLE users (id INTEGER, name TEXT)",
        "CREATE TABLE orders (id INTEGER, user_id INTEGER, total REAL)",
    ])
    .await;

    let users = schema["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["schema"], "main");
    assert_eq!(users[0]["name"], "id");
    assert_eq!(users[0]["type"], "INTEGER");
    assert_eq!(users[1]["name"], "name");
    assert_eq!(users[1]["type"], "TEXT");

    let orders = schema["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[2]["name"], "total");
    assert_eq!(orders[2]["type"], "REAL");
}

#[tokio::test]
async fn test_columns_keep_definition_order() {
    let (_dir, schema) = schema_of(&[
        "CREATE TABLE wide (z TEXT, a TEXT, m TEXT)",
    ])
    .await;

    let names: Vec<&str> = schema["wide"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["z", "a", "m"]);
}

#[tokio::test]
async fn test_views_are_excluded() {
    let (_dir, schema) = schema_of(&[
        "CREATE TABLE base (id INTEGER)",
        "CREATE VIEW v AS SELECT id FROM base",
    ])
    .await;

    assert!(schema.get("base").is_some());
    assert!(schema.get("v").is_none());
}

#[tokio::test]
async fn test_schema_failure_returns_error_object() {
    let body = tools_for("sqlite:/nonexistent-dir/missing.db")
        .get_schema()
        .await;
    let parsed: JsonValue = serde_json::from_str(&body).unwrap();
    assert!(parsed.is_object());
    assert!(parsed.get("error").is_some());
}
