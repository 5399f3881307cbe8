//! Integration tests for the gateway operations against SQLite.
//!
//! Each operation opens its own connection, so the database lives in a
//! temporary file rather than in memory.

use sql_gateway_mcp::audit::MemoryAuditLog;
use sql_gateway_mcp::db::ConnectionGateway;
use sql_gateway_mcp::tools::GatewayTools;
use serde_json::Value as JsonValue;
use sqlx::{Connection, SqliteConnection};
use std::sync::Arc;
use tempfile::TempDir;

/// Create a file-backed SQLite database and run the given statements.
/// Returns the temp dir (keep it alive) and the connection descriptor.
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

fn tools_for(descriptor: &str) -> (GatewayTools, Arc<MemoryAuditLog>) {
    let audit = Arc::new(MemoryAuditLog::new());
    let gateway = Arc::new(ConnectionGateway::new(descriptor).unwrap());
    (GatewayTools::new(gateway, audit.clone()), audit)
}

#[tokio::test]
async fn test_health_check_reports_ok() {
    let (_dir, descriptor) = seeded_database(&[]).await;
    let (tools, _) = tools_for(&descriptor);

    assert_eq!(tools.health_check().await, "Connection is OK");
}

#[tokio::test]
async fn test_health_check_reports_failure_with_prefix() {
    let (tools, _) = tools_for("sqlite:/nonexistent-dir/missing.db");

    let result = tools.health_check().await;
    assert!(result.starts_with("Connection failed: "), "got: {result}");
    assert!(result.len() > "Connection failed: ".len());
}

#[tokio::test]
async fn test_query_preserves_null_and_key_order() {
    let (_dir, descriptor) = seeded_database(&[
        "CREATE TABLE t (id INTEGER, name TEXT, note TEXT)",
        "INSERT INTO t (id, name, note) VALUES (1, 'a', NULL)",
    ])
    .await;
    let (tools, _) = tools_for(&descriptor);

    let body = tools.query("SELECT id, name, note FROM t").await;
    assert_eq!(body, r#"[{"id":1,"name":"a","note":null}]"#);
}

#[tokio::test]
async fn test_query_null_distinct_from_null_string() {
    let (_dir, descriptor) = seeded_database(&[
        "CREATE TABLE t (a TEXT, b TEXT)",
        "INSERT INTO t (a, b) VALUES ('null', NULL)",
    ])
    .await;
    let (tools, _) = tools_for(&descriptor);

    let body = tools.query("SELECT a, b FROM t").await;
    assert_eq!(body, r#"[{"a":"null","b":null}]"#);
}

#[tokio::test]
async fn test_query_preserves_large_integer() {
    // 2^53 + 1 is not representable as an f64
    let (_dir, descriptor) = seeded_database(&[
        "CREATE TABLE t (big INTEGER)",
        "INSERT INTO t (big) VALUES (9007199254740993)",
    ])
    .await;
    let (tools, _) = tools_for(&descriptor);

    let body = tools.query("SELECT big FROM t").await;
    assert_eq!(body, r#"[{"big":9007199254740993}]"#);
}

#[tokio::test]
async fn test_query_empty_result_is_empty_array() {
    let (_dir, descriptor) =
        seeded_database(&["CREATE TABLE t (id INTEGER)"]).await;
    let (tools, _) = tools_for(&descriptor);

    assert_eq!(tools.query("SELECT * FROM t").await, "[]");
}

#[tokio::test]
async fn test_query_malformed_sql_returns_error_object() {
    let (_dir, descriptor) = seeded_database(&[]).await;
    let (tools, _) = tools_for(&descriptor);

    let body = tools.query("SELEC * FORM nothing").await;
    let parsed: JsonValue = serde_json::from_str(&body).unwrap();

    // The error shape is an object, never a row array
    assert!(parsed.is_object());
    let message = parsed["error"].as_str().unwrap();
    assert!(!message.is_empty());
}

#[tokio::test]
async fn test_query_missing_table_returns_error_object() {
    let (_dir, descriptor) = seeded_database(&[]).await;
    let (tools, _) = tools_for(&descriptor);

    let body = tools.query("SELECT * FROM no_such_table").await;
    let parsed: JsonValue = serde_json::from_str(&body).unwrap();
    assert!(parsed["error"].as_str().unwrap().contains("no_such_table"));
}

#[tokio::test]
async fn test_repeated_calls_are_byte_identical() {
    let (_dir, descriptor) = seeded_database(&[
        "CREATE TABLE t (id INTEGER, name TEXT)",
        "INSERT INTO t VALUES (1, 'x'), (2, 'y')",
    ])
    .await;
    let (tools, _) = tools_for(&descriptor);

    let first = tools.query("SELECT id, name FROM t ORDER BY id").await;
    let second = tools.query("SELECT id, name FROM t ORDER BY id").await;
    assert_eq!(first, second);

    let schema_first = tools.get_schema().await;
    let schema_second = tools.get_schema().await;
    assert_eq!(schema_first, schema_second);
}

#[tokio::test]
async fn test_audit_records_every_call_in_order() {
    let (_dir, descriptor) =
        seeded_database(&["CREATE TABLE t (id INTEGER)"]).await;
    let (tools, audit) = tools_for(&descriptor);

    tools.health_check().await;
    tools.get_schema().await;
    tools.query("SELECT * FROM t").await;

    assert_eq!(
        audit.events(),
        vec![
            "Called health_check()".to_string(),
            "Called get_schema()".to_string(),
            "Called query(SELECT * FROM t)".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_audit_records_failed_calls_too() {
    let (tools, audit) = tools_for("sqlite:/nonexistent-dir/missing.db");

    tools.health_check().await;
    tools.query("SELECT 1").await;

    assert_eq!(
        audit.events(),
        vec![
            "Called health_check()".to_string(),
            "Called query(SELECT 1)".to_string(),
        ]
    );
}
