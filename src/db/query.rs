//! Query execution.
//!
//! The executor runs one caller-supplied statement verbatim inside a
//! read-committed transaction, materializes every row through the row
//! encoder, then commits. Materialization happens before commit so a
//! mid-read failure still rolls back. The statement kind is not
//! validated: supplying safe SQL is the caller's responsibility, by
//! contract.

use crate::db::encode::EncodeRow;
use crate::db::gateway::{self, DbConnection};
use crate::error::{GatewayError, GatewayResult};
use serde_json::Value as JsonValue;
use sqlx::{Connection, MySqlConnection, PgConnection, SqliteConnection};
use tracing::debug;

/// A materialized result set: one JSON object per row, keys in declared
/// column order.
pub type ResultSet = Vec<serde_json::Map<String, JsonValue>>;

/// Executes arbitrary read statements over a single short-lived connection.
pub struct QueryExecutor;

impl QueryExecutor {
    /// Run `sql` as a single statement and materialize the row set.
    ///
    /// The connection is consumed and released on every exit path. On
    /// failure the transaction is abandoned (rollback on drop) and the
    /// error carries the driver's own message.
    pub async fn run(conn: DbConnection, sql: &str) -> GatewayResult<ResultSet> {
        debug!(sql = %sql, "Executing query");

        match conn {
            DbConnection::Postgres(conn) => postgres::run(conn, sql).await,
            DbConnection::MySql(conn) => mysql::run(conn, sql).await,
            DbConnection::Sqlite(conn) => sqlite::run(conn, sql).await,
        }
    }
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================
//
// Parallel per-backend paths; only transaction setup differs.

mod postgres {
    use super::*;

    pub async fn run(mut conn: PgConnection, sql: &str) -> GatewayResult<ResultSet> {
        let result_set = {
            let mut tx = gateway::begin_read_committed_pg(&mut conn)
                .await
                .map_err(GatewayError::query)?;
            let rows = sqlx::query(sql)
                .fetch_all(&mut *tx)
                .await
                .map_err(GatewayError::query)?;
            let result_set: ResultSet = rows.iter().map(|r| r.encode()).collect();
            tx.commit().await.map_err(GatewayError::query)?;
            result_set
        };
        let _ = conn.close().await;
        Ok(result_set)
    }
}

mod mysql {
    use super::*;

    pub async fn run(mut conn: MySqlConnection, sql: &str) -> GatewayResult<ResultSet> {
        let result_set = {
            let mut tx = gateway::begin_read_committed_mysql(&mut conn)
                .await
                .map_err(GatewayError::query)?;
            let rows = sqlx::query(sql)
                .fetch_all(&mut *tx)
                .await
                .map_err(GatewayError::query)?;
            let result_set: ResultSet = rows.iter().map(|r| r.encode()).collect();
            tx.commit().await.map_err(GatewayError::query)?;
            result_set
        };
        let _ = conn.close().await;
        Ok(result_set)
    }
}

mod sqlite {
    use super::*;

    pub async fn run(mut conn: SqliteConnection, sql: &str) -> GatewayResult<ResultSet> {
        let result_set = {
            let mut tx = conn.begin().await.map_err(GatewayError::query)?;
            let rows = sqlx::query(sql)
                .fetch_all(&mut *tx)
                .await
                .map_err(GatewayError::query)?;
            let result_set: ResultSet = rows.iter().map(|r| r.encode()).collect();
            tx.commit().await.map_err(GatewayError::query)?;
            result_set
        };
        let _ = conn.close().await;
        Ok(result_set)
    }
}
