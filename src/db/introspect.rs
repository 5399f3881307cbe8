//! Schema introspection.
//!
//! Each backend runs a fixed catalog query joining its table catalog
//! against its column catalog, filtered to base tables (views and system
//! objects excluded), inside a read-committed transaction so the scan
//! sees one consistent snapshot. Rows fold into a `SchemaCatalog` keyed
//! by table name, in catalog scan order with no explicit sort.

use crate::db::gateway::{self, DbConnection};
use crate::error::{GatewayError, GatewayResult};
use crate::models::{ColumnDescriptor, SchemaCatalog};
use sqlx::{Connection, MySqlConnection, PgConnection, Row, SqliteConnection};
use tracing::debug;

/// One row of the catalog scan: (schema, table, column, declared type).
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub type_name: String,
}

/// Fold catalog rows into the table -> columns mapping. Pure function;
/// the column sequence for a table is created on first encounter and
/// appended to in scan order.
pub fn fold(rows: impl IntoIterator<Item = CatalogRow>) -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new();
    for row in rows {
        let column = ColumnDescriptor::new(row.schema, row.column, row.type_name);
        catalog.push(&row.table, &column);
    }
    catalog
}

/// Schema introspector over a single short-lived connection.
pub struct SchemaIntrospector;

impl SchemaIntrospector {
    /// Scan the catalog and build the schema mapping. The connection is
    /// consumed and released on every exit path; the transaction is
    /// read-only, so it is simply dropped after the scan.
    pub async fn scan(conn: DbConnection) -> GatewayResult<SchemaCatalog> {
        let rows = match conn {
            DbConnection::Postgres(conn) => postgres::scan(conn).await?,
            DbConnection::MySql(conn) => mysql::scan(conn).await?,
            DbConnection::Sqlite(conn) => sqlite::scan(conn).await?,
        };

        debug!(rows = rows.len(), "Catalog scan complete");
        Ok(fold(rows))
    }
}

// =============================================================================
// Catalog Queries
// =============================================================================
//
// No ORDER BY: insertion order is whatever the catalog returns, matching
// the scan-order contract. MySQL's information_schema strings need a
// CONVERT to utf8 to decode cleanly.

mod queries {
    pub const POSTGRES: &str = r#"
        SELECT
            t.table_schema,
            t.table_name,
            c.column_name,
            c.data_type
        FROM
            information_schema.tables t
        JOIN
            information_schema.columns c
            ON t.table_name = c.table_name
            AND t.table_schema = c.table_schema
        WHERE
            t.table_type = 'BASE TABLE'
            AND t.table_schema NOT IN ('pg_catalog', 'information_schema')
        "#;

    pub const MYSQL: &str = r#"
        SELECT
            CONVERT(t.TABLE_SCHEMA USING utf8) AS table_schema,
            CONVERT(t.TABLE_NAME USING utf8) AS table_name,
            CONVERT(c.COLUMN_NAME USING utf8) AS column_name,
            CONVERT(c.DATA_TYPE USING utf8) AS data_type
        FROM
            information_schema.TABLES t
        JOIN
            information_schema.COLUMNS c
            ON t.TABLE_NAME = c.TABLE_NAME
            AND t.TABLE_SCHEMA = c.TABLE_SCHEMA
        WHERE
            t.TABLE_TYPE = 'BASE TABLE'
            AND t.TABLE_SCHEMA = DATABASE()
        "#;

    pub const SQLITE: &str = r#"
        SELECT
            'main' AS table_schema,
            m.name AS table_name,
            i.name AS column_name,
            i.type AS data_type
        FROM
            sqlite_master m
        JOIN
            pragma_table_info(m.name) i
        WHERE
            m.type = 'table'
            AND m.name NOT LIKE 'sqlite_%'
        "#;
}

// =============================================================================
// Database-Specific Scans
// =============================================================================

mod postgres {
    use super::*;

    pub async fn scan(mut conn: PgConnection) -> GatewayResult<Vec<CatalogRow>> {
        let rows = {
            let mut tx = gateway::begin_read_committed_pg(&mut conn)
                .await
                .map_err(GatewayError::catalog)?;
            sqlx::query(queries::POSTGRES)
                .fetch_all(&mut *tx)
                .await
                .map_err(GatewayError::catalog)?
            // read-only transaction dropped here
        };
        let _ = conn.close().await;

        rows.iter()
            .map(|row| {
                Ok(CatalogRow {
                    schema: row.try_get(0).map_err(GatewayError::catalog)?,
                    table: row.try_get(1).map_err(GatewayError::catalog)?,
                    column: row.try_get(2).map_err(GatewayError::catalog)?,
                    type_name: row.try_get(3).map_err(GatewayError::catalog)?,
                })
            })
            .collect()
    }
}

mod mysql {
    use super::*;

    pub async fn scan(mut conn: MySqlConnection) -> GatewayResult<Vec<CatalogRow>> {
        let rows = {
            let mut tx = gateway::begin_read_committed_mysql(&mut conn)
                .await
                .map_err(GatewayError::catalog)?;
            sqlx::query(queries::MYSQL)
                .fetch_all(&mut *tx)
                .await
                .map_err(GatewayError::catalog)?
        };
        let _ = conn.close().await;

        rows.iter()
            .map(|row| {
                Ok(CatalogRow {
                    schema: row.try_get(0).map_err(GatewayError::catalog)?,
                    table: row.try_get(1).map_err(GatewayError::catalog)?,
                    column: row.try_get(2).map_err(GatewayError::catalog)?,
                    type_name: row.try_get(3).map_err(GatewayError::catalog)?,
                })
            })
            .collect()
    }
}

mod sqlite {
    use super::*;

    pub async fn scan(mut conn: SqliteConnection) -> GatewayResult<Vec<CatalogRow>> {
        // SQLite has no isolation levels; a plain transaction stands in
        let rows = {
            let mut tx = conn.begin().await.map_err(GatewayError::catalog)?;
            sqlx::query(queries::SQLITE)
                .fetch_all(&mut *tx)
                .await
                .map_err(GatewayError::catalog)?
        };
        let _ = conn.close().await;

        rows.iter()
            .map(|row| {
                Ok(CatalogRow {
                    schema: row.try_get(0).map_err(GatewayError::catalog)?,
                    table: row.try_get(1).map_err(GatewayError::catalog)?,
                    column: row.try_get(2).map_err(GatewayError::catalog)?,
                    type_name: row.try_get(3).map_err(GatewayError::catalog)?,
                })
            })
            .collect()
    }
}
