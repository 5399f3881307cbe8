//! Row encoding.
//!
//! Converts driver-typed rows into JSON-safe objects without losing
//! NULL-ness or precision. Conversion is two-phase:
//! 1. `TypeCategory` classifies the declared column type
//! 2. database-specific decoders extract the value into a `CellValue`
//!
//! Types with no direct JSON equivalent get a fixed, lossless textual
//! encoding: DECIMAL/NUMERIC as its raw text form, temporal values via
//! chrono formatting, UUIDs hyphenated, binary as base64. SQL NULL always
//! becomes JSON `null`.

use crate::db::DatabaseKind;
use crate::models::CellValue;
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlRow, MySqlTypeInfo, MySqlValueRef};
use sqlx::postgres::{PgRow, PgTypeInfo, PgValueRef};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Decode, Row, Type, TypeInfo};

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for database column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Temporal,
    Binary,
    Json,
    Uuid,
    Unknown,
}

/// Classify a database type name into a logical category.
pub fn categorize_type(type_name: &str, db: DatabaseKind) -> TypeCategory {
    let lower = type_name.to_lowercase();

    // Decimal/Numeric - check first as it overlaps with "numeric" in float checks
    if lower.contains("decimal") || lower.contains("numeric") {
        // SQLite's NUMERIC affinity is really a float
        if db == DatabaseKind::Sqlite && lower == "numeric" {
            return TypeCategory::Float;
        }
        return TypeCategory::Decimal;
    }

    // Temporal - before the integer check ("datetime2" etc. contain no "int",
    // but "timestamp" must not fall through to the bare "time" match below)
    if lower.contains("timestamp") || lower.contains("datetime") {
        return TypeCategory::Temporal;
    }
    if lower == "date" || lower == "time" || lower == "timetz" {
        return TypeCategory::Temporal;
    }

    // Integer types (MySQL YEAR decodes as an integer)
    if lower.contains("int") || lower.contains("serial") || lower == "year" {
        return TypeCategory::Integer;
    }

    // Boolean
    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }

    // Float types
    if lower.contains("float")
        || lower.contains("double")
        || lower == "real"
        || lower == "float4"
        || lower == "float8"
    {
        return TypeCategory::Float;
    }

    // JSON types
    if lower == "json" || lower == "jsonb" {
        return TypeCategory::Json;
    }

    // UUID (PostgreSQL)
    if lower == "uuid" {
        return TypeCategory::Uuid;
    }

    // Binary types
    if lower.contains("blob") || lower.contains("binary") || lower == "bytea" {
        return TypeCategory::Binary;
    }

    // Everything else (varchar, text, char, enum, ...) decodes as text
    TypeCategory::Unknown
}

// =============================================================================
// Decimal Type Support
// =============================================================================

/// Wrapper type for raw DECIMAL/NUMERIC values as strings.
/// Preserves the exact database representation with no float round-trip.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<sqlx::MySql> for RawDecimal {
    fn type_info() -> MySqlTypeInfo {
        <String as Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("decimal") || name.contains("numeric")
    }
}

impl<'r> Decode<'r, sqlx::MySql> for RawDecimal {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::MySql>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

impl Type<sqlx::Postgres> for RawDecimal {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("numeric") || name.contains("decimal")
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for RawDecimal {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::Postgres>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

/// Fixed textual encoding for binary data.
pub fn encode_binary(bytes: &[u8]) -> CellValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    CellValue::Text(STANDARD.encode(bytes))
}

// =============================================================================
// Row Encoding
// =============================================================================

/// Conversion from a driver row to a JSON object.
///
/// Object keys are the column names in declared column order
/// (serde_json's preserve_order map keeps insertion order).
pub trait EncodeRow {
    fn encode(&self) -> serde_json::Map<String, JsonValue>;
}

impl EncodeRow for PgRow {
    fn encode(&self) -> serde_json::Map<String, JsonValue> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let type_name = col.type_info().name();
                let category = categorize_type(type_name, DatabaseKind::Postgres);
                let value = postgres::decode_column(self, idx, type_name, category);
                (col.name().to_string(), value)
            })
            .collect()
    }
}

impl EncodeRow for MySqlRow {
    fn encode(&self) -> serde_json::Map<String, JsonValue> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let type_name = col.type_info().name();
                let category = categorize_type(type_name, DatabaseKind::MySql);
                let value = mysql::decode_column(self, idx, type_name, category);
                (col.name().to_string(), value)
            })
            .collect()
    }
}

impl EncodeRow for SqliteRow {
    fn encode(&self) -> serde_json::Map<String, JsonValue> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let type_name = col.type_info().name();
                let category = categorize_type(type_name, DatabaseKind::Sqlite);
                let value = sqlite::decode_column(self, idx, type_name, category);
                (col.name().to_string(), value)
            })
            .collect()
    }
}

// =============================================================================
// Database-Specific Decoders
// =============================================================================
//
// Each module below provides the same interface adapted to its database's
// type system. The structure is intentionally parallel.

mod postgres {
    use super::*;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use sqlx::postgres::types::PgTimeTz;

    pub fn decode_column(
        row: &PgRow,
        idx: usize,
        type_name: &str,
        category: TypeCategory,
    ) -> JsonValue {
        match category {
            // JSON columns already have a direct JSON equivalent
            TypeCategory::Json => decode_json(row, idx),
            other => decode_cell(row, idx, type_name, other).into_json(),
        }
    }

    fn decode_cell(
        row: &PgRow,
        idx: usize,
        type_name: &str,
        category: TypeCategory,
    ) -> CellValue {
        match category {
            TypeCategory::Decimal => decode_decimal(row, idx),
            TypeCategory::Integer => decode_integer(row, idx),
            TypeCategory::Boolean => decode_boolean(row, idx),
            TypeCategory::Float => decode_float(row, idx),
            TypeCategory::Temporal => decode_temporal(row, idx, type_name),
            TypeCategory::Binary => decode_binary_col(row, idx),
            TypeCategory::Uuid => decode_uuid(row, idx),
            _ => decode_text(row, idx),
        }
    }

    fn decode_decimal(row: &PgRow, idx: usize) -> CellValue {
        match row.try_get::<Option<RawDecimal>, _>(idx) {
            Ok(Some(v)) => CellValue::Text(v.0),
            Ok(None) => CellValue::Null,
            Err(e) => {
                tracing::error!("Failed to decode NUMERIC: {:?}", e);
                CellValue::Null
            }
        }
    }

    fn decode_integer(row: &PgRow, idx: usize) -> CellValue {
        if let Ok(None) = row.try_get::<Option<i64>, _>(idx) {
            return CellValue::Null;
        }
        if let Ok(Some(v)) = row.try_get::<Option<i16>, _>(idx) {
            return CellValue::Int(v.into());
        }
        if let Ok(Some(v)) = row.try_get::<Option<i32>, _>(idx) {
            return CellValue::Int(v.into());
        }
        if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
            return CellValue::Int(v);
        }
        CellValue::Null
    }

    fn decode_boolean(row: &PgRow, idx: usize) -> CellValue {
        row.try_get::<Option<bool>, _>(idx)
            .ok()
            .flatten()
            .map(CellValue::Bool)
            .unwrap_or(CellValue::Null)
    }

    fn decode_float(row: &PgRow, idx: usize) -> CellValue {
        if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
            return CellValue::Float(v);
        }
        if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
            return CellValue::Float(v as f64);
        }
        CellValue::Null
    }

    fn decode_temporal(row: &PgRow, idx: usize, type_name: &str) -> CellValue {
        match type_name.to_lowercase().as_str() {
            "timestamptz" => match row.try_get::<Option<DateTime<Utc>>, _>(idx) {
                Ok(Some(v)) => CellValue::Text(v.to_rfc3339()),
                _ => CellValue::Null,
            },
            "timestamp" => match row.try_get::<Option<NaiveDateTime>, _>(idx) {
                Ok(Some(v)) => CellValue::Text(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
                _ => CellValue::Null,
            },
            "date" => match row.try_get::<Option<NaiveDate>, _>(idx) {
                Ok(Some(v)) => CellValue::Text(v.to_string()),
                _ => CellValue::Null,
            },
            "time" => match row.try_get::<Option<NaiveTime>, _>(idx) {
                Ok(Some(v)) => CellValue::Text(v.to_string()),
                _ => CellValue::Null,
            },
            "timetz" => match row.try_get::<Option<PgTimeTz>, _>(idx) {
                Ok(Some(v)) => CellValue::Text(format_timetz(&v)),
                _ => CellValue::Null,
            },
            _ => decode_text(row, idx),
        }
    }

    /// Fixed textual form for TIMETZ: time followed by its UTC offset.
    pub(super) fn format_timetz(v: &PgTimeTz) -> String {
        format!("{}{}", v.time, v.offset)
    }

    fn decode_binary_col(row: &PgRow, idx: usize) -> CellValue {
        row.try_get::<Option<Vec<u8>>, _>(idx)
            .ok()
            .flatten()
            .map(|v| encode_binary(&v))
            .unwrap_or(CellValue::Null)
    }

    fn decode_uuid(row: &PgRow, idx: usize) -> CellValue {
        row.try_get::<Option<uuid::Uuid>, _>(idx)
            .ok()
            .flatten()
            .map(|v| CellValue::Text(v.hyphenated().to_string()))
            .unwrap_or(CellValue::Null)
    }

    fn decode_json(row: &PgRow, idx: usize) -> JsonValue {
        row.try_get::<Option<JsonValue>, _>(idx)
            .ok()
            .flatten()
            .unwrap_or(JsonValue::Null)
    }

    fn decode_text(row: &PgRow, idx: usize) -> CellValue {
        row.try_get::<Option<String>, _>(idx)
            .ok()
            .flatten()
            .map(CellValue::Text)
            .unwrap_or(CellValue::Null)
    }
}

mod mysql {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    pub fn decode_column(
        row: &MySqlRow,
        idx: usize,
        type_name: &str,
        category: TypeCategory,
    ) -> JsonValue {
        match category {
            TypeCategory::Json => decode_json(row, idx),
            other => decode_cell(row, idx, type_name, other).into_json(),
        }
    }

    fn decode_cell(
        row: &MySqlRow,
        idx: usize,
        type_name: &str,
        category: TypeCategory,
    ) -> CellValue {
        match category {
            TypeCategory::Decimal => decode_decimal(row, idx),
            TypeCategory::Integer => decode_integer(row, idx),
            TypeCategory::Boolean => decode_boolean(row, idx),
            TypeCategory::Float => decode_float(row, idx),
            TypeCategory::Temporal => decode_temporal(row, idx, type_name),
            TypeCategory::Binary => decode_binary_col(row, idx),
            _ => decode_text(row, idx),
        }
    }

    fn decode_decimal(row: &MySqlRow, idx: usize) -> CellValue {
        match row.try_get::<Option<RawDecimal>, _>(idx) {
            Ok(Some(v)) => CellValue::Text(v.0),
            Ok(None) => CellValue::Null,
            Err(e) => {
                tracing::error!("Failed to decode DECIMAL: {:?}", e);
                CellValue::Null
            }
        }
    }

    fn decode_integer(row: &MySqlRow, idx: usize) -> CellValue {
        // Check NULL first
        if let Ok(None) = row.try_get::<Option<i64>, _>(idx) {
            return CellValue::Null;
        }
        // Signed types
        if let Ok(Some(v)) = row.try_get::<Option<i8>, _>(idx) {
            return CellValue::Int(v.into());
        }
        if let Ok(Some(v)) = row.try_get::<Option<i16>, _>(idx) {
            return CellValue::Int(v.into());
        }
        if let Ok(Some(v)) = row.try_get::<Option<i32>, _>(idx) {
            return CellValue::Int(v.into());
        }
        if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
            return CellValue::Int(v);
        }
        // Unsigned types
        if let Ok(Some(v)) = row.try_get::<Option<u8>, _>(idx) {
            return CellValue::UInt(v.into());
        }
        if let Ok(Some(v)) = row.try_get::<Option<u16>, _>(idx) {
            return CellValue::UInt(v.into());
        }
        if let Ok(Some(v)) = row.try_get::<Option<u32>, _>(idx) {
            return CellValue::UInt(v.into());
        }
        if let Ok(Some(v)) = row.try_get::<Option<u64>, _>(idx) {
            return CellValue::UInt(v);
        }
        CellValue::Null
    }

    fn decode_boolean(row: &MySqlRow, idx: usize) -> CellValue {
        row.try_get::<Option<bool>, _>(idx)
            .ok()
            .flatten()
            .map(CellValue::Bool)
            .unwrap_or(CellValue::Null)
    }

    fn decode_float(row: &MySqlRow, idx: usize) -> CellValue {
        if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
            return CellValue::Float(v);
        }
        if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
            return CellValue::Float(v as f64);
        }
        CellValue::Null
    }

    fn decode_temporal(row: &MySqlRow, idx: usize, type_name: &str) -> CellValue {
        match type_name.to_lowercase().as_str() {
            "datetime" | "timestamp" => match row.try_get::<Option<NaiveDateTime>, _>(idx) {
                Ok(Some(v)) => CellValue::Text(v.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
                _ => CellValue::Null,
            },
            "date" => match row.try_get::<Option<NaiveDate>, _>(idx) {
                Ok(Some(v)) => CellValue::Text(v.to_string()),
                _ => CellValue::Null,
            },
            "time" => match row.try_get::<Option<NaiveTime>, _>(idx) {
                Ok(Some(v)) => CellValue::Text(v.to_string()),
                _ => CellValue::Null,
            },
            _ => decode_text(row, idx),
        }
    }

    fn decode_binary_col(row: &MySqlRow, idx: usize) -> CellValue {
        row.try_get::<Option<Vec<u8>>, _>(idx)
            .ok()
            .flatten()
            .map(|v| encode_binary(&v))
            .unwrap_or(CellValue::Null)
    }

    fn decode_json(row: &MySqlRow, idx: usize) -> JsonValue {
        row.try_get::<Option<JsonValue>, _>(idx)
            .ok()
            .flatten()
            .unwrap_or(JsonValue::Null)
    }

    fn decode_text(row: &MySqlRow, idx: usize) -> CellValue {
        row.try_get::<Option<String>, _>(idx)
            .ok()
            .flatten()
            .map(CellValue::Text)
            .unwrap_or(CellValue::Null)
    }
}

mod sqlite {
    use super::*;

    pub fn decode_column(
        row: &SqliteRow,
        idx: usize,
        _type_name: &str,
        category: TypeCategory,
    ) -> JsonValue {
        decode_cell(row, idx, category).into_json()
    }

    fn decode_cell(row: &SqliteRow, idx: usize, category: TypeCategory) -> CellValue {
        match category {
            TypeCategory::Integer => decode_integer(row, idx),
            TypeCategory::Boolean => decode_boolean(row, idx),
            TypeCategory::Float | TypeCategory::Decimal => decode_float(row, idx),
            TypeCategory::Binary => decode_binary_col(row, idx),
            // SQLite stores temporal values as text already
            _ => decode_text(row, idx),
        }
    }

    fn decode_integer(row: &SqliteRow, idx: usize) -> CellValue {
        match row.try_get::<Option<i64>, _>(idx) {
            Ok(Some(v)) => CellValue::Int(v),
            _ => CellValue::Null,
        }
    }

    fn decode_boolean(row: &SqliteRow, idx: usize) -> CellValue {
        row.try_get::<Option<bool>, _>(idx)
            .ok()
            .flatten()
            .map(CellValue::Bool)
            .unwrap_or(CellValue::Null)
    }

    fn decode_float(row: &SqliteRow, idx: usize) -> CellValue {
        match row.try_get::<Option<f64>, _>(idx) {
            Ok(Some(v)) => CellValue::Float(v),
            _ => CellValue::Null,
        }
    }

    fn decode_binary_col(row: &SqliteRow, idx: usize) -> CellValue {
        row.try_get::<Option<Vec<u8>>, _>(idx)
            .ok()
            .flatten()
            .map(|v| encode_binary(&v))
            .unwrap_or(CellValue::Null)
    }

    fn decode_text(row: &SqliteRow, idx: usize) -> CellValue {
        row.try_get::<Option<String>, _>(idx)
            .ok()
            .flatten()
            .map(CellValue::Text)
            .unwrap_or(CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_integer() {
        assert_eq!(
            categorize_type("INT", DatabaseKind::MySql),
            TypeCategory::Integer
        );
        assert_eq!(
            categorize_type("BIGINT", DatabaseKind::Postgres),
            TypeCategory::Integer
        );
        assert_eq!(
            categorize_type("SERIAL", DatabaseKind::Postgres),
            TypeCategory::Integer
        );
        assert_eq!(
            categorize_type("YEAR", DatabaseKind::MySql),
            TypeCategory::Integer
        );
    }

    #[test]
    fn test_categorize_decimal() {
        assert_eq!(
            categorize_type("DECIMAL", DatabaseKind::MySql),
            TypeCategory::Decimal
        );
        assert_eq!(
            categorize_type("NUMERIC", DatabaseKind::Postgres),
            TypeCategory::Decimal
        );
        // SQLite NUMERIC affinity is a float
        assert_eq!(
            categorize_type("numeric", DatabaseKind::Sqlite),
            TypeCategory::Float
        );
    }

    #[test]
    fn test_categorize_temporal() {
        assert_eq!(
            categorize_type("TIMESTAMPTZ", DatabaseKind::Postgres),
            TypeCategory::Temporal
        );
        assert_eq!(
            categorize_type("DATETIME", DatabaseKind::MySql),
            TypeCategory::Temporal
        );
        assert_eq!(
            categorize_type("date", DatabaseKind::Postgres),
            TypeCategory::Temporal
        );
        assert_eq!(
            categorize_type("time", DatabaseKind::MySql),
            TypeCategory::Temporal
        );
        assert_eq!(
            categorize_type("TIMETZ", DatabaseKind::Postgres),
            TypeCategory::Temporal
        );
    }

    #[test]
    fn test_timetz_fixed_text_form() {
        use chrono::{FixedOffset, NaiveTime};
        use sqlx::postgres::types::PgTimeTz;

        let v = PgTimeTz {
            time: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
            offset: FixedOffset::east_opt(2 * 3600).unwrap(),
        };
        assert_eq!(postgres::format_timetz(&v), "12:30:00+02:00");

        let v = PgTimeTz {
            time: NaiveTime::from_hms_micro_opt(7, 8, 9, 123_456).unwrap(),
            offset: FixedOffset::west_opt(5 * 3600 + 1800).unwrap(),
        };
        assert_eq!(postgres::format_timetz(&v), "07:08:09.123456-05:30");
    }

    #[test]
    fn test_categorize_json_uuid_binary() {
        assert_eq!(
            categorize_type("jsonb", DatabaseKind::Postgres),
            TypeCategory::Json
        );
        assert_eq!(
            categorize_type("uuid", DatabaseKind::Postgres),
            TypeCategory::Uuid
        );
        assert_eq!(
            categorize_type("BYTEA", DatabaseKind::Postgres),
            TypeCategory::Binary
        );
        assert_eq!(
            categorize_type("BLOB", DatabaseKind::Sqlite),
            TypeCategory::Binary
        );
    }

    #[test]
    fn test_categorize_fallback_is_text() {
        assert_eq!(
            categorize_type("VARCHAR", DatabaseKind::MySql),
            TypeCategory::Unknown
        );
        assert_eq!(
            categorize_type("some_enum", DatabaseKind::Postgres),
            TypeCategory::Unknown
        );
    }

    #[test]
    fn test_encode_binary_base64() {
        assert_eq!(
            encode_binary(b"hello world"),
            CellValue::Text("aGVsbG8gd29ybGQ=".to_string())
        );
        assert_eq!(encode_binary(&[]), CellValue::Text(String::new()));
    }
}
