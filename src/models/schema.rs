//! Schema catalog models.

use serde_json::{Value as JsonValue, json};

/// One column of one base table, as scanned from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub schema: String,
    pub name: String,
    pub type_name: String,
}

impl ColumnDescriptor {
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Render as the `{schema, name, type}` object the catalog output uses.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "schema": self.schema,
            "name": self.name,
            "type": self.type_name,
        })
    }
}

/// Mapping from table name to its ordered column descriptors.
///
/// Insertion order is catalog scan order; the map key is the bare table
/// name, so same-named tables in different schemas merge under one key
/// (each entry still carries its own `schema` field). That matches the
/// legacy catalog-folding behavior.
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    tables: serde_json::Map<String, JsonValue>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column to its table, creating the table's array on first
    /// encounter.
    pub fn push(&mut self, table: &str, column: &ColumnDescriptor) {
        let entry = self
            .tables
            .entry(table.to_string())
            .or_insert_with(|| JsonValue::Array(Vec::new()));
        if let JsonValue::Array(columns) = entry {
            columns.push(column.to_json());
        }
    }

    /// Number of distinct table keys.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// The catalog as a JSON object (table name -> column array).
    pub fn into_json(self) -> JsonValue {
        JsonValue::Object(self.tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_json_shape() {
        let col = ColumnDescriptor::new("public", "id", "integer");
        assert_eq!(
            col.to_json().to_string(),
            r#"{"schema":"public","name":"id","type":"integer"}"#
        );
    }

    #[test]
    fn test_push_creates_table_on_first_encounter() {
        let mut catalog = SchemaCatalog::new();
        assert!(catalog.is_empty());

        catalog.push("users", &ColumnDescriptor::new("public", "id", "integer"));
        catalog.push("users", &ColumnDescriptor::new("public", "name", "text"));
        catalog.push("orders", &ColumnDescriptor::new("public", "id", "integer"));

        assert_eq!(catalog.table_count(), 2);
        let json = catalog.into_json();
        assert_eq!(json["users"].as_array().unwrap().len(), 2);
        assert_eq!(json["orders"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut catalog = SchemaCatalog::new();
        catalog.push("zebra", &ColumnDescriptor::new("main", "a", "text"));
        catalog.push("apple", &ColumnDescriptor::new("main", "b", "text"));

        // Scan order, not alphabetical
        let json = catalog.into_json().to_string();
        assert!(json.find("zebra").unwrap() < json.find("apple").unwrap());
    }

    #[test]
    fn test_same_named_tables_merge_across_schemas() {
        let mut catalog = SchemaCatalog::new();
        catalog.push("t", &ColumnDescriptor::new("alpha", "id", "integer"));
        catalog.push("t", &ColumnDescriptor::new("beta", "id", "integer"));

        assert_eq!(catalog.table_count(), 1);
        let json = catalog.into_json();
        let columns = json["t"].as_array().unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0]["schema"], "alpha");
        assert_eq!(columns[1]["schema"], "beta");
    }
}
