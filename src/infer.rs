//! Schema inference: the first walk over the document.
//!
//! Every object becomes (or extends) a table named after the key it sits
//! under. Nested objects add a `<key>_id` column to the enclosing table,
//! arrays become their own table pointing back at the enclosing one.

use crate::schema::{
    foreign_key_of, table_name_of, ColumnType, Schema, INDEX_COLUMN, VALUE_COLUMN,
};
use crate::tree::Value;
use crate::types::SmeltConfig;
use tracing::{debug, info, warn};

/// Derives a schema from the shape of a document
pub struct SchemaInferencer {
    config: SmeltConfig,
}

impl SchemaInferencer {
    pub fn new(config: SmeltConfig) -> Self {
        SchemaInferencer { config }
    }

    /// Walk the document once and return its schema.
    ///
    /// A root that is not an object yields an empty schema.
    pub fn infer(&self, root: &Value) -> Schema {
        let mut schema = Schema::new();

        match root {
            Value::Object(pairs) => {
                self.visit_object(pairs, &mut schema, &self.config.root_table, 0);
            }
            _ => {
                warn!("document root is not an object, nothing to infer");
            }
        }

        info!(tables = schema.len(), "inferred schema");
        schema
    }

    fn visit_object(
        &self,
        pairs: &[(String, Value)],
        schema: &mut Schema,
        context: &str,
        depth: usize,
    ) {
        let table_name = table_name_of(context);
        schema.table_or_create(&table_name);

        for (key, value) in pairs {
            match value {
                Value::Object(child) => {
                    if depth >= self.config.max_depth {
                        debug!(table = %table_name, key = %key, "object below max depth skipped");
                        continue;
                    }
                    schema
                        .table_or_create(&table_name)
                        .add_column(&foreign_key_of(key), ColumnType::Integer);
                    self.visit_object(child, schema, key, depth + 1);
                }
                Value::Array(elements) => {
                    if depth >= self.config.max_depth {
                        debug!(table = %table_name, key = %key, "array below max depth skipped");
                        continue;
                    }
                    Self::visit_array(elements, schema, &table_name, key);
                }
                scalar => {
                    schema
                        .table_or_create(&table_name)
                        .add_column(key, ColumnType::of(scalar));
                }
            }
        }
    }

    /// Arrays are inspected one level deep, and only their first element
    /// contributes columns.
    fn visit_array(elements: &[Value], schema: &mut Schema, parent_table: &str, key: &str) {
        let array_table = schema.table_or_create(&table_name_of(key));
        array_table.add_column(&foreign_key_of(parent_table), ColumnType::Integer);

        match elements.first() {
            Some(Value::Object(fields)) => {
                for (field, value) in fields {
                    array_table.add_column(field, ColumnType::of(value));
                }
            }
            Some(element) => {
                array_table.add_column(INDEX_COLUMN, ColumnType::Integer);
                array_table.add_column(VALUE_COLUMN, ColumnType::of(element));
            }
            None => {}
        }
    }
}

/// Infer a schema with the default configuration
pub fn infer(root: &Value) -> Schema {
    SchemaInferencer::new(SmeltConfig::default()).infer(root)
}
