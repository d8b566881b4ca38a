//! Row population: the second walk over the document.
//!
//! Runs against a finished schema. Columns are resolved by name, so a
//! sub-tree whose table or column is missing is skipped rather than
//! misaligned.

use crate::schema::{
    foreign_key_of, table_name_of, Row, Schema, ID_COLUMN, INDEX_COLUMN, VALUE_COLUMN,
};
use crate::tree::Value;
use crate::types::{IdScope, SmeltConfig};
use tracing::{debug, info, warn};

/// Fills a schema's tables with rows taken from a document
pub struct RowPopulator {
    config: SmeltConfig,
    id_counter: u64,
}

impl RowPopulator {
    pub fn new(config: SmeltConfig) -> Self {
        RowPopulator {
            config,
            id_counter: 0,
        }
    }

    /// Append one row per visited object and per array element.
    ///
    /// `schema` must come from inferring the same document with the same
    /// configuration.
    pub fn populate(&mut self, root: &Value, schema: &mut Schema) {
        self.id_counter = 0;

        let Value::Object(pairs) = root else {
            warn!("document root is not an object, nothing to populate");
            return;
        };

        let root_context = self.config.root_table.clone();
        let Some(root_id) = self.mint_id(schema, &table_name_of(&root_context)) else {
            debug!(table = %root_context, "no root table in schema");
            return;
        };
        self.visit_object(pairs, schema, &root_context, None, root_id, 0);

        let rows: usize = schema.tables().iter().map(|t| t.rows().len()).sum();
        info!(tables = schema.len(), rows, "populated schema");
    }

    /// Next id for a row of `table_name`, or `None` when the table is unknown
    fn mint_id(&mut self, schema: &mut Schema, table_name: &str) -> Option<u64> {
        let table = schema.table_mut(table_name)?;
        match self.config.id_scope {
            IdScope::PerTable => Some(table.next_row_id()),
            IdScope::Global => {
                self.id_counter += 1;
                Some(self.id_counter)
            }
        }
    }

    fn visit_object(
        &mut self,
        pairs: &[(String, Value)],
        schema: &mut Schema,
        context: &str,
        parent: Option<(&str, u64)>,
        assigned_id: u64,
        depth: usize,
    ) {
        let table_name = table_name_of(context);
        let Some(table) = schema.table(&table_name) else {
            debug!(table = %table_name, "no table for object, skipped");
            return;
        };

        let mut row = table.blank_row();
        fill(schema, &table_name, &mut row, ID_COLUMN, assigned_id.to_string());
        if let Some((parent_table, parent_id)) = parent {
            let parent_key = foreign_key_of(parent_table);
            fill(schema, &table_name, &mut row, &parent_key, parent_id.to_string());
        }

        for (key, value) in pairs {
            match value {
                Value::Object(child) => {
                    if depth >= self.config.max_depth {
                        continue;
                    }
                    let Some(child_id) = self.mint_id(schema, &table_name_of(key)) else {
                        debug!(table = %table_name, key = %key, "no table for nested object");
                        continue;
                    };
                    fill(schema, &table_name, &mut row, &foreign_key_of(key), child_id.to_string());
                    self.visit_object(
                        child,
                        schema,
                        key,
                        Some((table_name.as_str(), assigned_id)),
                        child_id,
                        depth + 1,
                    );
                }
                Value::Array(elements) => {
                    if depth >= self.config.max_depth {
                        continue;
                    }
                    self.visit_array(elements, schema, &table_name, assigned_id, key);
                }
                scalar => {
                    if let Some(text) = scalar.scalar_text() {
                        fill(schema, &table_name, &mut row, key, text);
                    }
                }
            }
        }

        if let Some(table) = schema.table_mut(&table_name) {
            table.push_row(row);
        }
    }

    /// One row per element. Containers inside elements are left empty.
    fn visit_array(
        &mut self,
        elements: &[Value],
        schema: &mut Schema,
        parent_table: &str,
        parent_id: u64,
        key: &str,
    ) {
        let array_table = table_name_of(key);
        let parent_key = foreign_key_of(parent_table);

        for (position, element) in elements.iter().enumerate() {
            let id = match self.config.id_scope {
                IdScope::PerTable => self.mint_id(schema, &array_table),
                IdScope::Global => schema.table(&array_table).map(|_| position as u64 + 1),
            };
            let Some(id) = id else {
                debug!(table = %array_table, "no table for array, skipped");
                return;
            };

            let Some(table) = schema.table_mut(&array_table) else {
                return;
            };
            let mut row = table.blank_row();
            let mut set = |column: &str, text: String| {
                if let Some(index) = table.column_index(column) {
                    row.set(index, text);
                }
            };

            set(ID_COLUMN, id.to_string());
            set(parent_key.as_str(), parent_id.to_string());
            match element {
                Value::Object(fields) => {
                    for (field, value) in fields {
                        if let Some(text) = value.scalar_text() {
                            set(field.as_str(), text);
                        }
                    }
                }
                other => {
                    set(INDEX_COLUMN, position.to_string());
                    if let Some(text) = other.scalar_text() {
                        set(VALUE_COLUMN, text);
                    }
                }
            }

            table.push_row(row);
        }
    }
}

/// Set `column` of `row` if `table_name` has such a column
fn fill(schema: &Schema, table_name: &str, row: &mut Row, column: &str, text: String) {
    let index = schema
        .table(table_name)
        .and_then(|table| table.column_index(column));
    if let Some(index) = index {
        row.set(index, text);
    }
}

/// Populate a schema with the default configuration
pub fn populate(root: &Value, schema: &mut Schema) {
    RowPopulator::new(SmeltConfig::default()).populate(root, schema);
}
