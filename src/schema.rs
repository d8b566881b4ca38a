//! Relational schema produced by inference and filled by population.
//!
//! Tables and columns are only ever appended. Everything that crosses
//! from one pass to the other is looked up by name.

use crate::tree::Value;
use std::fmt;

/// Name of the primary key column every table starts with
pub const ID_COLUMN: &str = "id";

/// Position column of scalar array tables
pub const INDEX_COLUMN: &str = "index";

/// Element column of scalar array tables
pub const VALUE_COLUMN: &str = "value";

/// Sanitize a key into a table identifier.
///
/// ASCII alphanumerics are lowercased, spaces and underscores become
/// underscores, everything else is dropped. A key made only of dropped
/// characters sanitizes to the empty string.
pub fn table_name_of(s: &str) -> String {
    s.chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c == ' ' || c == '_' {
                Some('_')
            } else {
                None
            }
        })
        .collect()
}

/// Foreign key column name for a (possibly unsanitized) stem
pub fn foreign_key_of(stem: &str) -> String {
    format!("{}_id", table_name_of(stem))
}

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Real,
    Integer,
}

impl ColumnType {
    /// Type implied by a value: numbers are REAL, booleans INTEGER, the rest TEXT
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Number(_) => ColumnType::Real,
            Value::Boolean(_) => ColumnType::Integer,
            _ => ColumnType::Text,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Real => "REAL",
            ColumnType::Integer => "INTEGER",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// One row; cells line up with the owning table's columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    /// A row of `width` empty cells
    pub fn blank(width: usize) -> Self {
        Row {
            cells: vec![String::new(); width],
        }
    }

    /// Cell at `index`, empty when the row is short
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, index: usize, text: impl Into<String>) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = text.into();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
    row_counter: u64,
}

impl Table {
    /// Create a table whose first column is the INTEGER `id`
    pub fn new(name: impl Into<String>) -> Self {
        let mut table = Table {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            row_counter: 0,
        };
        table.add_column(ID_COLUMN, ColumnType::Integer);
        table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Add a column unless one with that name exists. The first
    /// declaration keeps its type. Returns whether a column was added.
    pub fn add_column(&mut self, name: &str, column_type: ColumnType) -> bool {
        if self.column_index(name).is_some() {
            return false;
        }
        self.columns.push(Column {
            name: name.to_string(),
            column_type,
        });
        true
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// A blank row sized to the current column list
    pub fn blank_row(&self) -> Row {
        Row::blank(self.columns.len())
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Mint the next id from this table's counter
    pub fn next_row_id(&mut self) -> u64 {
        self.row_counter += 1;
        self.row_counter
    }
}

/// Ordered collection of tables, in first-encountered order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Case-sensitive exact lookup
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    /// Look a table up by name, appending a fresh one if absent
    pub fn table_or_create(&mut self, name: &str) -> &mut Table {
        let index = match self.tables.iter().position(|t| t.name == name) {
            Some(index) => index,
            None => {
                tracing::debug!(table = name, "created table");
                self.tables.push(Table::new(name));
                self.tables.len() - 1
            }
        };
        &mut self.tables[index]
    }
}
