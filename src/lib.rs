//! # Smelt - JSON to relational tables
//!
//! Derives a normalized relational schema from the shape of a single JSON
//! document, fills it with the document's data and writes one CSV file
//! per table.
//!
//! ## Pipeline
//!
//! 1. **infer**: walk the document once and build the [`Schema`] (tables,
//!    typed columns, foreign keys)
//! 2. **populate**: walk it again and append rows, resolving every column
//!    by name against the finished schema
//! 3. **write**: serialize each table to `<dir>/<table>.csv`
//!
//! ## Quick Start
//!
//! ```rust
//! use smelt::{SchemaInferencer, RowPopulator, SmeltConfig, Value};
//!
//! let root: Value = serde_json::from_str(r#"{"name": "Ada", "tags": ["a", "b"]}"#).unwrap();
//!
//! let config = SmeltConfig::default();
//! let mut schema = SchemaInferencer::new(config.clone()).infer(&root);
//! RowPopulator::new(config).populate(&root, &mut schema);
//!
//! let tags = schema.table("tags").unwrap();
//! assert_eq!(tags.rows().len(), 2);
//! ```

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

pub mod error;
pub mod infer;
pub mod populate;
pub mod schema;
pub mod tree;
pub mod types;
pub mod writer;

pub use error::{SmeltError, TableWriteError};
pub use infer::{infer, SchemaInferencer};
pub use populate::{populate, RowPopulator};
pub use schema::{table_name_of, Column, ColumnType, Row, Schema, Table};
pub use tree::Value;
pub use types::{IdScope, SmeltConfig};
pub use writer::{write, TableWriter, WriteReport, WrittenTable};

/// Parse a whole JSON document into a [`Value`]
pub fn parse_document<R: Read>(reader: R) -> error::Result<Value> {
    let value = serde_json::from_reader(reader)?;
    Ok(value)
}

/// Create the output directory if it does not exist
pub fn ensure_output_dir<P: AsRef<Path>>(dir: P) -> error::Result<()> {
    std::fs::create_dir_all(dir.as_ref()).map_err(|source| SmeltError::Io {
        path: dir.as_ref().to_path_buf(),
        source,
    })
}

/// Run infer, populate and write over an already-parsed document
pub fn smelt<P: AsRef<Path>>(root: &Value, dir: P, config: SmeltConfig) -> WriteReport {
    let mut schema = SchemaInferencer::new(config.clone()).infer(root);
    RowPopulator::new(config).populate(root, &mut schema);
    write(&schema, dir)
}

/// Main entry point: read one JSON document and write its tables into `dir`
pub fn smelt_json<R: Read, P: AsRef<Path>>(
    reader: R,
    dir: P,
    config: SmeltConfig,
) -> Result<WriteReport> {
    let root = parse_document(reader).context("Failed to parse JSON")?;
    Ok(smelt(&root, dir, config))
}
