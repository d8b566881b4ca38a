use crate::error::{SmeltError, TableWriteError};
use crate::schema::{Schema, Table};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A table file that was written
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenTable {
    pub table: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Outcome of writing a schema; a failed table does not stop the others
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<WrittenTable>,
    pub failed: Vec<TableWriteError>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// The written tables, or the first failure
    pub fn into_result(mut self) -> Result<Vec<WrittenTable>, SmeltError> {
        if self.failed.is_empty() {
            Ok(self.written)
        } else {
            Err(SmeltError::TableWrite(self.failed.remove(0)))
        }
    }
}

/// Writes each table of a schema to `<dir>/<table>.csv`
pub struct TableWriter {
    dir: PathBuf,
}

impl TableWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        TableWriter {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, table: &Table) -> PathBuf {
        self.dir.join(format!("{}.csv", table.name()))
    }

    /// Write every table in schema order, truncating existing files
    pub fn write(&self, schema: &Schema) -> WriteReport {
        let mut report = WriteReport::default();

        for table in schema.tables() {
            let path = self.path_for(table);
            match Self::write_file(table, &path) {
                Ok(()) => {
                    info!(
                        table = table.name(),
                        rows = table.rows().len(),
                        path = %path.display(),
                        "wrote table"
                    );
                    report.written.push(WrittenTable {
                        table: table.name().to_string(),
                        path,
                        rows: table.rows().len(),
                    });
                }
                Err(source) => {
                    let err = TableWriteError {
                        table: table.name().to_string(),
                        path,
                        source,
                    };
                    warn!(error = %err, "table not written");
                    report.failed.push(err);
                }
            }
        }

        report
    }

    fn write_file(table: &Table, path: &Path) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        write_table(table, &mut out)?;
        out.flush()
    }
}

/// Serialize one table: a header line, then one line per row.
///
/// Rows shorter than the column list are padded with empty fields.
pub fn write_table<W: Write>(table: &Table, out: &mut W) -> std::io::Result<()> {
    let header: Vec<Cow<str>> = table
        .columns()
        .iter()
        .map(|c| escape_cell(&c.name))
        .collect();
    writeln!(out, "{}", header.join(","))?;

    for row in table.rows() {
        let cells: Vec<Cow<str>> = (0..table.columns().len())
            .map(|i| escape_cell(row.cell(i)))
            .collect();
        writeln!(out, "{}", cells.join(","))?;
    }

    Ok(())
}

/// Quote a cell containing a comma, double quote or newline.
///
/// Embedded quotes are not doubled.
pub fn escape_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", cell))
    } else {
        Cow::Borrowed(cell)
    }
}

/// Write a schema into `dir` with a [`TableWriter`]
pub fn write<P: AsRef<Path>>(schema: &Schema, dir: P) -> WriteReport {
    TableWriter::new(dir).write(schema)
}
