//! Record Store
//!
//! A single CSV file with one header row. The header is the union of every
//! section label ever ingested; the first column holds the plant name.
//!
//! The file is read in full on every query and rewritten in full on every
//! update. Polars does the CSV parsing and writing; everything is read as
//! strings and converted into a sparse [`PlantTable`].

pub mod labels;
pub mod record;
pub mod table;

pub use labels::{normalize_label, normalize_name};
pub use record::PlantRecord;
pub use table::PlantTable;

use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tempfile::NamedTempFile;

use crate::error::{PlantError, Result};

/// Header label of the plant-name column.
pub const NAME_COLUMN: &str = "Flower Name";

/// Handle on the store file. Cheap to clone; holds no open file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists yet.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the whole table. A missing or empty file is an empty table.
    ///
    /// The file is read into memory before parsing so a concurrent `save`
    /// never pulls bytes out from under the parser.
    pub fn load(&self) -> Result<PlantTable> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PlantTable::new()),
            Err(e) => return Err(PlantError::store_io(&self.path, e)),
        };
        if bytes.is_empty() {
            return Ok(PlantTable::new());
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0)) // every column as String
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        let table = table_from_frame(&df)?;
        tracing::debug!(
            path = %self.path.display(),
            rows = table.len(),
            columns = table.columns().len(),
            "loaded plant store"
        );
        Ok(table)
    }

    /// Replace the file with `table`.
    ///
    /// Written to a sibling temp file and renamed over the store, so readers
    /// see either the old file or the new one, never a truncated one.
    pub fn save(&self, table: &PlantTable) -> Result<()> {
        let mut df = frame_from_table(table)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PlantError::store_io(dir, e))?;
        CsvWriter::new(tmp.as_file_mut())
            .include_header(true)
            .finish(&mut df)?;
        tmp.persist(&self.path)
            .map_err(|e| PlantError::store_io(&self.path, e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            rows = table.len(),
            columns = table.columns().len(),
            "wrote plant store"
        );
        Ok(())
    }
}

/// Empty strings and nulls both count as missing cells.
fn table_from_frame(df: &DataFrame) -> Result<PlantTable> {
    let mut table = PlantTable::new();
    for column in df.get_columns() {
        table.push_column(column.name().as_str());
    }

    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        columns.push((column.name().to_string(), column.cast(&DataType::String)?));
    }

    for idx in 0..df.height() {
        let mut cells = Vec::with_capacity(columns.len());
        for (label, values) in &columns {
            if let Some(value) = values.str()?.get(idx) {
                if !value.is_empty() {
                    cells.push((label.as_str(), value));
                }
            }
        }
        table.push_row(cells);
    }

    Ok(table)
}

fn frame_from_table(table: &PlantTable) -> Result<DataFrame> {
    let columns: Vec<Column> = table
        .columns()
        .iter()
        .map(|label| {
            let values: Vec<Option<String>> = (0..table.len())
                .map(|row| table.value(row, label).map(str::to_string))
                .collect();
            Column::new(label.as_str().into(), values)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}
