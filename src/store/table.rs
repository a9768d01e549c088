//! Sparse in-memory plant table
//!
//! The header is the union of every label seen so far. Each row only holds
//! the cells it actually has, so a brand-new section label is just another
//! header entry rather than a schema change.

use rustc_hash::{FxHashMap, FxHashSet};

use super::labels::{normalize_label, normalize_name, starred_inner, trailing_unstarred};
use super::record::PlantRecord;
use super::NAME_COLUMN;

type Row = FxHashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl PlantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-row table holding exactly `record`.
    ///
    /// Labels are taken as-is. A section whose label repeats an earlier one
    /// (including the name column) is dropped.
    pub fn from_record(record: &PlantRecord) -> Self {
        let mut table = Self::default();
        table.push_row(record.cells());
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.columns.iter().any(|c| c == label)
    }

    /// Add a column to the header. Returns false if it already exists or the
    /// label is empty.
    pub fn push_column(&mut self, label: &str) -> bool {
        if label.is_empty() || self.has_column(label) {
            return false;
        }
        self.columns.push(label.to_string());
        true
    }

    /// Append a row. Unknown labels extend the header; when a label repeats
    /// within the row, the first value wins.
    pub fn push_row<'a>(&mut self, cells: impl IntoIterator<Item = (&'a str, &'a str)>) {
        let mut row = Row::default();
        for (label, value) in cells {
            if label.is_empty() || row.contains_key(label) {
                continue;
            }
            self.push_column(label);
            row.insert(label.to_string(), value.to_string());
        }
        self.rows.push(row);
    }

    /// Cell value, None when the row has no value for `label`.
    pub fn value(&self, row: usize, label: &str) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(label))
            .map(String::as_str)
    }

    /// Indices of every row whose name matches `name` after trim + lowercase
    /// on both sides.
    pub fn rows_named(&self, name: &str) -> Vec<usize> {
        let key = normalize_name(name);
        (0..self.rows.len())
            .filter(|&idx| {
                self.value(idx, NAME_COLUMN)
                    .map_or(false, |stored| normalize_name(stored) == key)
            })
            .collect()
    }

    /// Present cells of a row as a record (name column split out).
    pub fn record(&self, row: usize) -> PlantRecord {
        let mut record = PlantRecord {
            name: self.value(row, NAME_COLUMN).unwrap_or_default().to_string(),
            sections: Vec::new(),
        };
        for label in &self.columns {
            if label == NAME_COLUMN {
                continue;
            }
            if let Some(value) = self.value(row, label) {
                record.sections.push((label.clone(), value.to_string()));
            }
        }
        record
    }

    /// Append `record` as the last row after normalizing both the existing
    /// header and the record's labels with [`normalize_label`].
    ///
    /// After normalization a label that appears more than once keeps only its
    /// first column; the data of later columns with the same label is lost.
    /// New labels go to the end of the header.
    pub fn append_normalized(&mut self, record: &PlantRecord) {
        let mut seen = FxHashSet::default();
        let mut columns = Vec::with_capacity(self.columns.len());
        let mut renames = Vec::with_capacity(self.columns.len());

        for label in &self.columns {
            let normalized = normalize_label(label);
            if normalized.is_empty() || !seen.insert(normalized.clone()) {
                tracing::debug!(column = %label, normalized = %normalized, "dropping duplicate column");
                continue;
            }
            columns.push(normalized.clone());
            renames.push((label.clone(), normalized));
        }

        for row in &mut self.rows {
            let mut rebuilt = Row::default();
            for (old, new) in &renames {
                if let Some(value) = row.remove(old) {
                    rebuilt.insert(new.clone(), value);
                }
            }
            *row = rebuilt;
        }

        let mut row = Row::default();
        for (label, value) in record.cells() {
            let normalized = normalize_label(label);
            if normalized.is_empty() || row.contains_key(&normalized) {
                continue;
            }
            if seen.insert(normalized.clone()) {
                columns.push(normalized.clone());
            }
            row.insert(normalized, value.to_string());
        }

        self.columns = columns;
        self.rows.push(row);
    }

    /// Collapse every starred column (`**X**`) into its plain counterpart.
    ///
    /// The counterpart is the label with only the trailing `**` removed when
    /// that column exists, otherwise the fully unwrapped `X` (created in the
    /// starred column's place if missing). A present plain value always wins;
    /// the starred value only fills gaps. Returns the number of starred
    /// columns removed.
    pub fn merge_starred_columns(&mut self) -> usize {
        let pairs: Vec<(String, String)> = self
            .columns
            .iter()
            .filter_map(|label| {
                let inner = starred_inner(label)?;
                let trailing = trailing_unstarred(label);
                let plain = if self.has_column(trailing) { trailing } else { inner };
                Some((label.clone(), plain.to_string()))
            })
            .collect();

        // A starred column that is itself some other pair's target stays.
        let targets: FxHashSet<&str> = pairs.iter().map(|(_, plain)| plain.as_str()).collect();
        let pairs: Vec<&(String, String)> = pairs
            .iter()
            .filter(|(star, _)| !targets.contains(star.as_str()))
            .collect();

        if pairs.is_empty() {
            return 0;
        }

        for row in &mut self.rows {
            for (star, plain) in &pairs {
                let starred_value = row.remove(star.as_str());
                let plain_present = row.get(plain.as_str()).map_or(false, |v| !v.is_empty());
                if !plain_present {
                    if let Some(value) = starred_value.filter(|v| !v.is_empty()) {
                        row.insert(plain.clone(), value);
                    }
                }
            }
        }

        let mut columns = Vec::with_capacity(self.columns.len());
        for label in &self.columns {
            match pairs.iter().find(|(star, _)| star == label) {
                Some((_, plain)) => {
                    if !self.columns.contains(plain) && !columns.contains(plain) {
                        columns.push(plain.clone());
                    }
                }
                None => columns.push(label.clone()),
            }
        }
        self.columns = columns;

        pairs.len()
    }
}
