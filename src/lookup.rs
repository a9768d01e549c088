//! Lookup Service
//!
//! Read-only queries against the record store. Every call re-reads the file;
//! nothing is cached between calls.

use crate::error::Result;
use crate::store::{PlantRecord, PlantTable, RecordStore};

#[derive(Debug, Clone)]
pub struct LookupService {
    store: RecordStore,
}

impl LookupService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// True iff at least one stored record matches `name` (trim + lowercase).
    pub fn exists(&self, name: &str) -> Result<bool> {
        let table = self.store.load()?;
        Ok(!table.rows_named(name).is_empty())
    }

    /// Every matching record rendered as `label: value` lines, one line per
    /// header column, matches separated by a blank line.
    ///
    /// A miss yields an empty string, not an error.
    pub fn fetch(&self, name: &str) -> Result<String> {
        let table = self.store.load()?;
        let rows = table.rows_named(name);
        Ok(render_rows(&table, &rows))
    }

    /// Matching records with their present cells only.
    pub fn fetch_records(&self, name: &str) -> Result<Vec<PlantRecord>> {
        let table = self.store.load()?;
        Ok(table
            .rows_named(name)
            .into_iter()
            .map(|row| table.record(row))
            .collect())
    }
}

/// Render `rows` of `table`; missing cells render with an empty value.
pub fn render_rows(table: &PlantTable, rows: &[usize]) -> String {
    rows.iter()
        .map(|&row| {
            table
                .columns()
                .iter()
                .map(|label| format!("{}: {}", label, table.value(row, label).unwrap_or("")))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NAME_COLUMN;

    fn seeded_store(dir: &tempfile::TempDir) -> RecordStore {
        let store = RecordStore::new(dir.path().join("output.csv"));
        let mut table = PlantTable::new();
        table.push_row([(NAME_COLUMN, "rose"), ("Family", "Rosaceae")]);
        table.push_row([(NAME_COLUMN, "lily"), ("Bloom Time", "Summer")]);
        store.save(&table).unwrap();
        store
    }

    #[test]
    fn test_exists_ignores_case_and_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = LookupService::new(seeded_store(&dir));

        assert!(lookup.exists("rose").unwrap());
        assert!(lookup.exists("  Rose ").unwrap());
        assert!(lookup.exists("LILY").unwrap());
        assert!(!lookup.exists("daisy").unwrap());
    }

    #[test]
    fn test_exists_without_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = LookupService::new(RecordStore::new(dir.path().join("missing.csv")));

        assert!(!lookup.exists("rose").unwrap());
        assert_eq!(lookup.fetch("rose").unwrap(), "");
    }

    #[test]
    fn test_fetch_renders_every_column() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = LookupService::new(seeded_store(&dir));

        let text = lookup.fetch("Rose").unwrap();
        assert_eq!(text, "Flower Name: rose\nFamily: Rosaceae\nBloom Time: ");
    }

    #[test]
    fn test_fetch_miss_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = LookupService::new(seeded_store(&dir));

        assert_eq!(lookup.fetch("daisy").unwrap(), "");
        assert!(lookup.fetch_records("daisy").unwrap().is_empty());
    }

    #[test]
    fn test_fetch_sees_writes_between_calls() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let lookup = LookupService::new(store.clone());
        assert!(!lookup.exists("daisy").unwrap());

        let mut table = store.load().unwrap();
        table.push_row([(NAME_COLUMN, "daisy")]);
        store.save(&table).unwrap();

        assert!(lookup.exists("daisy").unwrap());
    }

    #[test]
    fn test_render_rows_separates_matches_with_blank_line() {
        let mut table = PlantTable::new();
        table.push_row([(NAME_COLUMN, "rose"), ("Family", "Rosaceae")]);
        table.push_row([(NAME_COLUMN, "rose"), ("Family", "Rosa")]);

        let text = render_rows(&table, &[0, 1]);
        assert_eq!(
            text,
            "Flower Name: rose\nFamily: Rosaceae\n\nFlower Name: rose\nFamily: Rosa"
        );
    }
}
