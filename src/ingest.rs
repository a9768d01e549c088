//! Response Ingestor
//!
//! Parses free-form model output into one plant record, appends it to the
//! store, runs the starred-column cleanup and hands the file to the sync
//! publisher.
//!
//! Line format: `"Label": "detail text"`. Anything without a `": "`
//! separator is skipped. Only the first separator splits, so values may
//! contain `": "` themselves.

use std::sync::Arc;

use crate::error::Result;
use crate::store::{PlantRecord, PlantTable, RecordStore};
use crate::sync::Publisher;

/// Outcome of one ingestion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Key/value lines parsed.
    pub parsed: usize,
    /// Lines skipped for lacking a `": "` separator.
    pub skipped: usize,
    /// Whether the store was written.
    pub stored: bool,
}

/// Parsed response before it touches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub record: PlantRecord,
    pub parsed: usize,
    pub skipped: usize,
}

/// Section key normalization.
///
/// Strip surrounding `"` characters. When that leaves nothing, or leaves the
/// key unchanged, strip surrounding `*` characters from the raw key instead.
/// The two rules never combine: `"**Height**"` keeps its stars.
pub fn normalize_section_key(raw_key: &str) -> &str {
    let unquoted = raw_key.trim_matches('"');
    if unquoted.is_empty() || unquoted == raw_key {
        raw_key.trim_matches('*')
    } else {
        unquoted
    }
}

/// Values only lose surrounding `"` characters.
pub fn normalize_section_value(raw_value: &str) -> &str {
    raw_value.trim_matches('"')
}

/// Parse `raw_text` into a record keyed by `name`.
pub fn parse_response(name: &str, raw_text: &str) -> ParsedResponse {
    let mut record = PlantRecord::new(name);
    let mut parsed = 0;
    let mut skipped = 0;

    for line in raw_text.trim().lines() {
        let Some((raw_key, raw_value)) = line.split_once(": ") else {
            tracing::debug!(line = %line, "skipping line without key/value separator");
            skipped += 1;
            continue;
        };

        record.set(
            normalize_section_key(raw_key),
            normalize_section_value(raw_value),
        );
        parsed += 1;
    }

    ParsedResponse {
        record,
        parsed,
        skipped,
    }
}

pub struct ResponseIngestor {
    store: RecordStore,
    publisher: Arc<dyn Publisher>,
}

impl ResponseIngestor {
    pub fn new(store: RecordStore, publisher: Arc<dyn Publisher>) -> Self {
        Self { store, publisher }
    }

    /// Parse `raw_text` and append it to the store as a new row for `name`.
    ///
    /// Nothing parsed leaves the store untouched. Otherwise the file is
    /// rewritten, cleaned up and published; a publish failure is returned
    /// after the file has already been written.
    pub fn ingest(&self, name: &str, raw_text: &str) -> Result<IngestReport> {
        let ParsedResponse {
            record,
            parsed,
            skipped,
        } = parse_response(name, raw_text);

        if parsed == 0 {
            tracing::warn!(plant = %record.name, skipped, "no key/value pairs in response, store unchanged");
            return Ok(IngestReport {
                parsed,
                skipped,
                stored: false,
            });
        }

        let table = if self.store.exists() {
            let mut table = self.store.load()?;
            table.append_normalized(&record);
            table
        } else {
            PlantTable::from_record(&record)
        };
        self.store.save(&table)?;

        tracing::info!(
            plant = %record.name,
            sections = record.section_count(),
            skipped,
            rows = table.len(),
            "stored generated plant profile"
        );

        self.normalize_columns()?;

        Ok(IngestReport {
            parsed,
            skipped,
            stored: true,
        })
    }

    /// Starred-column cleanup on the freshly written file, then publish.
    fn normalize_columns(&self) -> Result<()> {
        let mut table = self.store.load()?;
        let merged = table.merge_starred_columns();
        self.store.save(&table)?;
        if merged > 0 {
            tracing::debug!(merged, "merged starred columns");
        }

        self.publisher.publish(self.store.path())
    }
}
