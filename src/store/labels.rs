//! Label and name normalization rules
//!
//! Two unrelated normalizations live here:
//! - plant names: trim + lowercase, used for lookup equality
//! - column labels: quote / `*` / whitespace stripping, used when merging a
//!   new record into an existing store

/// Canonical form of a plant name used as the lookup key.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalize a column label before merging: strip surrounding `"`, then
/// surrounding `*`, then surrounding whitespace.
///
/// `"**Bloom Time**"` and `Bloom Time` both become `Bloom Time`.
pub fn normalize_label(label: &str) -> String {
    label.trim_matches('"').trim_matches('*').trim().to_string()
}

/// Inner label of a starred column (`**X**` -> `X`).
///
/// Returns None when the label is not wrapped in `**` on both ends or when
/// nothing is left inside the markers.
pub fn starred_inner(label: &str) -> Option<&str> {
    let inner = label.strip_prefix("**")?.strip_suffix("**")?;
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

/// Label of a starred column with only its trailing `**` removed.
///
/// `**Height**` -> `**Height`. This is the counterpart the cleanup pass looks
/// for first; see [`super::PlantTable::merge_starred_columns`].
pub fn trailing_unstarred(label: &str) -> &str {
    label.strip_suffix("**").unwrap_or(label)
}
