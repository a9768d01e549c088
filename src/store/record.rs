//! One plant profile: the lookup key plus an open-ended list of sections.

use super::labels::normalize_name;
use super::NAME_COLUMN;

/// A single plant lookup result.
///
/// `sections` keeps insertion order so a profile renders in the order the
/// model produced it. The section set is not fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantRecord {
    pub name: String,
    pub sections: Vec<(String, String)>,
}

impl PlantRecord {
    /// New record keyed by the normalized form of `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_name(name),
            sections: Vec::new(),
        }
    }

    /// Set a section, overwriting an earlier value in place.
    pub fn set(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.sections.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = value,
            None => self.sections.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// All cells of this record as they would land in a store row:
    /// the name column first, then every section.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        std::iter::once((NAME_COLUMN, self.name.as_str()))
            .chain(self.sections.iter().map(|(l, v)| (l.as_str(), v.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_name() {
        let record = PlantRecord::new("  Marigold ");
        assert_eq!(record.name, "marigold");
        assert_eq!(record.section_count(), 0);
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut record = PlantRecord::new("rose");
        record.set("Family", "Rosaceae");
        record.set("Bloom Time", "Spring");
        record.set("Family", "Rosaceae (rose family)");

        assert_eq!(record.section_count(), 2);
        assert_eq!(record.sections[0].0, "Family");
        assert_eq!(record.get("Family"), Some("Rosaceae (rose family)"));
    }

    #[test]
    fn test_cells_lead_with_name_column() {
        let mut record = PlantRecord::new("rose");
        record.set("Family", "Rosaceae");

        let cells: Vec<_> = record.cells().collect();
        assert_eq!(cells, vec![(NAME_COLUMN, "rose"), ("Family", "Rosaceae")]);
    }
}
