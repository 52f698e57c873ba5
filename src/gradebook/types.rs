use serde::{Deserialize, Serialize};

use crate::grading::{aggregate, Aggregate, GradeEntry, Status};

pub const GRADEBOOK_VERSION: u32 = 1;

/// The ordered collection of grade entries, as persisted on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBook {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<GradeEntry>,
}

impl Default for GradeBook {
    fn default() -> Self {
        Self::new()
    }
}

impl GradeBook {
    /// Create an empty gradebook at the current version
    pub fn new() -> Self {
        Self {
            version: GRADEBOOK_VERSION,
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: Vec<GradeEntry>) -> Self {
        Self {
            version: GRADEBOOK_VERSION,
            entries,
        }
    }

    /// Append an entry, returning its index
    pub fn add(&mut self, entry: GradeEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Insert an entry at `index`, clamped to the end of the list
    pub fn insert(&mut self, index: usize, entry: GradeEntry) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
    }

    /// Remove the entry at `index` (0-based)
    /// Returns None if the index is out of bounds
    pub fn remove(&mut self, index: usize) -> Option<GradeEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Remove every entry, returning what was removed
    pub fn clear(&mut self) -> Vec<GradeEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Replace all entries (used to undo a clear)
    pub fn restore(&mut self, entries: Vec<GradeEntry>) {
        self.entries = entries;
    }

    pub fn entries(&self) -> &[GradeEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&GradeEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recompute the aggregate over every entry
    pub fn summary(&self) -> Aggregate {
        aggregate(&self.entries)
    }

    /// Each entry with its subject average and status, in insertion order
    pub fn scored(&self) -> Vec<(&GradeEntry, f64, Status)> {
        self.entries
            .iter()
            .map(|entry| (entry, entry.average(), entry.status()))
            .collect()
    }

    /// Sum of the coefficients that count towards the general average
    pub fn total_coefficient(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.coefficient)
            .filter(|c| c.is_finite() && *c >= 0.0)
            .sum()
    }
}
