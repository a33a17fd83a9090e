//! Career timeline: content table, markup order and progress selection.

pub mod controller;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use controller::{DisplayController, DisplayField, DisplaySink, FieldStyle, Phase};

/// One career period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub year: String,
    pub role: String,
    pub company: String,
    pub description: String,
}

impl TimelineEntry {
    pub fn new(year: &str, role: &str, company: &str, description: &str) -> Self {
        Self {
            year: year.to_string(),
            role: role.to_string(),
            company: company.to_string(),
            description: description.to_string(),
        }
    }

    /// Text for one display field.
    pub fn field(&self, field: DisplayField) -> &str {
        match field {
            DisplayField::Year => &self.year,
            DisplayField::Role => &self.role,
            DisplayField::Company => &self.company,
            DisplayField::Description => &self.description,
        }
    }
}

/// Read-only year → entry lookup, filled once at startup.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    entries: HashMap<String, TimelineEntry>,
}

impl ContentStore {
    /// Later entries with a duplicate year replace earlier ones.
    pub fn new(entries: impl IntoIterator<Item = TimelineEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.year.clone(), e)).collect(),
        }
    }

    pub fn get(&self, year: &str) -> Option<&TimelineEntry> {
        self.entries.get(year)
    }

    pub fn contains(&self, year: &str) -> bool {
        self.entries.contains_key(year)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Year keys in display (markup) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSet {
    years: Vec<String>,
}

impl IndexSet {
    pub fn new<S: Into<String>>(years: impl IntoIterator<Item = S>) -> Self {
        Self { years: years.into_iter().map(Into::into).collect() }
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn year(&self, index: usize) -> Option<&str> {
        self.years.get(index).map(String::as_str)
    }

    /// Year shown at a given scroll progress.
    pub fn year_at(&self, progress: f64) -> Option<&str> {
        select_index(progress, self.len()).and_then(|i| self.year(i))
    }
}

/// Map scroll progress to an entry index.
///
/// Progress is clamped to [0, 1] (NaN counts as 0). The `min` keeps
/// `progress == 1.0` on the last entry instead of one past it. Returns
/// `None` when there are no entries.
pub fn select_index(progress: f64, entry_count: usize) -> Option<usize> {
    if entry_count == 0 {
        return None;
    }
    let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    let raw = (p * entry_count as f64).floor() as usize;
    Some(raw.min(entry_count - 1))
}
