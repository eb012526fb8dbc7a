//! Schedule map: the sparse assignment state of the week.
//!
//! Maps a structured [`SlotKey`] (day, teaching period, section) to an
//! assignment code. Writing to a key replaces its value, so a cell
//! never holds more than one code. This layer performs no validation;
//! legality is decided by the candidate resolver before a write.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Day, Section};

/// Composite cell key. Orders by day, then period, then section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub day: Day,
    /// Teaching period number.
    pub period: u8,
    pub section: Section,
}

impl SlotKey {
    /// Creates a key.
    pub fn new(day: Day, period: u8, section: Section) -> Self {
        Self {
            day,
            period,
            section,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} period {} / {}", self.day, self.period, self.section)
    }
}

/// One occupied cell, the serialised form of the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(flatten)]
    pub key: SlotKey,
    pub code: String,
}

/// Current assignment state.
///
/// Every effective [`set`](Self::set) bumps the generation counter so
/// derived views can tell whether they were computed from this state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ScheduleEntry>", into = "Vec<ScheduleEntry>")]
pub struct ScheduleMap {
    cells: BTreeMap<SlotKey, String>,
    generation: u64,
}

impl ScheduleMap {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Code in a cell, if occupied.
    pub fn get(&self, key: &SlotKey) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }

    /// Writes a cell. `None` clears it. Returns the previous code.
    ///
    /// The only mutator of the engine's state.
    pub fn set(&mut self, key: SlotKey, code: Option<String>) -> Option<String> {
        let previous = match code {
            Some(code) => self.cells.insert(key, code),
            None => self.cells.remove(&key),
        };
        self.generation += 1;
        previous
    }

    /// Assigns a code to a cell. Shorthand for `set(key, Some(code))`.
    pub fn assign(&mut self, key: SlotKey, code: impl Into<String>) -> Option<String> {
        self.set(key, Some(code.into()))
    }

    /// Clears a cell. Shorthand for `set(key, None)`.
    pub fn clear(&mut self, key: &SlotKey) -> Option<String> {
        self.set(key.clone(), None)
    }

    /// Generation counter; increases on every write.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All occupied cells in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &str)> {
        self.cells.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Occupied cells on one day, in (period, section) order.
    pub fn cells_on(&self, day: Day) -> impl Iterator<Item = (&SlotKey, &str)> {
        self.iter().filter(move |(k, _)| k.day == day)
    }

    /// Occupied cells of one section on one day, in period order.
    pub fn section_day<'a>(
        &'a self,
        day: Day,
        section: &'a Section,
    ) -> impl Iterator<Item = (&'a SlotKey, &'a str)> + 'a {
        self.cells_on(day).filter(move |(k, _)| &k.section == section)
    }
}

impl From<Vec<ScheduleEntry>> for ScheduleMap {
    /// Later entries for the same key win.
    fn from(entries: Vec<ScheduleEntry>) -> Self {
        Self {
            cells: entries.into_iter().map(|e| (e.key, e.code)).collect(),
            generation: 0,
        }
    }
}

impl From<ScheduleMap> for Vec<ScheduleEntry> {
    fn from(map: ScheduleMap) -> Self {
        map.cells
            .into_iter()
            .map(|(key, code)| ScheduleEntry { key, code })
            .collect()
    }
}
