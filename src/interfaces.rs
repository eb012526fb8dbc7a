//! Interfaces to external collaborators.
//!
//! The engine never performs I/O. Persistence and holiday calendars
//! live outside it and are reached through these traits.

use std::collections::HashMap;
use std::convert::Infallible;

use crate::models::{Day, ScheduleMap};

/// Read-only day → event lookup (holidays, school events).
///
/// Candidate resolution and conflict detection never consult it;
/// callers layer it over resolved views.
pub trait HolidayLookup {
    /// Event label for the day, if any.
    fn event_on(&self, day: Day) -> Option<String>;

    /// Whether the day carries an event.
    fn is_holiday(&self, day: Day) -> bool {
        self.event_on(day).is_some()
    }
}

/// A calendar with no events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayLookup for NoHolidays {
    fn event_on(&self, _day: Day) -> Option<String> {
        None
    }
}

impl HolidayLookup for HashMap<Day, String> {
    fn event_on(&self, day: Day) -> Option<String> {
        self.get(&day).cloned()
    }
}

/// Durable storage for schedules, keyed by an arbitrary string.
pub trait ScheduleStore {
    type Error: std::error::Error;

    /// Loads a schedule. `Ok(None)` if nothing is stored under the key.
    fn load(&self, key: &str) -> Result<Option<ScheduleMap>, Self::Error>;

    /// Stores a schedule, replacing any previous value.
    fn save(&mut self, key: &str, schedule: &ScheduleMap) -> Result<(), Self::Error>;
}

/// In-process store, for tests and single-session hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    schedules: HashMap<String, ScheduleMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScheduleStore for MemoryStore {
    type Error = Infallible;

    fn load(&self, key: &str) -> Result<Option<ScheduleMap>, Self::Error> {
        Ok(self.schedules.get(key).cloned())
    }

    fn save(&mut self, key: &str, schedule: &ScheduleMap) -> Result<(), Self::Error> {
        self.schedules.insert(key.to_string(), schedule.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Section, SlotKey};

    #[test]
    fn test_holiday_map() {
        let mut events = HashMap::new();
        events.insert(Day::Friday, "Independence Day".to_string());
        assert!(events.is_holiday(Day::Friday));
        assert!(!events.is_holiday(Day::Monday));
        assert!(!NoHolidays.is_holiday(Day::Friday));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.load("2026/27").unwrap().is_none());

        let mut s = ScheduleMap::new();
        s.assign(SlotKey::new(Day::Monday, 1, Section::new("VII", "A")), "M1");
        store.save("2026/27", &s).unwrap();

        let loaded = store.load("2026/27").unwrap().unwrap();
        assert_eq!(loaded.get(&SlotKey::new(Day::Monday, 1, Section::new("VII", "A"))), Some("M1"));
    }
}
