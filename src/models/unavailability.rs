//! Day-level unavailability per assignment code.
//!
//! A code listed for a day must never be newly offered on that day.
//! Cells already holding a now-unavailable code are left alone; the
//! resolver keeps offering the occupant and validation reports it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::Day;

/// Mapping from code to the days it cannot be scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnavailabilitySet {
    blocked: BTreeMap<String, BTreeSet<Day>>,
}

impl UnavailabilitySet {
    /// Creates an empty set (every code always available).
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a code unavailable on a day.
    pub fn with_blocked(mut self, code: impl Into<String>, day: Day) -> Self {
        self.block(code, day);
        self
    }

    /// Marks a code unavailable on a day.
    pub fn block(&mut self, code: impl Into<String>, day: Day) {
        self.blocked.entry(code.into()).or_default().insert(day);
    }

    /// Lifts a block. Returns whether it existed.
    pub fn unblock(&mut self, code: &str, day: Day) -> bool {
        let Some(days) = self.blocked.get_mut(code) else {
            return false;
        };
        let removed = days.remove(&day);
        if days.is_empty() {
            self.blocked.remove(code);
        }
        removed
    }

    /// Whether the code cannot be scheduled on the day.
    pub fn is_unavailable(&self, code: &str, day: Day) -> bool {
        self.blocked
            .get(code)
            .is_some_and(|days| days.contains(&day))
    }

    /// Blocked days for a code, in week order.
    pub fn days_for(&self, code: &str) -> impl Iterator<Item = Day> + '_ {
        self.blocked.get(code).into_iter().flatten().copied()
    }

    /// Codes with at least one blocked day.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.blocked.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let u = UnavailabilitySet::new()
            .with_blocked("M1", Day::Monday)
            .with_blocked("M1", Day::Friday);

        assert!(u.is_unavailable("M1", Day::Monday));
        assert!(!u.is_unavailable("M1", Day::Tuesday));
        assert!(!u.is_unavailable("B1", Day::Monday));
        assert_eq!(u.days_for("M1").collect::<Vec<_>>(), vec![Day::Monday, Day::Friday]);
    }

    #[test]
    fn test_unblock_drops_empty_codes() {
        let mut u = UnavailabilitySet::new().with_blocked("M1", Day::Monday);
        assert!(u.unblock("M1", Day::Monday));
        assert!(!u.unblock("M1", Day::Monday));
        assert_eq!(u.codes().count(), 0);
    }

    #[test]
    fn test_serde_shape() {
        let u: UnavailabilitySet =
            serde_json::from_str(r#"{"M1":["Monday","Wednesday"]}"#).unwrap();
        assert!(u.is_unavailable("M1", Day::Wednesday));
        assert!(!u.is_unavailable("M1", Day::Tuesday));
    }
}
