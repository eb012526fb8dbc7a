//! Usage counter: scheduled hours against quotas.
//!
//! For each (code, section) pair:
//!
//! | Value | Definition |
//! |-------|-----------|
//! | quota | Hours the code owes the section (roster) |
//! | used | Cells in the schedule holding the code in that section |
//! | remaining | quota − used (may be negative after a quota cut) |
//!
//! The counter is a snapshot: it is computed by a full scan of the
//! schedule and records the schedule generation it was taken at.

use log::warn;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Roster, ScheduleMap, Section};

/// One monitoring row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRow {
    pub code: String,
    pub section: Section,
    pub quota: u32,
    pub used: u32,
    pub remaining: i64,
}

/// Per (code, section) usage snapshot.
#[derive(Debug, Clone, Default)]
pub struct UsageCounter {
    used: BTreeMap<(String, Section), u32>,
    quota: BTreeMap<(String, Section), u32>,
    generation: u64,
}

impl UsageCounter {
    /// Counts every cell of the schedule against the roster's quotas.
    ///
    /// Cells whose code is missing from the roster are still counted
    /// (against a quota of zero); surfacing them is the job of the
    /// resolver, the conflict detector and validation.
    pub fn calculate(schedule: &ScheduleMap, roster: &Roster) -> Self {
        let mut used: BTreeMap<(String, Section), u32> = BTreeMap::new();
        for (key, code) in schedule.iter() {
            *used
                .entry((code.to_string(), key.section.clone()))
                .or_insert(0) += 1;
        }

        let mut quota = BTreeMap::new();
        for record in roster.records() {
            for (section, &hours) in &record.quota {
                quota.insert((record.code.clone(), section.clone()), hours);
            }
        }

        let counter = Self {
            used,
            quota,
            generation: schedule.generation(),
        };
        for row in counter.anomalies() {
            warn!(
                "quota anomaly: {} in {} scheduled {}h against quota {}h",
                row.code, row.section, row.used, row.quota
            );
        }
        counter
    }

    /// Cells holding `code` in `section`.
    pub fn used(&self, code: &str, section: &Section) -> u32 {
        self.used
            .get(&(code.to_string(), section.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Quota captured at calculation time.
    pub fn quota(&self, code: &str, section: &Section) -> u32 {
        self.quota
            .get(&(code.to_string(), section.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// quota − used. Negative values are reportable anomalies.
    pub fn remaining(&self, code: &str, section: &Section) -> i64 {
        i64::from(self.quota(code, section)) - i64::from(self.used(code, section))
    }

    /// Schedule generation this snapshot was taken at.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the schedule has not been written since this snapshot.
    ///
    /// Only meaningful for the schedule the counter was computed from.
    pub fn is_current(&self, schedule: &ScheduleMap) -> bool {
        self.generation == schedule.generation()
    }

    /// Every quota entry plus every scheduled pair without one, in
    /// (code, section) order.
    pub fn rows(&self) -> Vec<UsageRow> {
        let keys: BTreeSet<&(String, Section)> =
            self.quota.keys().chain(self.used.keys()).collect();
        keys.into_iter()
            .map(|(code, section)| UsageRow {
                code: code.clone(),
                section: section.clone(),
                quota: self.quota(code, section),
                used: self.used(code, section),
                remaining: self.remaining(code, section),
            })
            .collect()
    }

    /// Rows with negative remaining.
    pub fn anomalies(&self) -> Vec<UsageRow> {
        self.rows().into_iter().filter(|r| r.remaining < 0).collect()
    }

    /// Hours still to place across the whole roster (ignoring overruns).
    pub fn total_outstanding(&self) -> u64 {
        self.rows()
            .iter()
            .map(|r| r.remaining.max(0) as u64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentRecord, Day, SlotKey};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn vii_a() -> Section {
        Section::new("VII", "A")
    }

    fn vii_b() -> Section {
        Section::new("VII", "B")
    }

    fn roster() -> Roster {
        Roster::from_records(vec![
            AssignmentRecord::new("M1", "Teacher X", "Math")
                .with_quota(vii_a(), 2)
                .with_quota(vii_b(), 3),
            AssignmentRecord::new("B1", "Teacher Y", "Biology").with_quota(vii_a(), 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_used_counts_exact_cells() {
        let mut s = ScheduleMap::new();
        s.assign(SlotKey::new(Day::Monday, 1, vii_a()), "M1");
        s.assign(SlotKey::new(Day::Monday, 2, vii_a()), "M1");
        s.assign(SlotKey::new(Day::Monday, 1, vii_b()), "M1");

        let u = UsageCounter::calculate(&s, &roster());
        assert_eq!(u.used("M1", &vii_a()), 2);
        assert_eq!(u.used("M1", &vii_b()), 1);
        assert_eq!(u.remaining("M1", &vii_a()), 0);
        assert_eq!(u.remaining("M1", &vii_b()), 2);
        assert_eq!(u.remaining("B1", &vii_a()), 1);
    }

    #[test]
    fn test_negative_remaining_is_reported_not_fatal() {
        let mut s = ScheduleMap::new();
        s.assign(SlotKey::new(Day::Monday, 1, vii_a()), "M1");
        s.assign(SlotKey::new(Day::Monday, 2, vii_a()), "M1");

        let mut r = roster();
        r.insert(AssignmentRecord::new("M1", "Teacher X", "Math").with_quota(vii_a(), 1));

        let u = UsageCounter::calculate(&s, &r);
        assert_eq!(u.remaining("M1", &vii_a()), -1);
        let anomalies = u.anomalies();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].code, "M1");
        assert_eq!(anomalies[0].used, 2);
    }

    #[test]
    fn test_rows_include_unquoted_pairs() {
        let mut s = ScheduleMap::new();
        s.assign(SlotKey::new(Day::Monday, 1, vii_b()), "B1");

        let u = UsageCounter::calculate(&s, &roster());
        let rows = u.rows();
        let codes: Vec<(&str, String)> = rows
            .iter()
            .map(|r| (r.code.as_str(), r.section.to_string()))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("B1", "VII A".to_string()),
                ("B1", "VII B".to_string()),
                ("M1", "VII A".to_string()),
                ("M1", "VII B".to_string()),
            ]
        );
        assert_eq!(u.remaining("B1", &vii_b()), -1);
    }

    #[test]
    fn test_generation_tracking() {
        let mut s = ScheduleMap::new();
        let u = UsageCounter::calculate(&s, &roster());
        assert!(u.is_current(&s));
        s.assign(SlotKey::new(Day::Monday, 1, vii_a()), "M1");
        assert!(!u.is_current(&s));
    }

    #[test]
    fn test_total_outstanding() {
        let mut s = ScheduleMap::new();
        s.assign(SlotKey::new(Day::Monday, 1, vii_a()), "M1");
        let u = UsageCounter::calculate(&s, &roster());
        // M1/VII A: 1, M1/VII B: 3, B1/VII A: 1
        assert_eq!(u.total_outstanding(), 5);
    }

    #[test]
    fn test_used_matches_cell_count_on_random_schedules() {
        let mut rng = SmallRng::seed_from_u64(42);
        let sections = [vii_a(), vii_b()];
        let codes = ["M1", "B1"];
        let r = roster();

        for _ in 0..20 {
            let mut s = ScheduleMap::new();
            for _ in 0..rng.random_range(0..40) {
                let day = Day::ALL[rng.random_range(0..6)];
                let period = rng.random_range(1..=8);
                let section = sections[rng.random_range(0..2)].clone();
                let key = SlotKey::new(day, period, section);
                if rng.random_bool(0.2) {
                    s.clear(&key);
                } else {
                    s.assign(key, codes[rng.random_range(0..2)]);
                }
            }

            let u = UsageCounter::calculate(&s, &r);
            for code in codes {
                for section in &sections {
                    let expected = s
                        .iter()
                        .filter(|(k, c)| *c == code && &k.section == section)
                        .count() as u32;
                    assert_eq!(u.used(code, section), expected);
                }
            }
        }
    }
}
