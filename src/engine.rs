//! Single-writer facade over one timetable snapshot.
//!
//! [`TimetableEngine`] owns the structure, roster, unavailability set
//! and schedule. Reads are pure functions of the current state and
//! recompute derived views (usage, candidates, conflicts) from scratch.
//! [`set`](TimetableEngine::set) is the only schedule mutator.
//!
//! Cloning an engine yields an independent snapshot, so display
//! surfaces can read a clone while the editor keeps writing.
//!
//! ```
//! use u_timetable::models::*;
//! use u_timetable::TimetableEngine;
//!
//! let vii_a = Section::new("VII", "A");
//! let structure = TimetableStructure::new()
//!     .with_day(
//!         DayPlan::new(Day::Monday)
//!             .with_period(Period::teaching(1, TimeRange::hm((7, 0), (7, 40))))
//!             .with_period(Period::teaching(2, TimeRange::hm((7, 40), (8, 20))))
//!             .with_period(Period::teaching(3, TimeRange::hm((8, 20), (9, 0)))),
//!     )
//!     .with_section(vii_a.clone());
//! let roster = Roster::from_records(vec![
//!     AssignmentRecord::new("M1", "Teacher X", "Math").with_quota(vii_a.clone(), 2),
//! ])
//! .unwrap();
//!
//! let mut engine = TimetableEngine::new(structure, roster, UnavailabilitySet::new());
//! engine.assign(SlotKey::new(Day::Monday, 1, vii_a.clone()), "M1").unwrap();
//! engine.assign(SlotKey::new(Day::Monday, 2, vii_a.clone()), "M1").unwrap();
//!
//! assert_eq!(engine.remaining("M1", &vii_a), 0);
//! let third = engine.candidates(&SlotKey::new(Day::Monday, 3, vii_a)).unwrap();
//! assert!(!third.offers("M1"));
//! ```

use log::{debug, warn};
use serde::Serialize;

use crate::conflict::{ConflictDetector, ConflictReport};
use crate::error::{Result, TimetableError};
use crate::interfaces::{HolidayLookup, ScheduleStore};
use crate::models::{
    Day, Roster, ScheduleMap, Section, SlotKey, TimeRange, TimetableStructure, UnavailabilitySet,
};
use crate::resolver::{CandidateList, CandidateResolver};
use crate::usage::UsageCounter;
use crate::validation::{unavailable_occupants, validate_input, ValidationError, ValidationResult};

/// An occupied cell resolved to teacher and subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub key: SlotKey,
    pub code: String,
    pub teacher_name: String,
    pub subject: String,
    pub time: TimeRange,
}

/// One day's lessons with its calendar event, for attendance and
/// journal consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOverview {
    pub day: Day,
    pub event: Option<String>,
    pub lessons: Vec<Lesson>,
}

/// Timetable state plus every engine operation over it.
#[derive(Debug, Clone)]
pub struct TimetableEngine {
    structure: TimetableStructure,
    roster: Roster,
    unavailability: UnavailabilitySet,
    schedule: ScheduleMap,
}

impl TimetableEngine {
    /// Creates an engine with an empty schedule.
    pub fn new(
        structure: TimetableStructure,
        roster: Roster,
        unavailability: UnavailabilitySet,
    ) -> Self {
        Self {
            structure,
            roster,
            unavailability,
            schedule: ScheduleMap::new(),
        }
    }

    /// Replaces the schedule.
    pub fn with_schedule(mut self, schedule: ScheduleMap) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn structure(&self) -> &TimetableStructure {
        &self.structure
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Roster for administrative edits. Derived views follow on next read.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn unavailability(&self) -> &UnavailabilitySet {
        &self.unavailability
    }

    pub fn unavailability_mut(&mut self) -> &mut UnavailabilitySet {
        &mut self.unavailability
    }

    pub fn schedule(&self) -> &ScheduleMap {
        &self.schedule
    }

    /// Runs every integrity check over the current state.
    pub fn validate(&self) -> ValidationResult {
        validate_input(
            &self.structure,
            &self.roster,
            &self.unavailability,
            &self.schedule,
        )
    }

    /// Cells holding a code that is unavailable on the cell's day.
    ///
    /// Not errors: such cells stay until edited, and the resolver keeps
    /// offering the occupant for its own cell.
    pub fn unavailable_occupants(&self) -> Vec<ValidationError> {
        unavailable_occupants(&self.unavailability, &self.schedule)
    }

    // ---- writes ----

    /// Writes a cell without validation. `None` clears it.
    ///
    /// Callers must only write codes taken from
    /// [`candidates`](Self::candidates); use [`assign`](Self::assign)
    /// for a checked write.
    pub fn set(&mut self, key: SlotKey, code: Option<String>) -> Option<String> {
        let label = code.clone().unwrap_or_else(|| "-".to_string());
        let previous = self.schedule.set(key.clone(), code);
        debug!(
            "set {}: {} -> {} (generation {})",
            key,
            previous.as_deref().unwrap_or("-"),
            label,
            self.schedule.generation()
        );
        previous
    }

    /// Writes a code after checking it is selectable for the cell.
    ///
    /// # Errors
    /// Any resolver error, or `NotSelectable` with the exclusion reason.
    pub fn assign(&mut self, key: SlotKey, code: impl Into<String>) -> Result<Option<String>> {
        let code = code.into();
        let candidates = self.candidates(&key)?;
        if let Err(e) = candidates.check_selectable(&code) {
            warn!("refused write: {e}");
            return Err(e);
        }
        Ok(self.set(key, Some(code)))
    }

    /// Empties a cell.
    pub fn clear(&mut self, key: &SlotKey) -> Option<String> {
        self.set(key.clone(), None)
    }

    // ---- derived views ----

    /// Usage snapshot of the current schedule.
    pub fn usage(&self) -> UsageCounter {
        UsageCounter::calculate(&self.schedule, &self.roster)
    }

    /// quota − used for a (code, section) pair.
    pub fn remaining(&self, code: &str, section: &Section) -> i64 {
        self.usage().remaining(code, section)
    }

    /// Resolver bound to the current state.
    pub fn resolver(&self) -> CandidateResolver<'_> {
        CandidateResolver::new(
            &self.structure,
            &self.roster,
            &self.schedule,
            &self.unavailability,
        )
    }

    /// Candidates for a cell.
    pub fn candidates(&self, key: &SlotKey) -> Result<CandidateList> {
        self.resolver().resolve(key)
    }

    /// Detector bound to the current state.
    pub fn detector(&self) -> ConflictDetector<'_> {
        ConflictDetector::new(&self.structure, &self.roster, &self.schedule)
    }

    /// Conflicts on one day.
    pub fn conflicts(&self, day: Day) -> Result<ConflictReport> {
        self.detector().detect(day)
    }

    /// Conflicts for every day of the week.
    pub fn week_conflicts(&self) -> Result<Vec<ConflictReport>> {
        self.detector().detect_week()
    }

    // ---- resolved views ----

    /// Occupied cells of a day, resolved, in (period, section) order.
    ///
    /// # Errors
    /// - `DanglingCode` for a cell holding a code missing from the roster.
    /// - `NotTeachingPeriod` for a cell off the day's teaching periods.
    pub fn lessons_on(&self, day: Day) -> Result<Vec<Lesson>> {
        self.schedule
            .cells_on(day)
            .map(|(key, code)| self.lesson(key, code))
            .collect()
    }

    /// Every lesson a teacher gives during the week, in key order.
    pub fn teacher_timetable(&self, teacher_name: &str) -> Result<Vec<Lesson>> {
        let codes = self.roster.codes_of_teacher(teacher_name);
        self.schedule
            .iter()
            .filter(|(_, code)| codes.contains(code))
            .map(|(key, code)| self.lesson(key, code))
            .collect()
    }

    /// A day's lessons together with its holiday/event label.
    pub fn day_overview(&self, day: Day, holidays: &impl HolidayLookup) -> Result<DayOverview> {
        Ok(DayOverview {
            day,
            event: holidays.event_on(day),
            lessons: self.lessons_on(day)?,
        })
    }

    fn lesson(&self, key: &SlotKey, code: &str) -> Result<Lesson> {
        let record = self.roster.get(code).ok_or_else(|| {
            warn!("cell {key} holds unknown code '{code}'");
            TimetableError::DanglingCode {
                key: key.clone(),
                code: code.to_string(),
            }
        })?;
        let time = self
            .structure
            .day(key.day)
            .and_then(|d| d.teaching_period(key.period))
            .map(|p| p.time)
            .ok_or(TimetableError::NotTeachingPeriod {
                day: key.day,
                period: key.period,
            })?;
        Ok(Lesson {
            key: key.clone(),
            code: code.to_string(),
            teacher_name: record.teacher_name.clone(),
            subject: record.subject.clone(),
            time,
        })
    }

    // ---- persistence ----

    /// Saves the schedule to a store.
    pub fn save_to<S: ScheduleStore>(&self, store: &mut S, key: &str) -> std::result::Result<(), S::Error> {
        store.save(key, &self.schedule)
    }

    /// Replaces the schedule with one from a store. Returns whether a
    /// schedule was found under the key.
    pub fn load_from<S: ScheduleStore>(&mut self, store: &S, key: &str) -> std::result::Result<bool, S::Error> {
        match store.load(key)? {
            Some(schedule) => {
                debug!("loaded schedule '{key}' with {} cells", schedule.len());
                self.schedule = schedule;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
