//! Timetable structure: the static shape of the week.
//!
//! A week is an ordered list of days. Each day is an ordered list of
//! periods. A period is either a numbered teaching period or a
//! non-teaching activity (flag ceremony, break) that occupies a slot in
//! the day but can never receive an assignment.
//!
//! # Time Model
//! Period times are minutes since midnight, displayed as `HH:MM`.
//! The week repeats unchanged; there are no dated weeks here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Section;
use crate::error::TimetableError;

/// A day of the school week.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days, Monday first.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// English day name.
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A time range [start, end) within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeRangeRepr", into = "TimeRangeRepr")]
pub struct TimeRange {
    /// Start (minutes since midnight, inclusive).
    pub start_min: u16,
    /// End (minutes since midnight, exclusive).
    pub end_min: u16,
}

impl TimeRange {
    /// Creates a time range from minute offsets.
    pub fn new(start_min: u16, end_min: u16) -> Self {
        Self { start_min, end_min }
    }

    /// Creates a time range from hour/minute pairs.
    pub fn hm(start: (u16, u16), end: (u16, u16)) -> Self {
        Self::new(start.0 * 60 + start.1, end.0 * 60 + end.1)
    }

    /// Duration in minutes.
    #[inline]
    pub fn duration_min(&self) -> u16 {
        self.end_min.saturating_sub(self.start_min)
    }

    /// Whether two ranges overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            format_clock(self.start_min),
            format_clock(self.end_min)
        )
    }
}

fn format_clock(min: u16) -> String {
    format!("{:02}:{:02}", min / 60, min % 60)
}

fn parse_clock(s: &str) -> Result<u16, TimetableError> {
    let bad = || TimetableError::Config(format!("invalid clock time '{s}', expected HH:MM"));
    let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
    let h: u16 = h.parse().map_err(|_| bad())?;
    let m: u16 = m.parse().map_err(|_| bad())?;
    if h > 23 || m > 59 {
        return Err(bad());
    }
    Ok(h * 60 + m)
}

#[derive(Serialize, Deserialize)]
struct TimeRangeRepr {
    start: String,
    end: String,
}

impl TryFrom<TimeRangeRepr> for TimeRange {
    type Error = TimetableError;

    fn try_from(repr: TimeRangeRepr) -> Result<Self, Self::Error> {
        let range = TimeRange::new(parse_clock(&repr.start)?, parse_clock(&repr.end)?);
        if range.end_min <= range.start_min {
            return Err(TimetableError::Config(format!(
                "time range {} - {} ends before it starts",
                repr.start, repr.end
            )));
        }
        Ok(range)
    }
}

impl From<TimeRange> for TimeRangeRepr {
    fn from(range: TimeRange) -> Self {
        Self {
            start: format_clock(range.start_min),
            end: format_clock(range.end_min),
        }
    }
}

impl FromStr for TimeRange {
    type Err = TimetableError;

    /// Parses `"07:00 - 07:40"` or `"07:00-07:40"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| TimetableError::Config(format!("invalid time range '{s}'")))?;
        TimeRange::try_from(TimeRangeRepr {
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}

/// What a period is used for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PeriodKind {
    /// Assignable lesson slot with its ordinal number.
    Teaching { number: u8 },
    /// Ceremony, break, or other activity. Never assignable.
    Activity { label: String },
}

/// One slot in a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Teaching or non-teaching.
    #[serde(flatten)]
    pub kind: PeriodKind,
    /// Display time range.
    pub time: TimeRange,
}

impl Period {
    /// Creates a teaching period.
    pub fn teaching(number: u8, time: TimeRange) -> Self {
        Self {
            kind: PeriodKind::Teaching { number },
            time,
        }
    }

    /// Creates a non-teaching activity period.
    pub fn activity(label: impl Into<String>, time: TimeRange) -> Self {
        Self {
            kind: PeriodKind::Activity {
                label: label.into(),
            },
            time,
        }
    }

    /// Teaching period number, or `None` for activities.
    pub fn number(&self) -> Option<u8> {
        match self.kind {
            PeriodKind::Teaching { number } => Some(number),
            PeriodKind::Activity { .. } => None,
        }
    }

    /// Whether this period can receive an assignment.
    #[inline]
    pub fn is_teaching(&self) -> bool {
        self.number().is_some()
    }
}

/// The ordered periods of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: Day,
    pub periods: Vec<Period>,
}

impl DayPlan {
    /// Creates an empty plan for a day.
    pub fn new(day: Day) -> Self {
        Self {
            day,
            periods: Vec::new(),
        }
    }

    /// Appends a period.
    pub fn with_period(mut self, period: Period) -> Self {
        self.periods.push(period);
        self
    }

    /// Teaching period numbers in slot order.
    pub fn teaching_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.periods.iter().filter_map(Period::number)
    }

    /// Finds the teaching period with the given number.
    pub fn teaching_period(&self, number: u8) -> Option<&Period> {
        self.periods.iter().find(|p| p.number() == Some(number))
    }
}

/// The static shape of the week plus the deployment's sections.
///
/// Defined once at startup; not edited at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableStructure {
    /// Days in iteration order.
    pub days: Vec<DayPlan>,
    /// Sections receiving instruction, in display order.
    pub sections: Vec<Section>,
}

impl TimetableStructure {
    /// Creates an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a day plan.
    pub fn with_day(mut self, plan: DayPlan) -> Self {
        self.days.push(plan);
        self
    }

    /// Adds a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Plan for a day, if the day is part of the week.
    pub fn day(&self, day: Day) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Days in iteration order.
    pub fn day_labels(&self) -> impl Iterator<Item = Day> + '_ {
        self.days.iter().map(|d| d.day)
    }

    /// Teaching period numbers for a day (empty if the day is unknown).
    pub fn teaching_periods(&self, day: Day) -> Vec<u8> {
        self.day(day)
            .map(|d| d.teaching_numbers().collect())
            .unwrap_or_default()
    }

    /// Whether `(day, period)` names an assignable slot.
    pub fn is_teaching(&self, day: Day, period: u8) -> bool {
        self.day(day)
            .and_then(|d| d.teaching_period(period))
            .is_some()
    }

    /// Whether the section belongs to this deployment.
    pub fn has_section(&self, section: &Section) -> bool {
        self.sections.contains(section)
    }

    /// Total number of assignable cells (teaching periods × sections).
    pub fn cell_count(&self) -> usize {
        let periods: usize = self.days.iter().map(|d| d.teaching_numbers().count()).sum();
        periods * self.sections.len()
    }
}
