//! Timetable domain models.
//!
//! Pure data describing one school's week: its shape, its sections,
//! who owes which hours to whom, who is away on which day, and what is
//! currently scheduled where.
//!
//! # Domain Mappings
//!
//! | u-timetable | Meaning |
//! |-------------|---------|
//! | TimetableStructure | Days → ordered periods (teaching / activity) |
//! | Section | Grade + letter cohort |
//! | AssignmentRecord | Teacher × subject with per-section hour quotas |
//! | ScheduleMap | (day, period, section) → code |
//! | UnavailabilitySet | code → blocked days |

mod roster;
mod schedule;
mod section;
mod structure;
mod unavailability;

pub use roster::{AssignmentRecord, Roster};
pub use schedule::{ScheduleEntry, ScheduleMap, SlotKey};
pub use section::Section;
pub use structure::{Day, DayPlan, Period, PeriodKind, TimeRange, TimetableStructure};
pub use unavailability::UnavailabilitySet;
