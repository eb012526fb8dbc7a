//! Candidate resolution for a single cell.
//!
//! Given a target cell, produces every code owing hours to the cell's
//! section, each tagged with whether it may be selected:
//!
//! | Outcome | Reason |
//! |---------|--------|
//! | Hidden | quota exhausted, or teacher unavailable that day |
//! | Disabled | teacher already teaches this section today under another code |
//! | Selectable | none of the above |
//!
//! The cell's current occupant is always listed. Remaining hours are
//! computed as if the cell were empty, and the occupant is never hidden
//! for exhaustion or unavailability. It is still disabled when its
//! teacher holds this section elsewhere today under another code.

use log::{trace, warn};
use serde::Serialize;
use std::fmt;

use crate::error::{Result, TimetableError};
use crate::models::{Roster, ScheduleMap, SlotKey, TimetableStructure, UnavailabilitySet};
use crate::usage::UsageCounter;

/// Why a code cannot be selected for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExclusionReason {
    /// The code owes no hours to the cell's section.
    NotOffered,
    /// All quota hours for the section are already scheduled.
    Exhausted,
    /// The code is marked unavailable on the cell's day.
    UnavailableDay,
    /// The teacher already appears in this section today under another code.
    DifferentSubjectConflict,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExclusionReason::NotOffered => "not offered to this section",
            ExclusionReason::Exhausted => "quota exhausted",
            ExclusionReason::UnavailableDay => "unavailable on this day",
            ExclusionReason::DifferentSubjectConflict => {
                "teacher already scheduled here today for another subject"
            }
        })
    }
}

/// How a candidate is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "reason")]
pub enum Availability {
    /// Offered and selectable.
    Selectable,
    /// Shown but not selectable.
    Disabled(ExclusionReason),
    /// Not offered at all.
    Hidden(ExclusionReason),
}

impl Availability {
    /// Reason attached to a disabled or hidden candidate.
    pub fn reason(self) -> Option<ExclusionReason> {
        match self {
            Availability::Selectable => None,
            Availability::Disabled(r) | Availability::Hidden(r) => Some(r),
        }
    }
}

/// One code considered for a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub code: String,
    pub teacher_name: String,
    pub subject: String,
    /// Remaining hours as if the target cell were empty.
    pub remaining: i64,
    /// Whether the cell currently holds this code.
    pub is_current: bool,
    pub availability: Availability,
}

impl Candidate {
    /// Whether the candidate may be written to the cell.
    #[inline]
    pub fn is_selectable(&self) -> bool {
        self.availability == Availability::Selectable
    }

    /// Whether the candidate is shown (selectable or disabled).
    #[inline]
    pub fn is_offered(&self) -> bool {
        !matches!(self.availability, Availability::Hidden(_))
    }
}

/// All candidates for one cell, in code order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateList {
    pub key: SlotKey,
    /// Code currently in the cell.
    pub current: Option<String>,
    pub entries: Vec<Candidate>,
}

impl CandidateList {
    /// Shown candidates (selectable and disabled).
    pub fn offered(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().filter(|c| c.is_offered())
    }

    /// Selectable candidates.
    pub fn selectable(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().filter(|c| c.is_selectable())
    }

    /// Hidden candidates with their reasons.
    pub fn hidden(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().filter(|c| !c.is_offered())
    }

    /// Looks up a candidate by code.
    pub fn get(&self, code: &str) -> Option<&Candidate> {
        self.entries.iter().find(|c| c.code == code)
    }

    /// Whether the code is shown for this cell.
    pub fn offers(&self, code: &str) -> bool {
        self.get(code).is_some_and(Candidate::is_offered)
    }

    /// Whether nothing is shown ("no options" for this section).
    pub fn is_empty(&self) -> bool {
        self.offered().next().is_none()
    }

    /// Checks that a code may be written to the cell.
    pub fn check_selectable(&self, code: &str) -> Result<()> {
        let reason = match self.get(code) {
            None => ExclusionReason::NotOffered,
            Some(c) => match c.availability.reason() {
                None => return Ok(()),
                Some(r) => r,
            },
        };
        Err(TimetableError::NotSelectable {
            key: self.key.clone(),
            code: code.to_string(),
            reason,
        })
    }
}

/// Computes legal candidates for cells over one state snapshot.
#[derive(Debug, Clone, Copy)]
pub struct CandidateResolver<'a> {
    structure: &'a TimetableStructure,
    roster: &'a Roster,
    schedule: &'a ScheduleMap,
    unavailability: &'a UnavailabilitySet,
}

impl<'a> CandidateResolver<'a> {
    /// Creates a resolver over a snapshot.
    pub fn new(
        structure: &'a TimetableStructure,
        roster: &'a Roster,
        schedule: &'a ScheduleMap,
        unavailability: &'a UnavailabilitySet,
    ) -> Self {
        Self {
            structure,
            roster,
            schedule,
            unavailability,
        }
    }

    /// Resolves candidates for a cell, counting usage afresh.
    pub fn resolve(&self, key: &SlotKey) -> Result<CandidateList> {
        let usage = UsageCounter::calculate(self.schedule, self.roster);
        self.resolve_with(&usage, key)
    }

    /// Resolves candidates using a precomputed usage snapshot.
    ///
    /// `usage` must have been computed from this resolver's schedule.
    ///
    /// # Errors
    /// - `UnknownSection` / `NotTeachingPeriod` for a cell outside the grid.
    /// - `DanglingCode` if the cell, or another cell of the same section
    ///   and day, holds a code missing from the roster.
    pub fn resolve_with(&self, usage: &UsageCounter, key: &SlotKey) -> Result<CandidateList> {
        if !self.structure.has_section(&key.section) {
            return Err(TimetableError::UnknownSection(key.section.clone()));
        }
        if !self.structure.is_teaching(key.day, key.period) {
            return Err(TimetableError::NotTeachingPeriod {
                day: key.day,
                period: key.period,
            });
        }

        let current = self.schedule.get(key);
        if let Some(code) = current {
            self.require_known(key, code)?;
        }

        // (code, teacher) for every other teaching period of this section today
        let mut same_day = Vec::new();
        for (other, code) in self.schedule.section_day(key.day, &key.section) {
            if other.period == key.period || !self.structure.is_teaching(other.day, other.period) {
                continue;
            }
            let teacher = self.require_known(other, code)?;
            same_day.push((code, teacher));
        }

        let mut records = self.roster.eligible_codes(&key.section);
        if let Some(code) = current {
            if !records.iter().any(|r| r.code == code) {
                records.push(self.roster.record(code)?);
                records.sort_by(|a, b| a.code.cmp(&b.code));
            }
        }

        let entries: Vec<Candidate> = records
            .into_iter()
            .map(|record| {
                let is_current = current == Some(record.code.as_str());
                let remaining =
                    usage.remaining(&record.code, &key.section) + i64::from(is_current);

                let availability = if !is_current && remaining <= 0 {
                    Availability::Hidden(ExclusionReason::Exhausted)
                } else if !is_current && self.unavailability.is_unavailable(&record.code, key.day) {
                    Availability::Hidden(ExclusionReason::UnavailableDay)
                } else if same_day
                    .iter()
                    .any(|(code, teacher)| *teacher == record.teacher_name && *code != record.code)
                {
                    Availability::Disabled(ExclusionReason::DifferentSubjectConflict)
                } else {
                    Availability::Selectable
                };

                Candidate {
                    code: record.code.clone(),
                    teacher_name: record.teacher_name.clone(),
                    subject: record.subject.clone(),
                    remaining,
                    is_current,
                    availability,
                }
            })
            .collect();

        trace!(
            "resolved {}: {} candidates, {} selectable",
            key,
            entries.len(),
            entries.iter().filter(|c| c.is_selectable()).count()
        );

        Ok(CandidateList {
            key: key.clone(),
            current: current.map(str::to_string),
            entries,
        })
    }

    fn require_known(&self, key: &SlotKey, code: &str) -> Result<&'a str> {
        self.roster.teacher_of(code).map_err(|_| {
            warn!("cell {key} holds unknown code '{code}'");
            TimetableError::DanglingCode {
                key: key.clone(),
                code: code.to_string(),
            }
        })
    }
}
