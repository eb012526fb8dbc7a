//! Conflict detection over one day of the grid.
//!
//! Two conflict classes are reported:
//!
//! - **Cross-section**: in one teaching period, the same teacher holds
//!   cells in two or more sections. Counted per offending cell, so a
//!   teacher in three sections at once yields 3.
//! - **Same-section multi-subject**: within one section and day, the
//!   teacher's first code is canonical; the first deviation from it
//!   counts once per teacher, however many cells or codes follow.
//!   `A, B, B` and `A, B, C` both yield 1. Every deviating cell is flagged.
//!
//! Periods are walked in the day's slot order, not by period number.
//!
//! Detection is a pure full scan of (periods × sections) and is safe to
//! call repeatedly against the same snapshot.

use log::trace;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::error::{Result, TimetableError};
use crate::models::{Day, Roster, ScheduleMap, Section, SlotKey, TimetableStructure};

/// Kind of conflict a cell takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    /// Teacher needed in another section in the same period.
    CrossSection,
    /// Teacher appears earlier today in this section under another code.
    SameSectionMultiSubject,
}

/// A flagged cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellConflict {
    pub key: SlotKey,
    pub code: String,
    pub teacher_name: String,
    pub kind: ConflictKind,
}

/// Conflict counts and flagged cells for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub day: Day,
    /// Offending cells in cross-section double-bookings.
    pub cross_section_conflicts: usize,
    /// Teachers deviating from their first code, per section.
    pub same_section_multi_subject_conflicts: usize,
    /// Flagged cells: cross-section first, then same-section.
    pub cells: Vec<CellConflict>,
}

impl ConflictReport {
    fn empty(day: Day) -> Self {
        Self {
            day,
            cross_section_conflicts: 0,
            same_section_multi_subject_conflicts: 0,
            cells: Vec::new(),
        }
    }

    /// Total of both counters.
    pub fn total(&self) -> usize {
        self.cross_section_conflicts + self.same_section_multi_subject_conflicts
    }

    /// Whether the day is conflict-free.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Whether a cell is flagged for any conflict.
    pub fn is_flagged(&self, key: &SlotKey) -> bool {
        self.cells.iter().any(|c| &c.key == key)
    }

    /// Conflict kinds flagged on a cell.
    pub fn kinds_at(&self, key: &SlotKey) -> Vec<ConflictKind> {
        self.cells
            .iter()
            .filter(|c| &c.key == key)
            .map(|c| c.kind)
            .collect()
    }
}

/// Scans a schedule snapshot for conflicts.
#[derive(Debug, Clone, Copy)]
pub struct ConflictDetector<'a> {
    structure: &'a TimetableStructure,
    roster: &'a Roster,
    schedule: &'a ScheduleMap,
}

impl<'a> ConflictDetector<'a> {
    /// Creates a detector over a snapshot.
    pub fn new(
        structure: &'a TimetableStructure,
        roster: &'a Roster,
        schedule: &'a ScheduleMap,
    ) -> Self {
        Self {
            structure,
            roster,
            schedule,
        }
    }

    /// Detects conflicts on one day.
    ///
    /// Only teaching periods and deployment sections are scanned.
    ///
    /// # Errors
    /// `DanglingCode` if a scanned cell holds a code missing from the roster.
    pub fn detect(&self, day: Day) -> Result<ConflictReport> {
        let mut report = ConflictReport::empty(day);
        let periods = self.structure.teaching_periods(day);
        if periods.is_empty() {
            return Ok(report);
        }

        // (period, [(section, code, teacher)]) in slot order
        let mut grid: Vec<(u8, Vec<(&Section, &str, &str)>)> = Vec::with_capacity(periods.len());
        for &period in &periods {
            let mut row = Vec::new();
            for section in &self.structure.sections {
                let key = SlotKey::new(day, period, section.clone());
                if let Some(code) = self.schedule.get(&key) {
                    row.push((section, code, self.teacher(&key, code)?));
                }
            }
            grid.push((period, row));
        }

        // Cross-section: per period, any teacher present in ≥ 2 sections
        for &(period, ref row) in &grid {
            let mut per_teacher: HashMap<&str, usize> = HashMap::new();
            for &(_, _, teacher) in row {
                *per_teacher.entry(teacher).or_insert(0) += 1;
            }
            for &(section, code, teacher) in row {
                if per_teacher[teacher] > 1 {
                    report.cross_section_conflicts += 1;
                    report.cells.push(CellConflict {
                        key: SlotKey::new(day, period, section.clone()),
                        code: code.to_string(),
                        teacher_name: teacher.to_string(),
                        kind: ConflictKind::CrossSection,
                    });
                }
            }
        }

        // Same-section: walk each section's periods in order
        for section in &self.structure.sections {
            let mut canonical: HashMap<&str, &str> = HashMap::new();
            let mut counted: HashSet<&str> = HashSet::new();
            for &(period, ref row) in &grid {
                let Some(&(_, code, teacher)) = row.iter().find(|(s, _, _)| *s == section) else {
                    continue;
                };
                let first = *canonical.entry(teacher).or_insert(code);
                if first == code {
                    continue;
                }
                if counted.insert(teacher) {
                    report.same_section_multi_subject_conflicts += 1;
                }
                report.cells.push(CellConflict {
                    key: SlotKey::new(day, period, section.clone()),
                    code: code.to_string(),
                    teacher_name: teacher.to_string(),
                    kind: ConflictKind::SameSectionMultiSubject,
                });
            }
        }

        trace!(
            "{}: {} cross-section, {} same-section conflicts",
            day,
            report.cross_section_conflicts,
            report.same_section_multi_subject_conflicts
        );
        Ok(report)
    }

    /// Detects conflicts for every day of the structure, in week order.
    pub fn detect_week(&self) -> Result<Vec<ConflictReport>> {
        self.structure
            .day_labels()
            .map(|day| self.detect(day))
            .collect()
    }

    fn teacher(&self, key: &SlotKey, code: &str) -> Result<&'a str> {
        self.roster
            .teacher_of(code)
            .map_err(|_| TimetableError::DanglingCode {
                key: key.clone(),
                code: code.to_string(),
            })
    }
}
