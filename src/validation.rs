//! Input validation for a timetable snapshot.
//!
//! Checks structural integrity of the week, the roster, the
//! unavailability set and the schedule before they are used. Detects:
//! - Duplicate days, sections, period numbers and codes
//! - Overlapping period times within a day
//! - Quotas and unavailability entries that point nowhere
//! - Schedule cells outside the grid or holding unknown codes
//!
//! Every issue is collected; validation never stops at the first one.
//!
//! Cells holding a code that became unavailable on the cell's day are
//! not errors: the engine keeps them and [`unavailable_occupants`]
//! reports them for display.

use crate::models::{
    AssignmentRecord, Roster, ScheduleMap, TimetableStructure, UnavailabilitySet,
};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same identifier.
    DuplicateId,
    /// A record has an empty code, teacher name or subject.
    EmptyField,
    /// Two periods of one day overlap in time.
    OverlappingPeriods,
    /// A quota, cell or constraint names a section outside the deployment.
    UnknownSection,
    /// A cell or constraint names a code absent from the roster.
    UnknownCode,
    /// A cell sits on a non-teaching or undefined period.
    NonTeachingSlot,
    /// A cell holds a code that is unavailable on the cell's day.
    /// Reported by [`unavailable_occupants`], never by `validate_input`.
    UnavailableOccupant,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the shape of the week.
///
/// Checks:
/// 1. No day appears twice
/// 2. No teaching period number appears twice within a day
/// 3. No two periods of a day overlap in time
/// 4. No section appears twice
pub fn validate_structure(structure: &TimetableStructure) -> ValidationResult {
    finish(structure_errors(structure))
}

fn structure_errors(structure: &TimetableStructure) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut days = HashSet::new();
    for plan in &structure.days {
        if !days.insert(plan.day) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate day: {}", plan.day),
            ));
        }

        let mut numbers = HashSet::new();
        for number in plan.teaching_numbers() {
            if !numbers.insert(number) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate period number {} on {}", number, plan.day),
                ));
            }
        }

        for (i, a) in plan.periods.iter().enumerate() {
            for b in &plan.periods[i + 1..] {
                if a.time.overlaps(&b.time) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::OverlappingPeriods,
                        format!("Periods {} and {} overlap on {}", a.time, b.time, plan.day),
                    ));
                }
            }
        }
    }

    let mut sections = HashSet::new();
    for section in &structure.sections {
        if !sections.insert(section) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate section: {section}"),
            ));
        }
    }

    errors
}

/// Validates raw roster records before they are indexed.
///
/// Checks:
/// 1. No duplicate codes
/// 2. Code, teacher name and subject are non-empty
/// 3. Every quota names a section of the deployment
pub fn validate_records(
    records: &[AssignmentRecord],
    structure: &TimetableStructure,
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut codes = HashSet::new();

    for record in records {
        if !codes.insert(record.code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate assignment code: {}", record.code),
            ));
        }
        for (field, value) in [
            ("code", &record.code),
            ("teacher name", &record.teacher_name),
            ("subject", &record.subject),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptyField,
                    format!("Assignment '{}' has an empty {field}", record.code),
                ));
            }
        }
        for section in record.quota.keys() {
            if !structure.has_section(section) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSection,
                    format!(
                        "Assignment '{}' has a quota for unknown section '{section}'",
                        record.code
                    ),
                ));
            }
        }
    }

    finish(errors)
}

/// Validates a complete snapshot.
///
/// Runs the structure and record checks, then:
/// 1. Every unavailability entry names a roster code
/// 2. Every cell names a deployment section and a teaching period
/// 3. Every cell holds a roster code
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    structure: &TimetableStructure,
    roster: &Roster,
    unavailability: &UnavailabilitySet,
    schedule: &ScheduleMap,
) -> ValidationResult {
    let mut errors = structure_errors(structure);

    let records: Vec<AssignmentRecord> = roster.records().cloned().collect();
    if let Err(mut record_errors) = validate_records(&records, structure) {
        errors.append(&mut record_errors);
    }

    for code in unavailability.codes() {
        if !roster.contains(code) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCode,
                format!("Unavailability listed for unknown code '{code}'"),
            ));
        }
    }

    for (key, code) in schedule.iter() {
        if !structure.has_section(&key.section) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSection,
                format!("Cell {key} names unknown section"),
            ));
        }
        if !structure.is_teaching(key.day, key.period) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonTeachingSlot,
                format!("Cell {key} is not a teaching period"),
            ));
        }
        if !roster.contains(code) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCode,
                format!("Cell {key} holds unknown code '{code}'"),
            ));
        }
    }

    finish(errors)
}

/// Cells holding a code that is unavailable on the cell's day.
///
/// Such cells are left in place; only new selections are prevented.
/// The result is an anomaly list for display, in key order.
pub fn unavailable_occupants(
    unavailability: &UnavailabilitySet,
    schedule: &ScheduleMap,
) -> Vec<ValidationError> {
    schedule
        .iter()
        .filter(|(key, code)| unavailability.is_unavailable(code, key.day))
        .map(|(key, code)| {
            ValidationError::new(
                ValidationErrorKind::UnavailableOccupant,
                format!("Cell {key} holds '{code}', which is unavailable on {}", key.day),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, DayPlan, Period, Section, SlotKey, TimeRange};

    fn vii_a() -> Section {
        Section::new("VII", "A")
    }

    fn sample_structure() -> TimetableStructure {
        TimetableStructure::new()
            .with_day(
                DayPlan::new(Day::Monday)
                    .with_period(Period::activity("Ceremony", TimeRange::hm((7, 0), (7, 30))))
                    .with_period(Period::teaching(1, TimeRange::hm((7, 30), (8, 10))))
                    .with_period(Period::teaching(2, TimeRange::hm((8, 10), (8, 50)))),
            )
            .with_section(vii_a())
    }

    fn sample_roster() -> Roster {
        Roster::from_records(vec![
            AssignmentRecord::new("M1", "Teacher X", "Math").with_quota(vii_a(), 2),
        ])
        .unwrap()
    }

    fn has_kind(errors: &[ValidationError], kind: ValidationErrorKind) -> bool {
        errors.iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_input() {
        let mut schedule = ScheduleMap::new();
        schedule.assign(SlotKey::new(Day::Monday, 1, vii_a()), "M1");
        assert!(validate_input(
            &sample_structure(),
            &sample_roster(),
            &UnavailabilitySet::new(),
            &schedule
        )
        .is_ok());
    }

    #[test]
    fn test_duplicate_period_number_and_overlap() {
        let s = TimetableStructure::new().with_day(
            DayPlan::new(Day::Monday)
                .with_period(Period::teaching(1, TimeRange::hm((7, 0), (7, 40))))
                .with_period(Period::teaching(1, TimeRange::hm((7, 30), (8, 10)))),
        );
        let errors = validate_structure(&s).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::DuplicateId));
        assert!(has_kind(&errors, ValidationErrorKind::OverlappingPeriods));
    }

    #[test]
    fn test_duplicate_day_and_section() {
        let s = TimetableStructure::new()
            .with_day(DayPlan::new(Day::Monday))
            .with_day(DayPlan::new(Day::Monday))
            .with_section(vii_a())
            .with_section(vii_a());
        let errors = validate_structure(&s).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_records_checks() {
        let records = vec![
            AssignmentRecord::new("M1", "Teacher X", "Math"),
            AssignmentRecord::new("M1", "", "Math").with_quota(Section::new("IX", "Z"), 1),
        ];
        let errors = validate_records(&records, &sample_structure()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::DuplicateId));
        assert!(has_kind(&errors, ValidationErrorKind::EmptyField));
        assert!(has_kind(&errors, ValidationErrorKind::UnknownSection));
    }

    #[test]
    fn test_bad_cells() {
        let mut schedule = ScheduleMap::new();
        schedule.assign(SlotKey::new(Day::Monday, 7, vii_a()), "M1");
        schedule.assign(SlotKey::new(Day::Monday, 1, Section::new("IX", "A")), "M1");
        schedule.assign(SlotKey::new(Day::Monday, 2, vii_a()), "GONE");

        let errors = validate_input(
            &sample_structure(),
            &sample_roster(),
            &UnavailabilitySet::new(),
            &schedule,
        )
        .unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::NonTeachingSlot));
        assert!(has_kind(&errors, ValidationErrorKind::UnknownSection));
        assert!(has_kind(&errors, ValidationErrorKind::UnknownCode));
    }

    #[test]
    fn test_unavailable_occupant_is_anomaly_not_error() {
        let mut schedule = ScheduleMap::new();
        schedule.assign(SlotKey::new(Day::Monday, 1, vii_a()), "M1");
        schedule.assign(SlotKey::new(Day::Monday, 2, vii_a()), "M1");
        let blocked = UnavailabilitySet::new().with_blocked("M1", Day::Monday);

        assert!(validate_input(&sample_structure(), &sample_roster(), &blocked, &schedule).is_ok());

        let anomalies = unavailable_occupants(&blocked, &schedule);
        assert_eq!(anomalies.len(), 2);
        assert!(anomalies
            .iter()
            .all(|e| e.kind == ValidationErrorKind::UnavailableOccupant));
        assert!(unavailable_occupants(&UnavailabilitySet::new(), &schedule).is_empty());
    }

    #[test]
    fn test_unavailability_for_unknown_code() {
        let blocked = UnavailabilitySet::new().with_blocked("NOPE", Day::Friday);
        let errors = validate_input(
            &sample_structure(),
            &sample_roster(),
            &blocked,
            &ScheduleMap::new(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(has_kind(&errors, ValidationErrorKind::UnknownCode));
    }
}
