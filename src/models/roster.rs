//! Roster and quota model.
//!
//! An [`AssignmentRecord`] pairs one teacher with one subject under a
//! unique code, and states how many weekly hours that pairing owes each
//! section. A quota of zero means "not offered to that section".
//!
//! The [`Roster`] is the read-mostly lookup over all records. It is
//! edited by an administrative collaborator; every derived view is
//! recomputed from scratch afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Section;
use crate::error::{Result, TimetableError};

/// One (teacher, subject) pairing with its per-section quotas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    /// Globally unique code. Foreign key for the schedule map.
    pub code: String,
    /// Teacher identity. Conflicts are detected on this name.
    pub teacher_name: String,
    /// Subject taught under this code.
    pub subject: String,
    /// Hours owed per section. Missing entries are zero.
    #[serde(default)]
    pub quota: BTreeMap<Section, u32>,
}

impl AssignmentRecord {
    /// Creates a record with no quotas.
    pub fn new(
        code: impl Into<String>,
        teacher_name: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            teacher_name: teacher_name.into(),
            subject: subject.into(),
            quota: BTreeMap::new(),
        }
    }

    /// Sets the hours owed to a section.
    pub fn with_quota(mut self, section: Section, hours: u32) -> Self {
        self.quota.insert(section, hours);
        self
    }

    /// Hours owed to a section (0 if not offered).
    pub fn quota_for(&self, section: &Section) -> u32 {
        self.quota.get(section).copied().unwrap_or(0)
    }

    /// Whether this record owes any hours to the section.
    #[inline]
    pub fn is_offered_to(&self, section: &Section) -> bool {
        self.quota_for(section) > 0
    }

    /// Total weekly hours across all sections.
    pub fn total_hours(&self) -> u32 {
        self.quota.values().sum()
    }
}

/// All assignment records, keyed and ordered by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AssignmentRecord>", into = "Vec<AssignmentRecord>")]
pub struct Roster {
    records: BTreeMap<String, AssignmentRecord>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster, rejecting duplicate codes.
    pub fn from_records(records: impl IntoIterator<Item = AssignmentRecord>) -> Result<Self> {
        let mut roster = Self::new();
        for record in records {
            if roster.records.contains_key(&record.code) {
                return Err(TimetableError::DuplicateCode(record.code));
            }
            roster.records.insert(record.code.clone(), record);
        }
        Ok(roster)
    }

    /// Adds or replaces a record by code. Returns the replaced record.
    pub fn insert(&mut self, record: AssignmentRecord) -> Option<AssignmentRecord> {
        self.records.insert(record.code.clone(), record)
    }

    /// Removes a record by code.
    ///
    /// Cells still holding the code become dangling references; the
    /// resolver and conflict detector report them as data-integrity errors.
    pub fn remove(&mut self, code: &str) -> Option<AssignmentRecord> {
        self.records.remove(code)
    }

    /// Looks up a record.
    pub fn get(&self, code: &str) -> Option<&AssignmentRecord> {
        self.records.get(code)
    }

    /// Looks up a record, failing on an unknown code.
    pub fn record(&self, code: &str) -> Result<&AssignmentRecord> {
        self.records
            .get(code)
            .ok_or_else(|| TimetableError::UnknownCode(code.to_string()))
    }

    /// Whether the code exists.
    pub fn contains(&self, code: &str) -> bool {
        self.records.contains_key(code)
    }

    /// All records in code order.
    pub fn records(&self) -> impl Iterator<Item = &AssignmentRecord> {
        self.records.values()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records owing hours to a section, in code order.
    pub fn eligible_codes(&self, section: &Section) -> Vec<&AssignmentRecord> {
        self.records
            .values()
            .filter(|r| r.is_offered_to(section))
            .collect()
    }

    /// Teacher behind a code.
    pub fn teacher_of(&self, code: &str) -> Result<&str> {
        self.record(code).map(|r| r.teacher_name.as_str())
    }

    /// Subject behind a code.
    pub fn subject_of(&self, code: &str) -> Result<&str> {
        self.record(code).map(|r| r.subject.as_str())
    }

    /// Hours a code owes a section. Unknown codes owe nothing.
    pub fn quota(&self, code: &str, section: &Section) -> u32 {
        self.records
            .get(code)
            .map(|r| r.quota_for(section))
            .unwrap_or(0)
    }

    /// Codes belonging to one teacher, in code order.
    pub fn codes_of_teacher(&self, teacher_name: &str) -> Vec<&str> {
        self.records
            .values()
            .filter(|r| r.teacher_name == teacher_name)
            .map(|r| r.code.as_str())
            .collect()
    }
}

impl TryFrom<Vec<AssignmentRecord>> for Roster {
    type Error = TimetableError;

    fn try_from(records: Vec<AssignmentRecord>) -> Result<Self> {
        Self::from_records(records)
    }
}

impl From<Roster> for Vec<AssignmentRecord> {
    fn from(roster: Roster) -> Self {
        roster.records.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vii_a() -> Section {
        Section::new("VII", "A")
    }

    fn vii_b() -> Section {
        Section::new("VII", "B")
    }

    fn sample_roster() -> Roster {
        Roster::from_records(vec![
            AssignmentRecord::new("M1", "Teacher X", "Math").with_quota(vii_a(), 2),
            AssignmentRecord::new("B1", "Teacher Y", "Biology")
                .with_quota(vii_a(), 3)
                .with_quota(vii_b(), 0),
            AssignmentRecord::new("P1", "Teacher X", "Physics").with_quota(vii_b(), 4),
        ])
        .unwrap()
    }

    #[test]
    fn test_eligible_codes_ordered_by_code() {
        let r = sample_roster();
        let codes: Vec<&str> = r
            .eligible_codes(&vii_a())
            .iter()
            .map(|a| a.code.as_str())
            .collect();
        assert_eq!(codes, vec!["B1", "M1"]);
    }

    #[test]
    fn test_zero_quota_not_eligible() {
        let r = sample_roster();
        let codes: Vec<&str> = r
            .eligible_codes(&vii_b())
            .iter()
            .map(|a| a.code.as_str())
            .collect();
        assert_eq!(codes, vec!["P1"]);
        assert_eq!(r.quota("B1", &vii_b()), 0);
    }

    #[test]
    fn test_lookups() {
        let r = sample_roster();
        assert_eq!(r.teacher_of("M1").unwrap(), "Teacher X");
        assert_eq!(r.subject_of("P1").unwrap(), "Physics");
        assert_eq!(r.quota("M1", &vii_a()), 2);
        assert_eq!(r.quota("NOPE", &vii_a()), 0);
        assert_eq!(r.codes_of_teacher("Teacher X"), vec!["M1", "P1"]);
    }

    #[test]
    fn test_unknown_code_is_error() {
        let r = sample_roster();
        assert!(matches!(
            r.teacher_of("Z9"),
            Err(TimetableError::UnknownCode(code)) if code == "Z9"
        ));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let err = Roster::from_records(vec![
            AssignmentRecord::new("M1", "A", "Math"),
            AssignmentRecord::new("M1", "B", "Art"),
        ])
        .unwrap_err();
        assert!(matches!(err, TimetableError::DuplicateCode(c) if c == "M1"));
    }

    #[test]
    fn test_insert_replaces_and_remove() {
        let mut r = sample_roster();
        let old = r.insert(AssignmentRecord::new("M1", "Teacher Z", "Math").with_quota(vii_a(), 1));
        assert_eq!(old.unwrap().teacher_name, "Teacher X");
        assert_eq!(r.teacher_of("M1").unwrap(), "Teacher Z");
        assert_eq!(r.quota("M1", &vii_a()), 1);

        assert!(r.remove("M1").is_some());
        assert!(!r.contains("M1"));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn test_total_hours() {
        let r = sample_roster();
        assert_eq!(r.get("B1").unwrap().total_hours(), 3);
    }

    #[test]
    fn test_serde_roundtrip_keeps_quota_labels() {
        let json = r#"[{"code":"M1","teacherName":"Teacher X","subject":"Math","quota":{"VII A":2}}]"#;
        let r: Roster = serde_json::from_str(json).unwrap();
        assert_eq!(r.quota("M1", &vii_a()), 2);

        let dup = r#"[{"code":"M1","teacherName":"A","subject":"x"},{"code":"M1","teacherName":"B","subject":"y"}]"#;
        assert!(serde_json::from_str::<Roster>(dup).is_err());
    }
}
