//! School configuration loading.
//!
//! A [`SchoolConfig`] is the serialised form of one complete snapshot:
//! the week's shape, the sections, the roster, unavailability and
//! (optionally) the current schedule. The caller supplies the text or
//! reader; this module does not open files.
//!
//! ```
//! use u_timetable::config::SchoolConfig;
//!
//! let json = r#"{
//!   "days": [{ "day": "Monday", "periods": [
//!     { "kind": "activity", "label": "Ceremony", "time": { "start": "07:00", "end": "07:30" } },
//!     { "kind": "teaching", "number": 1, "time": { "start": "07:30", "end": "08:10" } }
//!   ]}],
//!   "sections": ["VII A"],
//!   "roster": [{ "code": "M1", "teacherName": "Teacher X", "subject": "Math", "quota": { "VII A": 2 } }]
//! }"#;
//!
//! let engine = SchoolConfig::from_json_str(json).unwrap().into_engine().unwrap();
//! assert_eq!(engine.roster().len(), 1);
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::engine::TimetableEngine;
use crate::error::{Result, TimetableError};
use crate::models::{
    AssignmentRecord, DayPlan, Roster, ScheduleEntry, ScheduleMap, Section, TimetableStructure,
    UnavailabilitySet,
};
use crate::validation::{
    unavailable_occupants, validate_input, validate_records, ValidationError,
};

/// Serialised snapshot of a school's timetable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolConfig {
    /// Days in week order, each with ordered periods.
    pub days: Vec<DayPlan>,
    /// Sections of the deployment.
    pub sections: Vec<Section>,
    /// Assignment records.
    #[serde(default)]
    pub roster: Vec<AssignmentRecord>,
    /// Code → blocked days.
    #[serde(default)]
    pub unavailability: UnavailabilitySet,
    /// Occupied cells.
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
}

impl SchoolConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses JSON from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialises to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The week's shape described by this config.
    pub fn structure(&self) -> TimetableStructure {
        TimetableStructure {
            days: self.days.clone(),
            sections: self.sections.clone(),
        }
    }

    /// Captures an engine's current state.
    pub fn from_engine(engine: &TimetableEngine) -> Self {
        let structure = engine.structure();
        Self {
            days: structure.days.clone(),
            sections: structure.sections.clone(),
            roster: engine.roster().records().cloned().collect(),
            unavailability: engine.unavailability().clone(),
            schedule: engine.schedule().clone().into(),
        }
    }

    /// Validates the snapshot and builds an engine from it.
    ///
    /// Cells holding a code now unavailable on their day are kept and
    /// logged; they do not reject the snapshot.
    ///
    /// # Errors
    /// `Config` listing every validation issue found.
    pub fn into_engine(self) -> Result<TimetableEngine> {
        let structure = self.structure();

        if let Err(errors) = validate_records(&self.roster, &structure) {
            return Err(rejected(errors));
        }
        let roster = Roster::from_records(self.roster)?;
        let schedule = ScheduleMap::from(self.schedule);

        validate_input(&structure, &roster, &self.unavailability, &schedule)
            .map_err(rejected)?;
        for anomaly in unavailable_occupants(&self.unavailability, &schedule) {
            warn!("{}", anomaly.message);
        }

        debug!(
            "loaded timetable: {} days, {} sections, {} records, {} cells",
            structure.days.len(),
            structure.sections.len(),
            roster.len(),
            schedule.len()
        );
        Ok(TimetableEngine::new(structure, roster, self.unavailability).with_schedule(schedule))
    }
}

fn rejected(errors: Vec<ValidationError>) -> TimetableError {
    for e in &errors {
        warn!("config rejected: {e}");
    }
    let messages: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
    TimetableError::Config(messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, SlotKey};

    const SAMPLE: &str = r#"{
        "days": [
            { "day": "Monday", "periods": [
                { "kind": "activity", "label": "Flag ceremony", "time": { "start": "07:00", "end": "07:40" } },
                { "kind": "teaching", "number": 1, "time": { "start": "07:40", "end": "08:20" } },
                { "kind": "teaching", "number": 2, "time": { "start": "08:20", "end": "09:00" } }
            ]},
            { "day": "Tuesday", "periods": [
                { "kind": "teaching", "number": 1, "time": { "start": "07:00", "end": "07:40" } }
            ]}
        ],
        "sections": ["VII A", "VII B"],
        "roster": [
            { "code": "M1", "teacherName": "Teacher X", "subject": "Math", "quota": { "VII A": 2, "VII B": 2 } },
            { "code": "B1", "teacherName": "Teacher Y", "subject": "Biology", "quota": { "VII A": 1 } }
        ],
        "unavailability": { "B1": ["Tuesday"] },
        "schedule": [
            { "day": "Monday", "period": 1, "section": "VII A", "code": "M1" }
        ]
    }"#;

    #[test]
    fn test_load_sample() {
        let engine = SchoolConfig::from_json_str(SAMPLE)
            .unwrap()
            .into_engine()
            .unwrap();
        assert_eq!(engine.structure().days.len(), 2);
        assert_eq!(engine.roster().len(), 2);
        assert!(engine.unavailability().is_unavailable("B1", Day::Tuesday));
        assert_eq!(
            engine
                .schedule()
                .get(&SlotKey::new(Day::Monday, 1, Section::new("VII", "A"))),
            Some("M1")
        );
        assert_eq!(engine.remaining("M1", &Section::new("VII", "A")), 1);
    }

    #[test]
    fn test_from_reader() {
        let config = SchoolConfig::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(config.sections.len(), 2);
    }

    #[test]
    fn test_export_and_reload() {
        let engine = SchoolConfig::from_json_str(SAMPLE)
            .unwrap()
            .into_engine()
            .unwrap();
        let json = SchoolConfig::from_engine(&engine).to_json_string().unwrap();
        let again = SchoolConfig::from_json_str(&json).unwrap();
        assert_eq!(again, SchoolConfig::from_engine(&engine));
    }

    #[test]
    fn test_unavailable_occupant_survives_reload() {
        let mut engine = SchoolConfig::from_json_str(SAMPLE)
            .unwrap()
            .into_engine()
            .unwrap();
        engine.unavailability_mut().block("M1", Day::Monday);

        let json = SchoolConfig::from_engine(&engine).to_json_string().unwrap();
        let reloaded = SchoolConfig::from_json_str(&json)
            .unwrap()
            .into_engine()
            .unwrap();

        let cell = SlotKey::new(Day::Monday, 1, Section::new("VII", "A"));
        assert_eq!(reloaded.schedule().get(&cell), Some("M1"));
        assert_eq!(reloaded.unavailable_occupants().len(), 1);
        // kept in place, still selectable in its own cell
        let list = reloaded.candidates(&cell).unwrap();
        assert!(list.get("M1").unwrap().is_selectable());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = SchoolConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TimetableError::Config(_)));

        let bad_section = SAMPLE.replace("\"VII B\"]", "\"VIIB\"]");
        assert!(SchoolConfig::from_json_str(&bad_section).is_err());
    }

    #[test]
    fn test_invalid_snapshot_rejected() {
        let dangling = SAMPLE.replace(
            r#""section": "VII A", "code": "M1""#,
            r#""section": "VII A", "code": "ZZ""#,
        );
        let err = SchoolConfig::from_json_str(&dangling)
            .unwrap()
            .into_engine()
            .unwrap_err();
        assert!(matches!(err, TimetableError::Config(msg) if msg.contains("ZZ")));
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        let dup = SAMPLE.replace(r#""code": "B1""#, r#""code": "M1""#);
        let err = SchoolConfig::from_json_str(&dup)
            .unwrap()
            .into_engine()
            .unwrap_err();
        assert!(matches!(err, TimetableError::Config(msg) if msg.contains("Duplicate")));
    }
}
