//! Error types.
//!
//! Only data-integrity failures and refused writes are errors. Empty
//! candidate lists and negative remaining hours are ordinary results.

use thiserror::Error;

use crate::models::{Day, Section, SlotKey};
use crate::resolver::ExclusionReason;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised by the timetable engine.
#[derive(Error, Debug)]
pub enum TimetableError {
    /// A roster lookup for a code that is not in the roster.
    #[error("unknown assignment code: {0}")]
    UnknownCode(String),

    /// A schedule cell references a code absent from the roster.
    #[error("cell {key} references unknown assignment code '{code}'")]
    DanglingCode { key: SlotKey, code: String },

    /// Two roster records share a code.
    #[error("duplicate assignment code: {0}")]
    DuplicateCode(String),

    /// The section is not part of this deployment.
    #[error("unknown section: {0}")]
    UnknownSection(Section),

    /// The period is a ceremony/break or not defined for that day.
    #[error("{day} period {period} is not a teaching period")]
    NotTeachingPeriod { day: Day, period: u8 },

    /// A validated write was refused by the candidate resolver.
    #[error("code '{code}' cannot be selected for {key}: {reason}")]
    NotSelectable {
        key: SlotKey,
        code: String,
        reason: ExclusionReason,
    },

    /// A section label could not be parsed.
    #[error("invalid section label: '{0}'")]
    InvalidSection(String),

    /// Configuration could not be parsed or failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for TimetableError {
    fn from(err: serde_json::Error) -> Self {
        TimetableError::Config(err.to_string())
    }
}
