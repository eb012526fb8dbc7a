//! Weekly school timetable engine for the U-Engine ecosystem.
//!
//! Assigns teacher/subject codes to fixed weekly slots of a
//! multi-grade, multi-section school while preventing double-booking,
//! honouring per-section hour quotas and day-level unavailability.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `TimetableStructure`, `Section`,
//!   `AssignmentRecord`, `Roster`, `ScheduleMap`, `UnavailabilitySet`
//! - **`usage`**: Scheduled hours against quotas, per (code, section)
//! - **`resolver`**: Legal candidates for a cell, with tagged reasons
//! - **`conflict`**: Per-day cross-section and same-section conflicts
//! - **`validation`**: Input integrity checks
//! - **`config`**: JSON snapshot loading
//! - **`engine`**: Single-writer facade tying it together
//! - **`interfaces`**: Holiday lookup and schedule storage traits
//!
//! # Architecture
//!
//! Reads flow one way: roster + schedule → usage → resolver / conflict
//! detector. The only mutation is a single-cell schedule write, after
//! which every derived view is recomputed from a full scan. The grid is
//! small (days × periods × sections), so no incremental bookkeeping is
//! kept. The engine performs no I/O and has no internal locking; a
//! cloned engine is an isolated snapshot for concurrent readers.

pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod interfaces;
pub mod models;
pub mod resolver;
pub mod usage;
pub mod validation;

pub use engine::TimetableEngine;
pub use error::{Result, TimetableError};
