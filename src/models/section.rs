//! Section (grade + letter cohort) model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TimetableError;

/// A grade-letter cohort receiving instruction, e.g. `VIII B`.
///
/// Serialised as its label (`"VIII B"`) so it can key JSON maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Section {
    /// Grade, e.g. `"VII"`.
    pub grade: String,
    /// Letter within the grade, e.g. `"A"`.
    pub letter: String,
}

impl Section {
    /// Creates a section.
    pub fn new(grade: impl Into<String>, letter: impl Into<String>) -> Self {
        Self {
            grade: grade.into(),
            letter: letter.into(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.grade, self.letter)
    }
}

impl FromStr for Section {
    type Err = TimetableError;

    /// Parses `"VII A"` or `"VII-A"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (grade, letter) = trimmed
            .split_once(|c: char| c == ' ' || c == '-')
            .ok_or_else(|| TimetableError::InvalidSection(s.to_string()))?;
        let (grade, letter) = (grade.trim(), letter.trim());
        if grade.is_empty() || letter.is_empty() || letter.contains(char::is_whitespace) {
            return Err(TimetableError::InvalidSection(s.to_string()));
        }
        Ok(Section::new(grade, letter))
    }
}

impl TryFrom<String> for Section {
    type Error = TimetableError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Section> for String {
    fn from(section: Section) -> Self {
        section.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let s: Section = "VIII B".parse().unwrap();
        assert_eq!(s, Section::new("VIII", "B"));
        assert_eq!(s.to_string(), "VIII B");

        let dashed: Section = "IX-C".parse().unwrap();
        assert_eq!(dashed, Section::new("IX", "C"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("VIIA".parse::<Section>().is_err());
        assert!(" A".parse::<Section>().is_err());
        assert!("VII ".parse::<Section>().is_err());
        assert!("VII A B".parse::<Section>().is_err());
    }

    #[test]
    fn test_ordering_groups_by_grade() {
        let mut v = vec![
            Section::new("VIII", "A"),
            Section::new("VII", "B"),
            Section::new("VII", "A"),
        ];
        v.sort();
        assert_eq!(v[0], Section::new("VII", "A"));
        assert_eq!(v[1], Section::new("VII", "B"));
    }

    #[test]
    fn test_serde_as_label() {
        let s = Section::new("VII", "A");
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"VII A\"");
        let back: Section = serde_json::from_str("\"VII A\"").unwrap();
        assert_eq!(back, s);
        assert!(serde_json::from_str::<Section>("\"VIIA\"").is_err());
    }
}
