//! Tag assignments and attendance entries

use super::OwnerId;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw identifier read off a physical tag, whitespace-trimmed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    /// Normalize a scanner reading; blank readings are no tag
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Normalize operator input, rejecting blanks as a validation error
    pub fn parse(raw: &str) -> Result<Self> {
        Self::normalize(raw).ok_or_else(|| Error::Validation("tag id must not be empty".to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of person a tag is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    /// Roster member; `person_id` references a `TeamMember`
    Staff,
    /// Ad-hoc entrant; `person_id` is the tag id itself
    Audience,
}

impl PersonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonType::Staff => "staff",
            PersonType::Audience => "audience",
        }
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "staff" => Ok(PersonType::Staff),
            "audience" => Ok(PersonType::Audience),
            other => Err(Error::Validation(format!(
                "person type must be 'staff' or 'audience', got '{}'",
                other
            ))),
        }
    }
}

/// Binding of one physical tag to one person, keyed by the tag id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagAssignment {
    pub tag_id: TagId,
    pub person_type: PersonType,
    pub person_id: String,
    pub person_name: String,
    pub person_email: String,
    pub person_phone: String,
    pub owner_id: OwnerId,
}

/// One resolved tap-in held in the live session feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub tag_id: TagId,
    pub person_name: String,
    pub person_email: String,
    pub person_phone: String,
    pub person_type: PersonType,
    pub timestamp: DateTime<Utc>,
}

impl AttendanceEntry {
    pub fn from_assignment(assignment: &TagAssignment, timestamp: DateTime<Utc>) -> Self {
        Self {
            tag_id: assignment.tag_id.clone(),
            person_name: assignment.person_name.clone(),
            person_email: assignment.person_email.clone(),
            person_phone: assignment.person_phone.clone(),
            person_type: assignment.person_type,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(TagId::normalize(" A1\n").unwrap().as_str(), "A1");
        assert!(TagId::normalize(" \t").is_none());
        assert!(matches!(TagId::parse(""), Err(Error::Validation(_))));
    }

    #[test]
    fn test_person_type_rejects_other_values() {
        assert_eq!("staff".parse::<PersonType>().unwrap(), PersonType::Staff);
        assert_eq!("audience".parse::<PersonType>().unwrap(), PersonType::Audience);
        assert!(matches!("vip".parse::<PersonType>(), Err(Error::Validation(_))));
    }
}
