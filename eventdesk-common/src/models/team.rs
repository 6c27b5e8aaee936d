//! Team roster

use super::{require_text, OwnerId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Dashboard access level of a team member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Admin,
    Manager,
    User,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Admin => "admin",
            AccessLevel::Manager => "manager",
            AccessLevel::User => "user",
        }
    }
}

impl FromStr for AccessLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(AccessLevel::Admin),
            "manager" => Ok(AccessLevel::Manager),
            "user" => Ok(AccessLevel::User),
            other => Err(Error::Validation(format!("unknown access level: {}", other))),
        }
    }
}

/// Staff member on the roster
///
/// No uniqueness constraint on name or email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub phone: String,
    pub email: String,
    pub access: AccessLevel,
    /// Role such as "Bartenders" or "Security" (open set)
    pub position: String,
    pub owner_id: OwnerId,
}

impl TeamMember {
    /// Case-insensitive substring match over the searchable text fields
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.position.as_str(),
            self.access.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Form payload for creating or editing a member
#[derive(Debug, Clone, Deserialize)]
pub struct MemberDraft {
    pub name: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_access")]
    pub access: String,
    #[serde(default = "default_position")]
    pub position: String,
}

fn default_access() -> String {
    "user".to_string()
}

fn default_position() -> String {
    "Bartenders".to_string()
}

impl MemberDraft {
    /// Validate and return the parsed access level
    pub fn validate(&self) -> Result<AccessLevel> {
        require_text("name", &self.name)?;
        require_text("position", &self.position)?;
        self.access.parse::<AccessLevel>()
    }
}
