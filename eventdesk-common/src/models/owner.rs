//! Owner identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of the account that owns a data partition
///
/// Supplied by the external identity provider. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Accept an identity-provider uid; blank input is no owner at all
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Require an active owner, mapping `None` to `AuthRequired`
pub fn require_owner(owner: Option<OwnerId>) -> crate::Result<OwnerId> {
    owner.ok_or(crate::Error::AuthRequired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_rejects_blank() {
        assert_eq!(OwnerId::parse("  uid-1 ").unwrap().as_str(), "uid-1");
        assert!(OwnerId::parse("   ").is_none());
    }

    #[test]
    fn test_require_owner() {
        assert!(matches!(require_owner(None), Err(crate::Error::AuthRequired)));
        let owner = OwnerId::parse("uid-1");
        assert!(require_owner(owner).is_ok());
    }
}
