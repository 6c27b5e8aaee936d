//! Identity gate
//!
//! Authentication itself happens upstream. The fronting proxy forwards the
//! identity provider's stable user id in `x-owner-id`; the gate only decides
//! whether to trust it.

use axum::http::{header, HeaderMap};
use eventdesk_common::OwnerId;

/// Header carrying the authenticated owner's id
pub const OWNER_HEADER: &str = "x-owner-id";

/// Supplies the owner on whose behalf a request runs
pub trait IdentityGate: Send + Sync {
    fn current_owner(&self, headers: &HeaderMap) -> Option<OwnerId>;
}

/// Trusts `x-owner-id`, optionally behind a shared bearer token
#[derive(Debug, Clone, Default)]
pub struct HeaderIdentityGate {
    api_token: Option<String>,
}

impl HeaderIdentityGate {
    pub fn new(api_token: Option<String>) -> Self {
        Self {
            api_token: api_token.filter(|t| !t.trim().is_empty()),
        }
    }

    fn token_accepted(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.api_token else {
            return true;
        };

        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|presented| presented.trim() == expected)
            .unwrap_or(false)
    }
}

impl IdentityGate for HeaderIdentityGate {
    fn current_owner(&self, headers: &HeaderMap) -> Option<OwnerId> {
        if !self.token_accepted(headers) {
            return None;
        }

        headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(OwnerId::parse)
    }
}
