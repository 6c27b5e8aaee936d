//! Owner extraction
//!
//! Every `/api` handler takes a `CurrentOwner`; requests the identity gate
//! cannot attribute to an owner are rejected with 401 before the handler runs.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use eventdesk_common::models::owner::require_owner;
use eventdesk_common::OwnerId;

use crate::error::ApiError;
use crate::AppState;

/// The authenticated owner of the request
#[derive(Debug, Clone)]
pub struct CurrentOwner(pub OwnerId);

#[async_trait]
impl FromRequestParts<AppState> for CurrentOwner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let owner = require_owner(state.identity.current_owner(&parts.headers))?;
        Ok(CurrentOwner(owner))
    }
}
