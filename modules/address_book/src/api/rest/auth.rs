use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use problem_details::{internal_error, ProblemResponse};

use crate::api::rest::error::UNAUTHENTICATED;
use crate::contract::model::OwnerId;
use crate::domain::ports::Authenticator;

/// Owner of the request, resolved from `Authorization: Bearer <jwt>`.
///
/// Requires an `Extension<Arc<dyn Authenticator>>` on the router.
#[derive(Debug, Clone, Copy)]
pub struct CurrentOwner(pub OwnerId);

impl<S> FromRequestParts<S> for CurrentOwner
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(authenticator) = parts.extensions.get::<Arc<dyn Authenticator>>().cloned()
        else {
            tracing::error!("No authenticator installed on the router");
            return Err(internal_error("Authentication is not configured"));
        };

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                UNAUTHENTICATED.to_response("Not authenticated", parts.uri.path())
            })?;

        authenticator
            .authenticate(token)
            .map(CurrentOwner)
            .map_err(|e| {
                tracing::debug!(error = %e, "Bearer token rejected");
                UNAUTHENTICATED.to_response("Could not validate credentials", parts.uri.path())
            })
    }
}
