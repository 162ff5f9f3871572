//! # Authentication
//!
//! Bearer session authentication for protected endpoints. Tokens are minted
//! at login by [`crate::repositories::SessionRepository`] and presented as
//! `Authorization: Bearer <token>`; the extractors here resolve the token to
//! its account row on every request.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::{ApiError, authentication_failed, authentication_failed_with_trace_id};
use crate::models::user;
use crate::repositories::SessionRepository;
use crate::server::AppState;
use crate::telemetry::TraceContext;

/// A resolved session: the presented token plus the account it belongs to.
///
/// Used by logout, which needs the token itself to delete the row.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: String,
    pub user: user::Model,
}

/// The authenticated account behind the request.
///
/// Rejects with `AUTHENTICATION_FAILED` when the header is missing, malformed
/// or carries an unknown token. Role checks stay in the handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

/// Extract the bearer token from request headers
pub fn extract_bearer_token<'h>(
    headers: &'h HeaderMap,
    trace_id: Option<&str>,
) -> Result<&'h str, ApiError> {
    let reject = |message: &str| match trace_id {
        Some(id) => authentication_failed_with_trace_id(Some(message), id.to_string()),
        None => authentication_failed(Some(message)),
    };

    headers
        .get(AUTHORIZATION)
        .ok_or_else(|| reject("Missing Authorization header"))
        .and_then(|value| {
            value
                .to_str()
                .map_err(|_| reject("Invalid Authorization header"))
        })
        .and_then(|header| {
            header
                .strip_prefix("Bearer ")
                .ok_or_else(|| reject("Authorization header must use Bearer scheme"))
        })
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let trace_id = parts
            .extensions
            .get::<TraceContext>()
            .map(|ctx| ctx.trace_id.clone());

        let token = extract_bearer_token(&parts.headers, trace_id.as_deref())?;

        let user = SessionRepository::new(&state.db)
            .resolve(token)
            .await?
            .ok_or_else(|| match trace_id {
                Some(id) => {
                    authentication_failed_with_trace_id(Some("Invalid or expired session"), id)
                }
                None => authentication_failed(Some("Invalid or expired session")),
            })?;

        tracing::debug!(user_id = %user.id, role = ?user.role, "Authenticated request");

        Ok(CurrentSession {
            token: token.to_string(),
            user,
        })
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = CurrentSession::from_request_parts(parts, state).await?;
        Ok(CurrentUser(session.user))
    }
}
