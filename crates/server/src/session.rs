// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! This module provides an Axum extractor that validates bearer session
//! tokens at the server boundary.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use canteen_api::{AuthError, AuthenticatedActor, AuthenticationService};
use tracing::{debug, error, warn};

use crate::{AppState, ErrorResponse};

/// Extractor for signed-in users.
///
/// Carries the resolved actor and the bearer token it was resolved from.
///
/// # Authentication Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Validate the session via `AuthenticationService::validate_session`
///    (expiry, account, then profile with allow-list fallback)
/// 3. Return the `AuthenticatedActor` and the token
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if the header is missing or malformed, or
/// the session is unknown or expired. Returns HTTP 500 if the session store
/// fails.
pub struct SessionUser(pub AuthenticatedActor, pub String);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token: &str = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                warn!("Authorization header does not carry a bearer token");
                SessionError::InvalidAuthorizationHeader
            })?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor =
            AuthenticationService::validate_session(&mut persistence, token, &state.admin_emails)
                .map_err(|e| match e {
                    AuthError::Internal { message } => {
                        error!(error = %message, "Session store failure");
                        SessionError::Internal
                    }
                    other => {
                        warn!(error = %other, "Session validation failed");
                        SessionError::InvalidSession(other.to_string())
                    }
                })?;
        drop(persistence);

        debug!(user_id = %actor.user_id, role = %actor.role, "Session validated");

        Ok(Self(actor, String::from(token)))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
    /// The session store failed; details are logged, not returned.
    Internal,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            Self::MissingAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Missing Authorization header"),
            ),
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Invalid Authorization header format. Expected: 'Bearer <token>'"),
            ),
            Self::InvalidSession(reason) => (StatusCode::UNAUTHORIZED, reason),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("Internal server error"),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: true,
                message,
            }),
        )
            .into_response()
    }
}
