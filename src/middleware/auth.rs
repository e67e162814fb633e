// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware for the Strava passthrough routes.

use crate::error::AuthError;
use crate::middleware::session::SessionJar;
use crate::models::Session;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Decide whether a request may reach Strava with the given session.
///
/// An expired token is never used; the caller is sent to the refresh flow and
/// has to re-issue the original request afterwards.
pub fn authorize(session: Option<Session>, now: i64) -> Result<Session, AuthError> {
    let session = session.ok_or(AuthError::Unauthenticated)?;
    if session.is_expired_at(now) {
        return Err(AuthError::TokenExpired);
    }
    Ok(session)
}

/// Middleware that requires a live session.
///
/// On success the [`Session`] is available to handlers as `Extension<Session>`.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: SessionJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let session = jar.session_id().and_then(|id| state.sessions.get(&id));

    let session = authorize(session, chrono::Utc::now().timestamp()).inspect_err(|err| {
        tracing::debug!(error = %err, path = %request.uri().path(), "Request rejected by auth guard");
    })?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenGrant;

    fn session(expires_at: i64) -> Session {
        Session::new(
            TokenGrant {
                access_token: "abc".to_string(),
                refresh_token: "def".to_string(),
                expires_at,
            },
            serde_json::json!({}),
        )
    }

    #[test]
    fn test_no_session_is_unauthenticated() {
        assert_eq!(authorize(None, 100), Err(AuthError::Unauthenticated));
    }

    #[test]
    fn test_expired_session() {
        assert_eq!(
            authorize(Some(session(99)), 100),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn test_live_session_passes() {
        let ok = authorize(Some(session(100)), 100).unwrap();
        assert_eq!(ok.access_token, "abc");
    }
}
