// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth authentication routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::SessionJar;
use crate::routes::{
    error_page_url, first_value, found, DASHBOARD_PATH, LOGIN_PATH, REFRESH_PATH,
};
use crate::services::RefreshOutcome;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(LOGIN_PATH, get(login))
        .route("/callback", get(callback))
        .route("/logout", get(logout))
        .route(REFRESH_PATH, get(refresh_token))
}

/// Start OAuth flow - redirect to Strava authorization.
async fn login(State(state): State<Arc<AppState>>) -> Response {
    let auth_url = state
        .strava
        .client()
        .authorize_url(&state.config.callback_url());

    tracing::info!(
        client_id = %state.config.strava_client_id,
        "Starting OAuth flow, redirecting to Strava"
    );

    found(&auth_url)
}

/// OAuth callback - exchange code for tokens, create session.
///
/// A successful login always gets a fresh session id; any session the
/// browser carried before is dropped.
async fn callback(
    State(state): State<Arc<AppState>>,
    jar: SessionJar,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response> {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Malformed OAuth callback query");
            return Ok(found(&error_page_url(&rejection.body_text())));
        }
    };

    // The user declined (or Strava refused); no exchange is attempted.
    if let Some(error) = first_value(&params, "error") {
        tracing::warn!(error = %error, "OAuth error from Strava");
        return Err(AppError::ProviderDenied(error.to_string()));
    }

    tracing::info!("Exchanging authorization code for tokens");

    let code = first_value(&params, "code").unwrap_or_default();
    let previous_id = jar.session_id();
    let (jar, session_id) = jar.issue_session_id()?;

    match state.strava.handle_oauth_callback(&session_id, code).await {
        Ok(_) => {
            if let Some(previous_id) = previous_id {
                state.sessions.clear(&previous_id);
            }
            Ok((jar, found(DASHBOARD_PATH)).into_response())
        }
        Err(AppError::Upstream(msg)) => {
            tracing::warn!(error = %msg, "Token exchange failed");
            Ok(found(&error_page_url(&msg)))
        }
        Err(e) => Err(e),
    }
}

/// Logout - drop the server-side session and its cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: SessionJar) -> impl IntoResponse {
    if let Some(session_id) = jar.session_id() {
        if state.sessions.clear(&session_id) {
            tracing::info!("Session cleared on logout");
        }
    }

    (jar.remove(), found(DASHBOARD_PATH))
}

/// Response for a token refresh attempt.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Refresh the session's access token.
///
/// The request that was bounced here because of an expired token is not
/// replayed; the client re-issues it.
async fn refresh_token(State(state): State<Arc<AppState>>, jar: SessionJar) -> Result<Response> {
    let Some(session_id) = jar.session_id() else {
        return Ok(found(LOGIN_PATH));
    };

    match state.strava.refresh_session(&session_id).await {
        Ok(RefreshOutcome::Refreshed { .. }) => Ok(Json(RefreshResponse {
            success: true,
            error: None,
        })
        .into_response()),
        Ok(RefreshOutcome::NoSession) => Ok(found(LOGIN_PATH)),
        Err(AppError::Upstream(msg)) => {
            tracing::warn!(error = %msg, "Token refresh failed, keeping stale tokens");
            Ok(Json(RefreshResponse {
                success: false,
                error: Some(msg),
            })
            .into_response())
        }
        Err(e) => Err(e),
    }
}
