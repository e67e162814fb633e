// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth and REST client.
//!
//! Handles:
//! - Authorization URL construction
//! - Code-for-token and refresh-token exchanges
//! - Read-only API passthroughs (athlete, activities, stats)
//!
//! Every transport or HTTP failure is turned into [`AppError::Upstream`] right
//! at the call site.

use crate::config::Config;
use crate::db::SessionStore;
use crate::error::AppError;
use crate::models::{Session, TokenGrant};
use crate::routes::first_value;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};

/// Scopes requested at login.
pub const OAUTH_SCOPE: &str = "read,activity:read_all";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials and base URLs from config.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.strava_api_url.clone(),
            oauth_url: config.strava_oauth_url.clone(),
            client_id: config.strava_client_id.clone(),
            client_secret: config.strava_client_secret.clone(),
        }
    }

    /// Provider authorization page the browser is sent to at login.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}",
            self.oauth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(OAUTH_SCOPE),
        )
    }

    // ─── OAuth token endpoint ────────────────────────────────────────────────

    /// Exchange an authorization code for tokens and the athlete profile.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchange, AppError> {
        self.post_token(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    /// Mint a new access token from a refresh token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, AppError> {
        self.post_token(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    async fn post_token<T: DeserializeOwned>(&self, form: &[(&str, &str)]) -> Result<T, AppError> {
        let url = format!("{}/token", self.oauth_url);

        let response = self
            .http
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Strava token request failed");
            return Err(AppError::Upstream(format!("{} for url: {}", status, url)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse token response: {}", e)))
    }

    // ─── REST passthroughs ───────────────────────────────────────────────────

    /// Get the authenticated athlete profile.
    pub async fn get_athlete(&self, access_token: &str) -> Result<Passthrough, AppError> {
        let url = format!("{}/athlete", self.api_url);
        self.get_json(&url, access_token, &[]).await
    }

    /// List the authenticated athlete's activities.
    pub async fn list_activities(
        &self,
        access_token: &str,
        query: &ActivitiesQuery,
    ) -> Result<Passthrough, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);
        self.get_json(&url, access_token, &query.to_params()).await
    }

    /// Get aggregate stats for an athlete.
    pub async fn get_athlete_stats(
        &self,
        access_token: &str,
        athlete_id: u64,
    ) -> Result<Passthrough, AppError> {
        let url = format!("{}/athletes/{}/stats", self.api_url, athlete_id);
        self.get_json(&url, access_token, &[]).await
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<Passthrough, AppError> {
        let url = format!("{}/activities/{}", self.api_url, activity_id);
        self.get_json(&url, access_token, &[]).await
    }

    /// Bearer-authenticated GET whose JSON body is handed back untouched.
    async fn get_json(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, &str)],
    ) -> Result<Passthrough, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        // Upstream status and body are not forwarded on failure; callers only see a 500.
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, url = %url, "Strava API request failed");
            return Err(AppError::Upstream(format!("{} for url: {}", status, url)));
        }

        let body = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))?;

        Ok(Passthrough { status, body })
    }
}

/// Token exchange response from Strava OAuth (includes athlete info).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchange {
    #[serde(flatten)]
    pub grant: TokenGrant,
    pub athlete: serde_json::Value,
}

/// Query parameters for listing activities, forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitiesQuery {
    pub per_page: String,
    pub page: String,
    /// Only activities before this epoch timestamp
    pub before: Option<String>,
    /// Only activities after this epoch timestamp
    pub after: Option<String>,
}

fn default_per_page() -> String {
    "200".to_string()
}
fn default_page() -> String {
    "1".to_string()
}

impl Default for ActivitiesQuery {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            page: default_page(),
            before: None,
            after: None,
        }
    }
}

impl ActivitiesQuery {
    /// Build from decoded query pairs, taking the first value of a repeated key.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let value = |key: &str| first_value(pairs, key).map(str::to_string);
        Self {
            per_page: value("per_page").unwrap_or_else(default_per_page),
            page: value("page").unwrap_or_else(default_page),
            before: value("before"),
            after: value("after"),
        }
    }

    fn to_params(&self) -> Vec<(&str, &str)> {
        let mut params = vec![
            ("per_page", self.per_page.as_str()),
            ("page", self.page.as_str()),
        ];
        if let Some(before) = &self.before {
            params.push(("before", before.as_str()));
        }
        if let Some(after) = &self.after {
            params.push(("after", after.as_str()));
        }
        params
    }
}

/// Successful upstream JSON response, replayed with Strava's status code.
#[derive(Debug, Clone)]
pub struct Passthrough {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl IntoResponse for Passthrough {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - OAuth flow on top of the session store
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a refresh attempt that did not fail upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Tokens replaced; new expiry (Unix seconds).
    Refreshed { expires_at: i64 },
    /// Nothing to refresh; the browser has to log in.
    NoSession,
}

/// High-level Strava service that owns the session token lifecycle.
///
/// Session writes happen only after Strava has answered successfully, and
/// always as one store operation, so a failed exchange never leaves a
/// partially updated session behind.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    sessions: SessionStore,
}

impl StravaService {
    pub fn new(client: StravaClient, sessions: SessionStore) -> Self {
        Self { client, sessions }
    }

    pub fn client(&self) -> &StravaClient {
        &self.client
    }

    /// Handle OAuth callback: exchange the code and store the new session.
    pub async fn handle_oauth_callback(
        &self,
        session_id: &str,
        code: &str,
    ) -> Result<Session, AppError> {
        let exchange = self.client.exchange_code(code).await?;
        let session = Session::new(exchange.grant, exchange.athlete);

        self.sessions.set(session_id, session.clone());

        let athlete_id = &session.athlete["id"];
        tracing::info!(
            athlete_id = %athlete_id,
            expires_at = session.expires_at,
            "OAuth callback handled, session stored"
        );
        Ok(session)
    }

    /// Refresh the session's access token with its refresh token.
    ///
    /// On failure the stale tokens are left in place.
    pub async fn refresh_session(&self, session_id: &str) -> Result<RefreshOutcome, AppError> {
        let Some(session) = self.sessions.get(session_id) else {
            return Ok(RefreshOutcome::NoSession);
        };

        let grant = self.client.refresh_token(&session.refresh_token).await?;
        let expires_at = grant.expires_at;

        // Last writer wins if two refreshes race for the same session.
        if !self.sessions.update_tokens(session_id, grant) {
            tracing::warn!("Session cleared while refreshing, discarding new tokens");
            return Ok(RefreshOutcome::NoSession);
        }

        tracing::info!(expires_at, "Access token refreshed");
        Ok(RefreshOutcome::Refreshed { expires_at })
    }
}
