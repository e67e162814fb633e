// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Request},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use std::sync::Arc;
use strava_dashboard::config::Config;
use strava_dashboard::middleware::session::SESSION_COOKIE;
use strava_dashboard::models::{Session, TokenGrant};
use strava_dashboard::routes::create_router;
use strava_dashboard::AppState;
use wiremock::MockServer;

/// Session id used by seeded test sessions.
#[allow(dead_code)]
pub const TEST_SESSION_ID: &str = "test-session-id";

/// Create a test app whose Strava endpoints point at `base_url`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app_with_strava(base_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.strava_oauth_url = format!("{}/oauth", base_url);
    config.strava_api_url = format!("{}/api/v3", base_url);

    let state = Arc::new(AppState::new(config).expect("Failed to build test state"));
    (create_router(state.clone()), state)
}

/// Create a test app backed by a wiremock Strava.
#[allow(dead_code)]
pub fn create_test_app(strava: &MockServer) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_strava(&strava.uri())
}

/// Signed `Cookie` header value for `session_id`.
#[allow(dead_code)]
pub fn session_cookie(state: &AppState, session_id: &str) -> String {
    let jar = SignedCookieJar::new(state.cookie_key.clone())
        .add(Cookie::new(SESSION_COOKIE, session_id.to_string()));
    let response = (jar, ()).into_response();
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Session id carried by a signed `name=value` cookie, if the signature checks out.
#[allow(dead_code)]
pub fn session_id_from_cookie(state: &AppState, cookie: &str) -> Option<String> {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(cookie).ok()?);
    SignedCookieJar::from_headers(&headers, state.cookie_key.clone())
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

/// Store a session expiring at `expires_at` and return its cookie.
#[allow(dead_code)]
pub fn seed_session(state: &AppState, access_token: &str, expires_at: i64) -> String {
    state.sessions.set(
        TEST_SESSION_ID,
        Session::new(
            TokenGrant {
                access_token: access_token.to_string(),
                refresh_token: format!("{access_token}_refresh"),
                expires_at,
            },
            serde_json::json!({ "id": 134815, "firstname": "Ada", "lastname": "Lovelace" }),
        ),
    );
    session_cookie(state, TEST_SESSION_ID)
}

#[allow(dead_code)]
pub fn future_expiry() -> i64 {
    chrono::Utc::now().timestamp() + 6 * 60 * 60
}

#[allow(dead_code)]
pub fn past_expiry() -> i64 {
    chrono::Utc::now().timestamp() - 60
}

/// Build a GET request, optionally carrying a cookie header.
#[allow(dead_code)]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[allow(dead_code)]
pub fn location(response: &Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

/// Number of requests the mock Strava has seen.
#[allow(dead_code)]
pub async fn upstream_calls(strava: &MockServer) -> usize {
    strava.received_requests().await.unwrap_or_default().len()
}
