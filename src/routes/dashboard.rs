// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered pages.

use crate::error::Result;
use crate::middleware::SessionJar;
use crate::routes::DASHBOARD_PATH;
use crate::services::templates::UNKNOWN_ERROR;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(DASHBOARD_PATH, get(index))
        .route("/error", get(error_page))
}

/// Dashboard for logged-in athletes, landing page otherwise.
async fn index(State(state): State<Arc<AppState>>, jar: SessionJar) -> Result<Html<String>> {
    match jar.session_id().and_then(|id| state.sessions.get(&id)) {
        Some(session) => state.templates.dashboard(&session.athlete),
        None => state.templates.index(),
    }
}

#[derive(Deserialize)]
struct ErrorParams {
    error: Option<String>,
}

async fn error_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ErrorParams>,
) -> Result<Html<String>> {
    state
        .templates
        .error(params.error.as_deref().unwrap_or(UNKNOWN_ERROR))
}
