// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava passthrough routes for authenticated sessions.
//!
//! The auth middleware is applied in routes/mod.rs for these routes.

use crate::error::{AppError, Result};
use crate::models::Session;
use crate::services::{ActivitiesQuery, Passthrough};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/athlete", get(get_athlete))
        .route("/activities", get(get_activities))
        .route("/stats/{athlete_id}", get(get_stats))
        .route("/activity/{activity_id}", get(get_activity))
}

/// Authenticated athlete profile.
async fn get_athlete(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Passthrough> {
    state
        .strava
        .client()
        .get_athlete(&session.access_token)
        .await
}

/// Athlete activities, paginated and optionally time-windowed.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, AppError>,
) -> Result<Passthrough> {
    let query = ActivitiesQuery::from_pairs(&pairs);
    state
        .strava
        .client()
        .list_activities(&session.access_token, &query)
        .await
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    WithRejection(Path(athlete_id), _): WithRejection<Path<u64>, AppError>,
) -> Result<Passthrough> {
    state
        .strava
        .client()
        .get_athlete_stats(&session.access_token, athlete_id)
        .await
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    WithRejection(Path(activity_id), _): WithRejection<Path<u64>, AppError>,
) -> Result<Passthrough> {
    state
        .strava
        .client()
        .get_activity(&session.access_token, activity_id)
        .await
}
