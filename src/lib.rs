// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava Dashboard: connect a Strava account and browse its data
//!
//! This crate provides a small web server that runs the Strava OAuth flow,
//! keeps the resulting tokens in a server-side session and proxies read-only
//! Strava API calls on the user's behalf.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum_extra::extract::cookie::Key;
use config::Config;
use db::SessionStore;
use services::{StravaClient, StravaService, Templates};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub strava: StravaService,
    pub templates: Templates,
    /// Signing key for the session cookie, derived from `SECRET_KEY`.
    pub cookie_key: Key,
}

impl AppState {
    /// Wire up services for `config` with an empty session store.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let sessions = SessionStore::new();
        let strava = StravaService::new(StravaClient::new(&config), sessions.clone());
        let templates = Templates::new()?;
        let cookie_key = middleware::session::cookie_key(&config.secret_key)?;

        Ok(Self {
            config,
            sessions,
            strava,
            templates,
            cookie_key,
        })
    }
}
