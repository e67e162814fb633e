// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A local `.env` file is honoured for development. Everything is read once
//! at startup and shared through `AppState`.

use std::env;

/// Session signing key used when `SECRET_KEY` is unset outside production.
pub const DEV_SECRET_KEY: &str = "dev-key-for-testing";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth";
const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// External base URL of this server, used to build the OAuth redirect URI
    pub public_url: String,
    /// Server port
    pub port: u16,
    /// Strava OAuth base URL (`/authorize` and `/token` live below it)
    pub strava_oauth_url: String,
    /// Strava REST API base URL
    pub strava_api_url: String,
    /// Whether `APP_ENV=production`
    pub production: bool,

    // --- Secrets ---
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Key material for signing the session cookie
    pub secret_key: Vec<u8>,
    /// True when `secret_key` fell back to [`DEV_SECRET_KEY`]
    pub using_dev_secret_key: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let (secret_key, using_dev_secret_key) =
            resolve_secret_key(env::var("SECRET_KEY").ok(), production)?;

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            public_url: env::var("PUBLIC_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            port,
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_STRAVA_OAUTH_URL.to_string()),
            strava_api_url: env::var("STRAVA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_STRAVA_API_URL.to_string()),
            production,

            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            secret_key,
            using_dev_secret_key,
        })
    }

    /// Config for tests only. Strava URLs can be pointed at a mock server.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            public_url: "http://localhost:8080".to_string(),
            port: DEFAULT_PORT,
            strava_oauth_url: DEFAULT_STRAVA_OAUTH_URL.to_string(),
            strava_api_url: DEFAULT_STRAVA_API_URL.to_string(),
            production: false,
            strava_client_secret: "test_secret".to_string(),
            secret_key: b"test_secret_key_for_session_cookies".to_vec(),
            using_dev_secret_key: false,
        }
    }

    /// OAuth redirect URI registered with Strava.
    pub fn callback_url(&self) -> String {
        format!("{}/callback", self.public_url)
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}

/// Pick the session signing key, refusing the development default in production.
fn resolve_secret_key(
    value: Option<String>,
    production: bool,
) -> Result<(Vec<u8>, bool), ConfigError> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(key) => Ok((key.into_bytes(), false)),
        None if production => Err(ConfigError::Missing("SECRET_KEY")),
        None => Ok((DEV_SECRET_KEY.as_bytes().to_vec(), true)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
