// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML page rendering with Handlebars.
//!
//! Templates are compiled into the binary and registered once at startup.

use crate::error::AppError;
use axum::response::Html;
use handlebars::Handlebars;
use serde_json::json;

const INDEX: &str = "index";
const DASHBOARD: &str = "dashboard";
const ERROR: &str = "error";

/// Message shown when `/error` is opened without an `error` parameter.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Compiled page templates.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> anyhow::Result<Self> {
        let mut registry = Handlebars::new();

        for (name, source) in [
            (INDEX, include_str!("../../templates/index.hbs")),
            (DASHBOARD, include_str!("../../templates/dashboard.hbs")),
            (ERROR, include_str!("../../templates/error.hbs")),
        ] {
            registry
                .register_template_string(name, source)
                .map_err(|e| anyhow::anyhow!("Template compilation error in {}: {}", name, e))?;
        }

        Ok(Self { registry })
    }

    /// Landing page for anonymous visitors.
    pub fn index(&self) -> Result<Html<String>, AppError> {
        self.render(INDEX, &json!({ "authenticated": false }))
    }

    /// Dashboard for a logged-in athlete.
    pub fn dashboard(&self, athlete: &serde_json::Value) -> Result<Html<String>, AppError> {
        self.render(
            DASHBOARD,
            &json!({ "authenticated": true, "athlete": athlete }),
        )
    }

    pub fn error(&self, message: &str) -> Result<Html<String>, AppError> {
        self.render(ERROR, &json!({ "error": message }))
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<Html<String>, AppError> {
        self.registry
            .render(name, data)
            .map(Html)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Template rendering error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_links_to_login() {
        let templates = Templates::new().unwrap();
        let Html(page) = templates.index().unwrap();
        assert!(page.contains("href=\"/login\""));
        assert!(!page.contains("/logout"));
    }

    #[test]
    fn test_dashboard_shows_athlete() {
        let templates = Templates::new().unwrap();
        let athlete = json!({
            "id": 134815,
            "firstname": "Marianne",
            "lastname": "Teutenberg",
            "profile": "https://example.com/large.jpg"
        });

        let Html(page) = templates.dashboard(&athlete).unwrap();

        assert!(page.contains("Marianne Teutenberg"));
        assert!(page.contains("href=\"/stats/134815\""));
        assert!(page.contains("href=\"/logout\""));
        assert!(page.contains("src=\"https://example.com/large.jpg\""));
    }

    #[test]
    fn test_dashboard_tolerates_sparse_athlete() {
        let templates = Templates::new().unwrap();
        let Html(page) = templates.dashboard(&json!(null)).unwrap();
        assert!(page.contains("href=\"/logout\""));
        assert!(!page.contains("/stats/"));
    }

    #[test]
    fn test_error_message_is_escaped() {
        let templates = Templates::new().unwrap();
        let Html(page) = templates.error("<script>alert(1)</script>").unwrap();
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>alert"));
    }
}
