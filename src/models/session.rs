// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-browser session record.

use serde::Deserialize;

/// Tokens returned by the Strava token endpoint for either grant type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry (Unix seconds)
    pub expires_at: i64,
}

/// Authenticated session state.
///
/// A stored session always carries the full token set; an anonymous browser
/// simply has no session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry (Unix seconds)
    pub expires_at: i64,
    /// Athlete profile captured at login; never refreshed.
    pub athlete: serde_json::Value,
}

impl Session {
    /// Build a fresh session from a code exchange.
    pub fn new(grant: TokenGrant, athlete: serde_json::Value) -> Self {
        Self {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_at: grant.expires_at,
            athlete,
        }
    }

    /// Whether the access token expired strictly before `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at < now
    }

    /// Replace the token set, keeping the athlete snapshot.
    pub fn apply_grant(&mut self, grant: TokenGrant) {
        self.access_token = grant.access_token;
        self.refresh_token = grant.refresh_token;
        self.expires_at = grant.expires_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grant(access: &str, expires_at: i64) -> TokenGrant {
        TokenGrant {
            access_token: access.to_string(),
            refresh_token: format!("{access}_refresh"),
            expires_at,
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let session = Session::new(grant("abc", 1_000), json!({}));
        assert!(!session.is_expired_at(999));
        assert!(!session.is_expired_at(1_000), "expiry second is still valid");
        assert!(session.is_expired_at(1_001));
    }

    #[test]
    fn test_apply_grant_keeps_athlete() {
        let athlete = json!({ "id": 42, "firstname": "Ada" });
        let mut session = Session::new(grant("old", 1_000), athlete.clone());

        session.apply_grant(grant("new", 5_000));

        assert_eq!(session.access_token, "new");
        assert_eq!(session.refresh_token, "new_refresh");
        assert_eq!(session.expires_at, 5_000);
        assert_eq!(session.athlete, athlete);
    }

    #[test]
    fn test_grant_requires_all_fields() {
        let partial = json!({ "access_token": "a", "expires_at": 1 });
        assert!(serde_json::from_value::<TokenGrant>(partial).is_err());
    }
}
