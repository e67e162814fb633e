// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed session cookie.
//!
//! The cookie only carries an opaque random session id; the tokens themselves
//! stay in the server-side [`SessionStore`](crate::db::SessionStore). A cookie
//! with a bad signature is ignored, which leaves the browser anonymous.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hkdf::Hkdf;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;
use std::convert::Infallible;
use std::sync::Arc;

/// Name of the cookie holding the signed session id.
pub const SESSION_COOKIE: &str = "strava_session";

const SESSION_ID_BYTES: usize = 32;
const KEY_SALT: &[u8] = b"strava-dashboard/session-cookie";
const KEY_INFO: &[u8] = b"cookie-signing-key";

/// Derive the 64-byte cookie signing key from `SECRET_KEY` material of any length.
pub fn cookie_key(secret: &[u8]) -> anyhow::Result<Key> {
    let hk = Hkdf::<Sha256>::new(Some(KEY_SALT), secret);
    let mut okm = [0u8; 64];
    hk.expand(KEY_INFO, &mut okm)
        .map_err(|e| anyhow::anyhow!("Cookie key derivation failed: {}", e))?;
    Ok(Key::from(&okm[..]))
}

/// Generate a new random session id.
fn new_session_id() -> Result<String, AppError> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Signed cookie jar scoped to the session cookie.
///
/// Returned from handlers as a response part so cookie changes reach the browser.
pub struct SessionJar {
    jar: SignedCookieJar,
    secure: bool,
}

impl FromRequestParts<Arc<AppState>> for SessionJar {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            jar: SignedCookieJar::from_headers(&parts.headers, state.cookie_key.clone()),
            secure: state.config.secure_cookies(),
        })
    }
}

impl SessionJar {
    /// Session id from a correctly signed cookie.
    pub fn session_id(&self) -> Option<String> {
        self.jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|id| !id.is_empty())
    }

    /// Issue a new session id, queueing a cookie that replaces any existing one.
    pub fn issue_session_id(self) -> Result<(Self, String), AppError> {
        let id = new_session_id()?;
        // No Max-Age: the cookie ends with the browser session.
        let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure);

        Ok((
            Self {
                jar: self.jar.add(cookie),
                secure: self.secure,
            },
            id,
        ))
    }

    /// Queue removal of the session cookie.
    pub fn remove(self) -> Self {
        let cookie = Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure);

        Self {
            jar: self.jar.remove(cookie),
            secure: self.secure,
        }
    }
}

impl IntoResponseParts for SessionJar {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}
