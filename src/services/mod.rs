// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod strava;
pub mod templates;

pub use strava::{ActivitiesQuery, Passthrough, RefreshOutcome, StravaClient, StravaService};
pub use templates::Templates;
