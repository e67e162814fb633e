// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer (server-side sessions).

pub mod sessions;

pub use sessions::SessionStore;
