// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, page guard, security headers).

pub mod auth;
pub mod pages;
pub mod security;

pub use auth::{require_access, require_admin, require_session, resolve_session, Session};
pub use pages::guard_pages;
