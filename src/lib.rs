// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bike inventory: public catalog, partner pricing and administration
//!
//! This crate provides the backend API for a bicycle shop inventory:
//! catalog browsing, CSV import, Excel export, user approval and the
//! admin grid editor's server side.

pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod values;

use config::Config;
use db::FirestoreDb;
use services::IdTokenVerifier;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub id_token_verifier: IdTokenVerifier,
}
