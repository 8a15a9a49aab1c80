// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bike inventory API server
//!
//! Serves the public catalog, the partner price list and the admin
//! inventory tools, backed by Firestore.

use bike_inventory::{config::Config, db::FirestoreDb, services::IdTokenVerifier, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, brand = %config.brand, "Starting bike inventory API");

    let db = if config.in_memory_store {
        tracing::warn!("Using in-memory store; data is lost on restart");
        FirestoreDb::new_in_memory()
    } else {
        FirestoreDb::new(&config.firebase_project_id)
            .await
            .expect("Failed to connect to Firestore")
    };

    let id_token_verifier =
        IdTokenVerifier::new(&config).expect("Failed to initialize ID token verifier");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        id_token_verifier,
    });

    // Build router
    let app = bike_inventory::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bike_inventory=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
