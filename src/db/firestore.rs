// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Bikes (inventory records with optimistic versioning)
//! - Users (sign-in profiles and access flags)
//! - Promoted bikes (settings singleton)
//! - Offers

use std::sync::Arc;

use crate::db::memory::MemoryStore;
use crate::db::{collections, settings};
use crate::error::AppError;
use crate::import::BikeSink;
use crate::models::{Bike, Offer, PromotedBikes, User};

#[derive(Clone)]
enum Backend {
    Remote(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
    Offline,
}

enum Store<'a> {
    Remote(&'a firestore::FirestoreDb),
    Memory(&'a MemoryStore),
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Remote(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Remote(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// Create a client backed by an in-process store.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    /// Helper to get the store or return an error if offline.
    fn store(&self) -> Result<Store<'_>, AppError> {
        match &self.backend {
            Backend::Remote(client) => Ok(Store::Remote(client)),
            Backend::Memory(store) => Ok(Store::Memory(store)),
            Backend::Offline => Err(AppError::Database(
                "Database not connected (offline mode)".to_string(),
            )),
        }
    }

    // ─── Bike Operations ─────────────────────────────────────────

    /// Get every bike, unordered.
    pub async fn list_bikes(&self) -> Result<Vec<Bike>, AppError> {
        match self.store()? {
            Store::Memory(store) => Ok(store.list_bikes()),
            Store::Remote(client) => client
                .fluent()
                .select()
                .from(collections::BIKES)
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
        }
    }

    pub async fn get_bike(&self, id: &str) -> Result<Option<Bike>, AppError> {
        match self.store()? {
            Store::Memory(store) => Ok(store.get_bike(id)),
            Store::Remote(client) => client
                .fluent()
                .select()
                .by_id_in(collections::BIKES)
                .obj()
                .one(id)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
        }
    }

    /// Store a new bike under a fresh ID with version 1.
    pub async fn create_bike(&self, mut bike: Bike) -> Result<Bike, AppError> {
        bike.id = uuid::Uuid::new_v4().to_string();
        bike.version = 1;

        match self.store()? {
            Store::Memory(store) => store.insert_bike(bike),
            Store::Remote(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::BIKES)
                    .document_id(&bike.id)
                    .object(&bike)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(bike)
            }
        }
    }

    /// Overwrite a stored bike, bumping its version.
    ///
    /// When `expected_version` is given and differs from the stored version
    /// the write is rejected with `Conflict`.
    pub async fn replace_bike(
        &self,
        mut bike: Bike,
        expected_version: Option<u64>,
    ) -> Result<Bike, AppError> {
        let client = match self.store()? {
            Store::Memory(store) => return store.replace_bike(bike, expected_version),
            Store::Remote(client) => client,
        };

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Reading inside the transaction locks the document until commit.
        let current: Option<Bike> = client
            .clone_with_consistency_selector(firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ))
            .fluent()
            .select()
            .by_id_in(collections::BIKES)
            .obj()
            .one(&bike.id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read bike in transaction: {}", e)))?;

        let Some(current) = current else {
            let _ = transaction.rollback().await;
            return Err(AppError::NotFound(format!("bike {}", bike.id)));
        };

        if let Some(expected) = expected_version {
            if current.version != expected {
                let _ = transaction.rollback().await;
                return Err(AppError::Conflict(format!(
                    "bike {} is at version {}, not {expected}",
                    bike.id, current.version
                )));
            }
        }

        bike.version = current.version + 1;

        client
            .fluent()
            .update()
            .in_col(collections::BIKES)
            .document_id(&bike.id)
            .object(&bike)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add bike to transaction: {}", e)))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(bike)
    }

    /// Delete a bike. Returns `NotFound` when it does not exist.
    pub async fn delete_bike(&self, id: &str) -> Result<(), AppError> {
        match self.store()? {
            Store::Memory(store) => store
                .remove_bike(id)
                .map(|_| ())
                .ok_or_else(|| AppError::NotFound(format!("bike {id}"))),
            Store::Remote(client) => {
                if self.get_bike(id).await?.is_none() {
                    return Err(AppError::NotFound(format!("bike {id}")));
                }
                client
                    .fluent()
                    .delete()
                    .from(collections::BIKES)
                    .document_id(id)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by identity-provider subject.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        match self.store()? {
            Store::Memory(store) => Ok(store.get_user(id)),
            Store::Remote(client) => client
                .fluent()
                .select()
                .by_id_in(collections::USERS)
                .obj()
                .one(id)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
        }
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match self.store()? {
            Store::Memory(store) => store.put_user(user.clone()),
            Store::Remote(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .document_id(&user.id)
                    .object(user)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
        }
        Ok(())
    }

    /// All users, oldest account first.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = match self.store()? {
            Store::Memory(store) => store.list_users(),
            Store::Remote(client) => client
                .fluent()
                .select()
                .from(collections::USERS)
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?,
        };
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    // ─── Promoted Bikes ──────────────────────────────────────────

    /// Current promoted slots; all empty when never saved.
    pub async fn get_promoted(&self) -> Result<PromotedBikes, AppError> {
        let promoted = match self.store()? {
            Store::Memory(store) => store.get_promoted(),
            Store::Remote(client) => client
                .fluent()
                .select()
                .by_id_in(collections::SETTINGS)
                .obj()
                .one(settings::PROMOTED)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?,
        };
        Ok(promoted.unwrap_or_default())
    }

    pub async fn set_promoted(&self, promoted: &PromotedBikes) -> Result<(), AppError> {
        match self.store()? {
            Store::Memory(store) => store.put_promoted(promoted.clone()),
            Store::Remote(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::SETTINGS)
                    .document_id(settings::PROMOTED)
                    .object(promoted)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
        }
        Ok(())
    }

    // ─── Offer Operations ────────────────────────────────────────

    /// All offers, newest first.
    pub async fn list_offers(&self) -> Result<Vec<Offer>, AppError> {
        let mut offers: Vec<Offer> = match self.store()? {
            Store::Memory(store) => store.list_offers(),
            Store::Remote(client) => client
                .fluent()
                .select()
                .from(collections::OFFERS)
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?,
        };
        offers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(offers)
    }

    pub async fn get_offer(&self, id: &str) -> Result<Option<Offer>, AppError> {
        match self.store()? {
            Store::Memory(store) => Ok(store.get_offer(id)),
            Store::Remote(client) => client
                .fluent()
                .select()
                .by_id_in(collections::OFFERS)
                .obj()
                .one(id)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
        }
    }

    pub async fn upsert_offer(&self, offer: &Offer) -> Result<(), AppError> {
        match self.store()? {
            Store::Memory(store) => store.put_offer(offer.clone()),
            Store::Remote(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::OFFERS)
                    .document_id(&offer.id)
                    .object(offer)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
        }
        Ok(())
    }
}

impl BikeSink for FirestoreDb {
    async fn store_bike(&self, bike: Bike) -> Result<Bike, AppError> {
        self.create_bike(bike).await
    }
}
