// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

/// Collection names as constants.
pub mod collections {
    pub const BIKES: &str = "bikes";
    pub const USERS: &str = "users";
    pub const OFFERS: &str = "offers";
    /// Singleton documents (promoted bikes)
    pub const SETTINGS: &str = "settings";
}

/// Document IDs inside [`collections::SETTINGS`].
pub mod settings {
    pub const PROMOTED: &str = "promoted";
}
