// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store used for tests and local runs without Firestore.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::AppError;
use crate::models::{Bike, Offer, PromotedBikes, User};

/// Typed collections held in concurrent maps keyed by document ID.
#[derive(Default)]
pub struct MemoryStore {
    bikes: DashMap<String, Bike>,
    users: DashMap<String, User>,
    offers: DashMap<String, Offer>,
    settings: DashMap<&'static str, PromotedBikes>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_bikes(&self) -> Vec<Bike> {
        self.bikes.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn get_bike(&self, id: &str) -> Option<Bike> {
        self.bikes.get(id).map(|entry| entry.value().clone())
    }

    pub fn insert_bike(&self, bike: Bike) -> Result<Bike, AppError> {
        match self.bikes.entry(bike.id.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!("bike {} already exists", bike.id))),
            Entry::Vacant(slot) => {
                slot.insert(bike.clone());
                Ok(bike)
            }
        }
    }

    /// Compare-and-swap on the stored version.
    pub fn replace_bike(&self, mut bike: Bike, expected_version: Option<u64>) -> Result<Bike, AppError> {
        let mut stored = self
            .bikes
            .get_mut(&bike.id)
            .ok_or_else(|| AppError::NotFound(format!("bike {}", bike.id)))?;

        if let Some(expected) = expected_version {
            if stored.version != expected {
                return Err(AppError::Conflict(format!(
                    "bike {} is at version {}, not {expected}",
                    bike.id, stored.version
                )));
            }
        }

        bike.version = stored.version + 1;
        *stored = bike.clone();
        Ok(bike)
    }

    pub fn remove_bike(&self, id: &str) -> Option<Bike> {
        self.bikes.remove(id).map(|(_, bike)| bike)
    }

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.users.get(id).map(|entry| entry.value().clone())
    }

    pub fn put_user(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn get_promoted(&self) -> Option<PromotedBikes> {
        self.settings
            .get(crate::db::settings::PROMOTED)
            .map(|entry| entry.value().clone())
    }

    pub fn put_promoted(&self, promoted: PromotedBikes) {
        self.settings.insert(crate::db::settings::PROMOTED, promoted);
    }

    pub fn get_offer(&self, id: &str) -> Option<Offer> {
        self.offers.get(id).map(|entry| entry.value().clone())
    }

    pub fn put_offer(&self, offer: Offer) {
        self.offers.insert(offer.id.clone(), offer);
    }

    pub fn list_offers(&self) -> Vec<Offer> {
        self.offers.iter().map(|entry| entry.value().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BikeInput;

    fn bike(id: &str) -> Bike {
        let input = BikeInput {
            model_name: "Cross".to_string(),
            ..Default::default()
        };
        let mut bike = Bike::from_input(id.to_string(), input, "Bulls", 2026, "now");
        bike.version = 1;
        bike
    }

    #[test]
    fn test_replace_checks_version() {
        let store = MemoryStore::new();
        store.insert_bike(bike("b1")).unwrap();

        let updated = store.replace_bike(bike("b1"), Some(1)).unwrap();
        assert_eq!(updated.version, 2);

        let stale = store.replace_bike(bike("b1"), Some(1));
        assert!(matches!(stale, Err(AppError::Conflict(_))));

        let unchecked = store.replace_bike(bike("b1"), None).unwrap();
        assert_eq!(unchecked.version, 3);
    }

    #[test]
    fn test_replace_missing_bike() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.replace_bike(bike("nope"), None),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let store = MemoryStore::new();
        store.insert_bike(bike("b1")).unwrap();
        assert!(matches!(store.insert_bike(bike("b1")), Err(AppError::Conflict(_))));
    }
}
