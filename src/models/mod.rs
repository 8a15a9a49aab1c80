// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod bike;
pub mod field;
pub mod offer;
pub mod promoted;
pub mod user;

pub use bike::{Bike, BikeInput, Category, PublicBike};
pub use field::{BikeField, BikePatch, FieldValue};
pub use offer::{Offer, OfferInput, OfferStatus};
pub use promoted::PromotedBikes;
pub use user::User;
