// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Customer offer model.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// Offer stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    /// Referenced bike IDs
    pub bike_ids: Vec<String>,
    pub note: String,
    pub status: OfferStatus,
    pub created_at: String,
    /// User ID of the creator
    pub created_by: String,
}

/// Fields accepted when creating an offer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OfferInput {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 1))]
    pub bike_ids: Vec<String>,
    #[serde(default)]
    pub note: String,
}

impl Offer {
    pub fn new(id: String, input: OfferInput, created_by: &str, now: &str) -> Self {
        Self {
            id,
            customer_name: input.customer_name.trim().to_string(),
            customer_email: input.customer_email.trim().to_string(),
            bike_ids: input.bike_ids,
            note: input.note,
            status: OfferStatus::Pending,
            created_at: now.to_string(),
            created_by: created_by.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_input_validation() {
        let input: OfferInput = serde_json::from_str(
            r#"{"customerName":"Jana","customerEmail":"not-an-email","bikeIds":["b1"]}"#,
        )
        .unwrap();
        assert!(input.validate().is_err());

        let input: OfferInput = serde_json::from_str(
            r#"{"customerName":"Jana","customerEmail":"jana@example.com","bikeIds":[]}"#,
        )
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_new_offer_is_pending() {
        let input: OfferInput = serde_json::from_str(
            r#"{"customerName":" Jana ","customerEmail":"jana@example.com","bikeIds":["b1"]}"#,
        )
        .unwrap();
        let offer = Offer::new("o1".to_string(), input, "uid-1", "now");
        assert_eq!(offer.status, OfferStatus::Pending);
        assert_eq!(offer.customer_name, "Jana");
        assert_eq!(
            serde_json::to_value(offer.status).unwrap(),
            serde_json::json!("pending")
        );
    }
}
