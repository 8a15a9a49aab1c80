// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog queries over the bike list: filtering, model families and
//! promoted-slot resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::promoted::PROMOTED_SLOTS;
use crate::models::{Bike, Category, PromotedBikes};

/// Public catalog filters (all optional, combined with AND).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilter {
    pub category: Option<Category>,
    pub ebike: Option<bool>,
    pub year: Option<i32>,
    /// Case-insensitive search over model name, model number and color
    pub q: Option<String>,
}

impl CatalogFilter {
    pub fn matches(&self, bike: &Bike) -> bool {
        if self.category.is_some_and(|c| c != bike.category) {
            return false;
        }
        if self.ebike.is_some_and(|e| e != bike.is_ebike) {
            return false;
        }
        if self.year.is_some_and(|y| y != bike.model_year) {
            return false;
        }
        match self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let q = q.to_lowercase();
                [&bike.model_name, &bike.model_number, &bike.color]
                    .iter()
                    .any(|text| text.to_lowercase().contains(&q))
            }
            None => true,
        }
    }
}

/// Catalog order: model number, then name.
pub fn sort_bikes(bikes: &mut [Bike]) {
    bikes.sort_by(|a, b| {
        a.model_number
            .cmp(&b.model_number)
            .then_with(|| a.model_name.cmp(&b.model_name))
    });
}

pub fn filter_bikes<'a>(bikes: &'a [Bike], filter: &CatalogFilter) -> Vec<&'a Bike> {
    bikes.iter().filter(|b| filter.matches(b)).collect()
}

/// One size variant within a family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyVariant {
    pub id: String,
    pub model_number: String,
    pub size: String,
    pub pieces: u32,
}

/// Bikes sharing a model number apart from the size suffix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFamily {
    pub family: String,
    pub model_name: String,
    pub total_pieces: u64,
    pub variants: Vec<FamilyVariant>,
}

/// Group bikes into model families, sorted by family key and size.
pub fn group_families<'a>(bikes: impl IntoIterator<Item = &'a Bike>) -> Vec<ModelFamily> {
    let mut groups: BTreeMap<String, Vec<&Bike>> = BTreeMap::new();
    for bike in bikes {
        groups.entry(bike.family().to_string()).or_default().push(bike);
    }

    groups
        .into_iter()
        .map(|(family, mut members)| {
            members.sort_by(|a, b| a.model_number.cmp(&b.model_number));
            ModelFamily {
                model_name: members
                    .first()
                    .map(|b| b.model_name.clone())
                    .unwrap_or_default(),
                total_pieces: members.iter().map(|b| u64::from(b.pieces)).sum(),
                variants: members
                    .iter()
                    .map(|b| FamilyVariant {
                        id: b.id.clone(),
                        model_number: b.model_number.clone(),
                        size: b.size().to_string(),
                        pieces: b.pieces,
                    })
                    .collect(),
                family,
            }
        })
        .collect()
}

/// Resolve promoted model numbers to bikes. Empty or stale slots stay empty.
pub fn resolve_promoted<'a>(
    promoted: &PromotedBikes,
    bikes: &'a [Bike],
) -> [Option<&'a Bike>; PROMOTED_SLOTS] {
    promoted.slots.each_ref().map(|slot| {
        slot.as_deref()
            .and_then(|number| bikes.iter().find(|b| b.model_number == number))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BikeInput;

    fn bike(id: &str, number: &str, category: Category, battery: &str) -> Bike {
        Bike::from_input(
            id.to_string(),
            BikeInput {
                model_name: format!("Model {number}"),
                model_number: number.to_string(),
                model_year: Some(2025),
                category,
                battery: battery.to_string(),
                pieces: 2,
                color: "Black".to_string(),
                ..Default::default()
            },
            "Bulls",
            2026,
            "now",
        )
    }

    fn fleet() -> Vec<Bike> {
        vec![
            bike("1", "WC102", Category::Trekking, ""),
            bike("2", "WC101", Category::Trekking, ""),
            bike("3", "WC209", Category::Trekking, ""),
            bike("4", "SE501", Category::Mtb, "Bosch 750Wh"),
        ]
    }

    #[test]
    fn test_families_group_by_prefix() {
        let bikes = fleet();
        let families = group_families(&bikes);

        let keys: Vec<&str> = families.iter().map(|f| f.family.as_str()).collect();
        assert_eq!(keys, vec!["SE5", "WC1", "WC2"]);

        let wc1 = &families[1];
        let numbers: Vec<&str> = wc1.variants.iter().map(|v| v.model_number.as_str()).collect();
        assert_eq!(numbers, vec!["WC101", "WC102"]);
        assert_eq!(wc1.variants[0].size, "01");
        assert_eq!(wc1.total_pieces, 4);
        assert_eq!(families[2].variants.len(), 1);
    }

    #[test]
    fn test_family_total_beyond_u32() {
        let mut large = bike("1", "WC101", Category::Trekking, "");
        large.pieces = u32::MAX;
        let mut one = bike("2", "WC102", Category::Trekking, "");
        one.pieces = 1;

        let families = group_families(&[large, one]);
        assert_eq!(families[0].total_pieces, u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_filter_combines_criteria() {
        let bikes = fleet();
        let filter = CatalogFilter {
            ebike: Some(true),
            ..Default::default()
        };
        let ids: Vec<&str> = filter_bikes(&bikes, &filter).iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["4"]);

        let filter = CatalogFilter {
            category: Some(Category::Trekking),
            q: Some("wc1".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_bikes(&bikes, &filter).len(), 2);

        let filter = CatalogFilter {
            year: Some(2024),
            ..Default::default()
        };
        assert!(filter_bikes(&bikes, &filter).is_empty());
    }

    #[test]
    fn test_resolve_promoted_slots() {
        let bikes = fleet();
        let promoted = PromotedBikes {
            slots: [Some("SE501".to_string()), None, Some("GONE1".to_string())],
        };
        let resolved = resolve_promoted(&promoted, &bikes);
        assert_eq!(resolved[0].map(|b| b.id.as_str()), Some("4"));
        assert!(resolved[1].is_none());
        assert!(resolved[2].is_none());
    }

    #[test]
    fn test_sort_bikes_by_model_number() {
        let mut bikes = fleet();
        sort_bikes(&mut bikes);
        let numbers: Vec<&str> = bikes.iter().map(|b| b.model_number.as_str()).collect();
        assert_eq!(numbers, vec!["SE501", "WC101", "WC102", "WC209"]);
    }
}
