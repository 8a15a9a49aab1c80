// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Turn one parsed CSV row into a complete bike input.

use std::collections::HashMap;

use super::{ColumnMap, SkipReason};
use crate::models::bike::{derive_is_ebike, parse_link};
use crate::models::{BikeField, BikeInput, Category};
use crate::values::{parse_decimal, parse_integer, parse_truthy};

const DEFAULT_PIECES: u32 = 1;
const DEFAULT_IMAGE: u32 = 0;

/// Raw cell text keyed by the field its column maps to.
#[derive(Debug, Clone, Default)]
pub struct BikeDraft {
    values: HashMap<BikeField, String>,
}

impl BikeDraft {
    /// Collect the mapped cells of a row. Later columns win when two map
    /// to the same field and the later one is non-empty.
    pub fn from_row(columns: &ColumnMap, fields: Vec<String>) -> Self {
        let mut values = HashMap::new();
        for (column, value) in columns.columns.iter().zip(fields) {
            let Some(field) = column else { continue };
            if value.is_empty() && values.contains_key(field) {
                continue;
            }
            values.insert(*field, value);
        }
        Self { values }
    }

    pub fn set(&mut self, field: BikeField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: BikeField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    fn text(&self, field: BikeField) -> String {
        self.get(field).unwrap_or("").trim().to_string()
    }

    fn decimal(&self, field: BikeField) -> f64 {
        self.get(field).and_then(parse_decimal).unwrap_or(0.0)
    }

    fn whole(&self, field: BikeField, default: u32) -> u32 {
        self.get(field)
            .and_then(parse_integer)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }

    /// Fill defaults and coerce types.
    ///
    /// The model name is the only required value. Electric status is not
    /// carried over: it is derived from the battery text when the record is
    /// built, and a disagreeing e-bike column is only reported.
    pub fn normalize(&self, current_year: i32) -> Result<BikeInput, SkipReason> {
        let model_name = self.text(BikeField::ModelName);
        if model_name.is_empty() {
            return Err(SkipReason::MissingModelName);
        }

        let battery = self.text(BikeField::Battery);
        if let Some(flag) = self.get(BikeField::IsEbike) {
            let claimed = parse_truthy(flag);
            if claimed != derive_is_ebike(&battery) {
                tracing::debug!(
                    model_name = %model_name,
                    claimed,
                    "E-bike column disagrees with battery data, using battery"
                );
            }
        }

        let model_year = self
            .get(BikeField::ModelYear)
            .and_then(parse_integer)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(current_year);

        let raw_link = self.text(BikeField::Link);
        let link = parse_link(&raw_link);
        if link.is_none() && !raw_link.is_empty() {
            tracing::debug!(model_name = %model_name, link = %raw_link, "Dropping link without a supported scheme");
        }

        Ok(BikeInput {
            model_name,
            model_number: self.text(BikeField::ModelNumber),
            model_year: Some(model_year),
            frame_material: self.text(BikeField::FrameMaterial),
            color: self.text(BikeField::Color),
            weight: self.decimal(BikeField::Weight),
            category: Category::parse_lenient(&self.text(BikeField::Category)),
            price: self.decimal(BikeField::Price),
            promo_price: self.decimal(BikeField::PromoPrice),
            reseller_price: self.decimal(BikeField::ResellerPrice),
            pieces: self.whole(BikeField::Pieces, DEFAULT_PIECES),
            note: self.text(BikeField::Note),
            image: self.whole(BikeField::Image, DEFAULT_IMAGE),
            link,
            battery,
        })
    }
}
