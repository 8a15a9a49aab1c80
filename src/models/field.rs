// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Field-level access to bike records.
//!
//! Grid edits and the PATCH endpoint address single fields by name and
//! compare values by type rather than by their textual spelling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::bike::{derive_is_ebike, parse_link, Bike, Category};
use crate::values::{parse_bool, parse_decimal, parse_integer};

const NUMBER_TOLERANCE: f64 = 1e-9;

/// Addressable bike field, named as in the JSON representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BikeField {
    Id,
    Manufacturer,
    ModelName,
    ModelNumber,
    ModelYear,
    FrameMaterial,
    Color,
    Weight,
    Category,
    Price,
    PromoPrice,
    ResellerPrice,
    Pieces,
    Note,
    Image,
    Link,
    Battery,
    IsEbike,
}

/// How a field's values are parsed and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Decimal,
    Integer,
    Boolean,
}

impl BikeField {
    pub const ALL: [BikeField; 18] = [
        BikeField::Id,
        BikeField::Manufacturer,
        BikeField::ModelName,
        BikeField::ModelNumber,
        BikeField::ModelYear,
        BikeField::FrameMaterial,
        BikeField::Color,
        BikeField::Weight,
        BikeField::Category,
        BikeField::Price,
        BikeField::PromoPrice,
        BikeField::ResellerPrice,
        BikeField::Pieces,
        BikeField::Note,
        BikeField::Image,
        BikeField::Link,
        BikeField::Battery,
        BikeField::IsEbike,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BikeField::Id => "id",
            BikeField::Manufacturer => "manufacturer",
            BikeField::ModelName => "modelName",
            BikeField::ModelNumber => "modelNumber",
            BikeField::ModelYear => "modelYear",
            BikeField::FrameMaterial => "frameMaterial",
            BikeField::Color => "color",
            BikeField::Weight => "weight",
            BikeField::Category => "category",
            BikeField::Price => "price",
            BikeField::PromoPrice => "promoPrice",
            BikeField::ResellerPrice => "resellerPrice",
            BikeField::Pieces => "pieces",
            BikeField::Note => "note",
            BikeField::Image => "image",
            BikeField::Link => "link",
            BikeField::Battery => "battery",
            BikeField::IsEbike => "isEbike",
        }
    }

    /// Look up a field by its JSON name.
    pub fn from_name(name: &str) -> Option<BikeField> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Identity, brand, the derived e-bike flag and the image index are
    /// never edited in place.
    pub fn is_editable(&self) -> bool {
        !matches!(
            self,
            BikeField::Id | BikeField::Manufacturer | BikeField::IsEbike | BikeField::Image
        )
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            BikeField::Weight | BikeField::Price | BikeField::PromoPrice | BikeField::ResellerPrice => {
                FieldKind::Decimal
            }
            BikeField::ModelYear | BikeField::Pieces | BikeField::Image => FieldKind::Integer,
            BikeField::IsEbike => FieldKind::Boolean,
            _ => FieldKind::Text,
        }
    }
}

impl std::fmt::Display for BikeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("field '{0}' is not editable")]
    NotEditable(BikeField),

    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: BikeField, reason: String },
}

impl From<FieldError> for crate::error::AppError {
    fn from(err: FieldError) -> Self {
        crate::error::AppError::BadRequest(err.to_string())
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl FieldValue {
    /// Parse text typed into a cell for `field`.
    pub fn parse(field: BikeField, raw: &str) -> Result<FieldValue, FieldError> {
        let invalid = |reason: &str| FieldError::Invalid {
            field,
            reason: reason.to_string(),
        };
        match field.kind() {
            FieldKind::Text if field == BikeField::Category => Ok(FieldValue::Text(
                Category::parse_lenient(raw).as_str().to_string(),
            )),
            FieldKind::Text => Ok(FieldValue::Text(raw.trim().to_string())),
            FieldKind::Decimal => parse_decimal(raw)
                .map(FieldValue::Number)
                .ok_or_else(|| invalid("not a number")),
            FieldKind::Integer => parse_integer(raw)
                .map(|v| FieldValue::Number(v as f64))
                .ok_or_else(|| invalid("not a whole number")),
            FieldKind::Boolean => parse_bool(raw)
                .map(FieldValue::Bool)
                .ok_or_else(|| invalid("not a boolean")),
        }
    }

    /// Interpret a JSON value submitted for `field`.
    pub fn from_json(field: BikeField, value: &serde_json::Value) -> Result<FieldValue, FieldError> {
        use serde_json::Value;

        let invalid = |reason: &str| FieldError::Invalid {
            field,
            reason: reason.to_string(),
        };
        match (field.kind(), value) {
            (_, Value::String(raw)) => Self::parse(field, raw),
            (FieldKind::Decimal | FieldKind::Integer, Value::Number(n)) => n
                .as_f64()
                .map(FieldValue::Number)
                .ok_or_else(|| invalid("number out of range")),
            (FieldKind::Boolean, Value::Bool(b)) => Ok(FieldValue::Bool(*b)),
            (FieldKind::Text, Value::Null) => Ok(FieldValue::Text(String::new())),
            (FieldKind::Text, Value::Number(n)) => Self::parse(field, &n.to_string()),
            _ => Err(invalid("unexpected JSON type")),
        }
    }

    /// Type-aware equality: numbers within tolerance, booleans exactly,
    /// anything else by trimmed text.
    pub fn same_as(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => (a - b).abs() < NUMBER_TOLERANCE,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            _ => self.to_string().trim() == other.to_string().trim(),
        }
    }

    fn as_whole(&self, field: BikeField) -> Result<i64, FieldError> {
        match self {
            FieldValue::Number(v) if v.fract() == 0.0 => Ok(*v as i64),
            FieldValue::Text(raw) => parse_integer(raw).ok_or(FieldError::Invalid {
                field,
                reason: "not a whole number".to_string(),
            }),
            _ => Err(FieldError::Invalid {
                field,
                reason: "not a whole number".to_string(),
            }),
        }
    }

    fn as_decimal(&self, field: BikeField) -> Result<f64, FieldError> {
        match self {
            FieldValue::Number(v) => Ok(*v),
            FieldValue::Text(raw) => parse_decimal(raw).ok_or(FieldError::Invalid {
                field,
                reason: "not a number".to_string(),
            }),
            FieldValue::Bool(_) => Err(FieldError::Invalid {
                field,
                reason: "not a number".to_string(),
            }),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Set of field changes for one row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BikePatch {
    pub changes: BTreeMap<BikeField, FieldValue>,
}

impl BikePatch {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn fields(&self) -> Vec<BikeField> {
        self.changes.keys().copied().collect()
    }
}

/// Keep only the edits that really differ from `server`.
pub fn diff_fields(
    server: &Bike,
    edits: impl IntoIterator<Item = (BikeField, FieldValue)>,
) -> BikePatch {
    let changes = edits
        .into_iter()
        .filter(|(field, value)| !server.field_value(*field).same_as(value))
        .collect();
    BikePatch { changes }
}

impl Bike {
    pub fn field_value(&self, field: BikeField) -> FieldValue {
        match field {
            BikeField::Id => FieldValue::Text(self.id.clone()),
            BikeField::Manufacturer => FieldValue::Text(self.manufacturer.clone()),
            BikeField::ModelName => FieldValue::Text(self.model_name.clone()),
            BikeField::ModelNumber => FieldValue::Text(self.model_number.clone()),
            BikeField::ModelYear => FieldValue::Number(self.model_year as f64),
            BikeField::FrameMaterial => FieldValue::Text(self.frame_material.clone()),
            BikeField::Color => FieldValue::Text(self.color.clone()),
            BikeField::Weight => FieldValue::Number(self.weight),
            BikeField::Category => FieldValue::Text(self.category.as_str().to_string()),
            BikeField::Price => FieldValue::Number(self.price),
            BikeField::PromoPrice => FieldValue::Number(self.promo_price),
            BikeField::ResellerPrice => FieldValue::Number(self.reseller_price),
            BikeField::Pieces => FieldValue::Number(self.pieces as f64),
            BikeField::Note => FieldValue::Text(self.note.clone()),
            BikeField::Image => FieldValue::Number(self.image as f64),
            BikeField::Link => FieldValue::Text(self.link.clone().unwrap_or_default()),
            BikeField::Battery => FieldValue::Text(self.battery.clone()),
            BikeField::IsEbike => FieldValue::Bool(self.is_ebike),
        }
    }

    /// Set one editable field.
    pub fn set_field(&mut self, field: BikeField, value: &FieldValue) -> Result<(), FieldError> {
        if !field.is_editable() {
            return Err(FieldError::NotEditable(field));
        }
        let text = || value.to_string().trim().to_string();
        let non_negative = |v: i64| {
            u32::try_from(v).map_err(|_| FieldError::Invalid {
                field,
                reason: "must be a non-negative whole number".to_string(),
            })
        };

        match field {
            BikeField::ModelName => {
                let name = text();
                if name.is_empty() {
                    return Err(FieldError::Invalid {
                        field,
                        reason: "model name must not be empty".to_string(),
                    });
                }
                self.model_name = name;
            }
            BikeField::ModelNumber => self.model_number = text(),
            BikeField::ModelYear => {
                self.model_year = i32::try_from(value.as_whole(field)?).map_err(|_| {
                    FieldError::Invalid {
                        field,
                        reason: "year out of range".to_string(),
                    }
                })?
            }
            BikeField::FrameMaterial => self.frame_material = text(),
            BikeField::Color => self.color = text(),
            BikeField::Weight => self.weight = value.as_decimal(field)?,
            BikeField::Category => self.category = Category::parse_lenient(&text()),
            BikeField::Price => self.price = value.as_decimal(field)?,
            BikeField::PromoPrice => self.promo_price = value.as_decimal(field)?,
            BikeField::ResellerPrice => self.reseller_price = value.as_decimal(field)?,
            BikeField::Pieces => self.pieces = non_negative(value.as_whole(field)?)?,
            BikeField::Note => self.note = value.to_string(),
            BikeField::Link => {
                let link = text();
                self.link = if link.is_empty() {
                    None
                } else {
                    Some(parse_link(&link).ok_or_else(|| FieldError::Invalid {
                        field,
                        reason: "link must start with http:// or https://".to_string(),
                    })?)
                };
            }
            BikeField::Battery => self.battery = text(),
            BikeField::Id | BikeField::Manufacturer | BikeField::IsEbike | BikeField::Image => {
                return Err(FieldError::NotEditable(field))
            }
        }
        Ok(())
    }

    /// Apply a patch and recompute derived fields.
    pub fn apply_patch(&mut self, patch: &BikePatch, now: &str) -> Result<(), FieldError> {
        for (field, value) in &patch.changes {
            self.set_field(*field, value)?;
        }
        self.is_ebike = derive_is_ebike(&self.battery);
        self.updated_at = now.to_string();
        Ok(())
    }
}
