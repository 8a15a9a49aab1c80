// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Header-name to bike-field mapping.

use crate::models::BikeField;

/// Normalized header spellings and the field each one fills.
const SYNONYMS: &[(&str, BikeField)] = &[
    ("manufacturer", BikeField::Manufacturer),
    ("brand", BikeField::Manufacturer),
    ("make", BikeField::Manufacturer),
    ("modelname", BikeField::ModelName),
    ("model", BikeField::ModelName),
    ("name", BikeField::ModelName),
    ("modelnumber", BikeField::ModelNumber),
    ("modelno", BikeField::ModelNumber),
    ("code", BikeField::ModelNumber),
    ("sku", BikeField::ModelNumber),
    ("catalognumber", BikeField::ModelNumber),
    ("modelyear", BikeField::ModelYear),
    ("year", BikeField::ModelYear),
    ("framematerial", BikeField::FrameMaterial),
    ("material", BikeField::FrameMaterial),
    ("frame", BikeField::FrameMaterial),
    ("color", BikeField::Color),
    ("colour", BikeField::Color),
    ("weight", BikeField::Weight),
    ("weightkg", BikeField::Weight),
    ("category", BikeField::Category),
    ("type", BikeField::Category),
    ("price", BikeField::Price),
    ("retailprice", BikeField::Price),
    ("msrp", BikeField::Price),
    ("promoprice", BikeField::PromoPrice),
    ("promotionalprice", BikeField::PromoPrice),
    ("saleprice", BikeField::PromoPrice),
    ("action", BikeField::PromoPrice),
    ("resellerprice", BikeField::ResellerPrice),
    ("dealerprice", BikeField::ResellerPrice),
    ("b2bprice", BikeField::ResellerPrice),
    ("pieces", BikeField::Pieces),
    ("qty", BikeField::Pieces),
    ("quantity", BikeField::Pieces),
    ("stock", BikeField::Pieces),
    ("count", BikeField::Pieces),
    ("note", BikeField::Note),
    ("notes", BikeField::Note),
    ("comment", BikeField::Note),
    ("image", BikeField::Image),
    ("img", BikeField::Image),
    ("imageurl", BikeField::Image),
    ("imagenumber", BikeField::Image),
    ("imageindex", BikeField::Image),
    ("link", BikeField::Link),
    ("url", BikeField::Link),
    ("producturl", BikeField::Link),
    ("battery", BikeField::Battery),
    ("akku", BikeField::Battery),
    ("isebike", BikeField::IsEbike),
    ("ebike", BikeField::IsEbike),
    ("electric", BikeField::IsEbike),
];

/// Lower-case and drop separators so `Model Name`, `model_name` and
/// `modelName` compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map a CSV header to a bike field.
pub fn map_header(header: &str) -> Option<BikeField> {
    let normalized = normalize_header(header);
    SYNONYMS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, field)| *field)
}

/// Column index to field for a whole header row.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub columns: Vec<Option<BikeField>>,
    pub unmapped: Vec<String>,
}

impl ColumnMap {
    pub fn from_headers(headers: &[String]) -> Self {
        let mut unmapped = Vec::new();
        let columns = headers
            .iter()
            .map(|header| {
                let field = map_header(header);
                if field.is_none() {
                    tracing::warn!(header = %header, "Ignoring unrecognized CSV column");
                    unmapped.push(header.clone());
                }
                field
            })
            .collect();
        Self { columns, unmapped }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn maps(&self, field: BikeField) -> bool {
        self.columns.contains(&Some(field))
    }
}
