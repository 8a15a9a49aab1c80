// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bike record model for storage and API.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of trailing model-number characters that encode the frame size.
pub const SIZE_SUFFIX_LEN: usize = 2;

/// Catalog category (closed set).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "MTB")]
    Mtb,
    Road,
    Gravel,
    City,
    Trekking,
    Kids,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Mtb,
        Category::Road,
        Category::Gravel,
        Category::City,
        Category::Trekking,
        Category::Kids,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mtb => "MTB",
            Category::Road => "Road",
            Category::Gravel => "Gravel",
            Category::City => "City",
            Category::Trekking => "Trekking",
            Category::Kids => "Kids",
            Category::Other => "Other",
        }
    }

    /// Match a free-text category, falling back to `Other`.
    ///
    /// E-bike spellings such as "E-MTB" or "eTrekking" map to their base
    /// category; electric status is derived from the battery field instead.
    pub fn parse_lenient(raw: &str) -> Category {
        let lowered = raw.trim().to_lowercase();
        let exact = Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(&lowered));
        if let Some(category) = exact {
            return category;
        }

        let base = lowered
            .strip_prefix("e-")
            .or_else(|| lowered.strip_prefix('e'))
            .unwrap_or(&lowered);
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(base))
            .unwrap_or(Category::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Electric status follows from battery text, never from a submitted flag.
pub fn derive_is_ebike(battery: &str) -> bool {
    !battery.trim().is_empty()
}

/// Model-family key: the model number without its size suffix.
pub fn model_family(model_number: &str) -> &str {
    let count = model_number.chars().count();
    if count <= SIZE_SUFFIX_LEN {
        return model_number;
    }
    let cut = model_number
        .char_indices()
        .nth(count - SIZE_SUFFIX_LEN)
        .map(|(idx, _)| idx)
        .unwrap_or(model_number.len());
    &model_number[..cut]
}

/// Frame-size code: the last two characters of the model number.
pub fn size_code(model_number: &str) -> &str {
    let family = model_family(model_number);
    if family.len() == model_number.len() {
        ""
    } else {
        &model_number[family.len()..]
    }
}

/// Link prefixes a spreadsheet hyperlink can carry.
const LINK_SCHEMES: [&str; 5] = ["http://", "https://", "ftp://", "ftps://", "mailto:"];

/// The trimmed link, or `None` without a supported scheme.
pub fn parse_link(raw: &str) -> Option<String> {
    let link = raw.trim();
    let lowered = link.to_ascii_lowercase();
    LINK_SCHEMES
        .iter()
        .any(|scheme| lowered.len() > scheme.len() && lowered.starts_with(scheme))
        .then(|| link.to_string())
}

/// Resolve an image index to its static asset path.
pub fn image_path(base_path: &str, image: u32) -> String {
    format!("{base_path}/jpeg/{image}.jpeg")
}

/// Stored bike record in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bike {
    /// Store-assigned identifier (also used as document ID)
    pub id: String,
    pub manufacturer: String,
    pub model_name: String,
    /// Catalog code; the final two characters encode frame size
    pub model_number: String,
    pub model_year: i32,
    pub frame_material: String,
    pub color: String,
    /// Weight in kilograms
    pub weight: f64,
    pub category: Category,
    /// Retail price
    pub price: f64,
    pub promo_price: f64,
    pub reseller_price: f64,
    pub pieces: u32,
    pub note: String,
    /// Image-asset index, see [`image_path`]
    pub image: u32,
    pub link: Option<String>,
    pub battery: String,
    pub is_ebike: bool,
    /// Incremented on every write, used for optimistic concurrency
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub updated_at: String,
}

impl Bike {
    /// Build a record from submitted fields. `id` may be empty until stored.
    pub fn from_input(id: String, input: BikeInput, brand: &str, current_year: i32, now: &str) -> Self {
        let mut bike = Self {
            id,
            manufacturer: brand.to_string(),
            model_name: String::new(),
            model_number: String::new(),
            model_year: current_year,
            frame_material: String::new(),
            color: String::new(),
            weight: 0.0,
            category: Category::Other,
            price: 0.0,
            promo_price: 0.0,
            reseller_price: 0.0,
            pieces: 0,
            note: String::new(),
            image: 0,
            link: None,
            battery: String::new(),
            is_ebike: false,
            version: 0,
            updated_at: String::new(),
        };
        bike.replace_with(input, current_year, now);
        bike
    }

    /// Overwrite every editable field with `input`.
    ///
    /// Identity, manufacturer and version are left untouched.
    pub fn replace_with(&mut self, input: BikeInput, current_year: i32, now: &str) {
        self.model_name = input.model_name.trim().to_string();
        self.model_number = input.model_number.trim().to_string();
        self.model_year = input.model_year.unwrap_or(current_year);
        self.frame_material = input.frame_material.trim().to_string();
        self.color = input.color.trim().to_string();
        self.weight = input.weight;
        self.category = input.category;
        self.price = input.price;
        self.promo_price = input.promo_price;
        self.reseller_price = input.reseller_price;
        self.pieces = input.pieces;
        self.note = input.note;
        self.image = input.image;
        self.link = input.link.as_deref().and_then(parse_link);
        self.battery = input.battery.trim().to_string();
        self.is_ebike = derive_is_ebike(&self.battery);
        self.updated_at = now.to_string();
    }

    pub fn family(&self) -> &str {
        model_family(&self.model_number)
    }

    pub fn size(&self) -> &str {
        size_code(&self.model_number)
    }
}

/// Bike fields accepted from admin forms and produced by CSV normalization.
///
/// Unknown JSON keys (including `isEbike`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct BikeInput {
    #[validate(custom(function = "validate_not_blank"))]
    pub model_name: String,
    pub model_number: String,
    pub model_year: Option<i32>,
    pub frame_material: String,
    pub color: String,
    #[validate(range(min = 0.0))]
    pub weight: f64,
    pub category: Category,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    pub promo_price: f64,
    #[validate(range(min = 0.0))]
    pub reseller_price: f64,
    pub pieces: u32,
    pub note: String,
    pub image: u32,
    #[validate(custom(function = "validate_link"))]
    pub link: Option<String>,
    pub battery: String,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_link(value: &str) -> Result<(), validator::ValidationError> {
    if !value.trim().is_empty() && parse_link(value).is_none() {
        return Err(validator::ValidationError::new("link_scheme"));
    }
    Ok(())
}

/// Bike as shown in the public catalog (no reseller pricing).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBike {
    pub id: String,
    pub manufacturer: String,
    pub model_name: String,
    pub model_number: String,
    pub model_year: i32,
    pub frame_material: String,
    pub color: String,
    pub weight: f64,
    pub category: Category,
    pub price: f64,
    pub promo_price: f64,
    pub pieces: u32,
    pub image_url: String,
    pub link: Option<String>,
    pub battery: String,
    pub is_ebike: bool,
}

impl PublicBike {
    pub fn from_bike(bike: &Bike, base_path: &str) -> Self {
        Self {
            id: bike.id.clone(),
            manufacturer: bike.manufacturer.clone(),
            model_name: bike.model_name.clone(),
            model_number: bike.model_number.clone(),
            model_year: bike.model_year,
            frame_material: bike.frame_material.clone(),
            color: bike.color.clone(),
            weight: bike.weight,
            category: bike.category,
            price: bike.price,
            promo_price: bike.promo_price,
            pieces: bike.pieces,
            image_url: image_path(base_path, bike.image),
            link: bike.link.clone(),
            battery: bike.battery.clone(),
            is_ebike: bike.is_ebike,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(model_name: &str, battery: &str) -> BikeInput {
        BikeInput {
            model_name: model_name.to_string(),
            model_number: "WC101".to_string(),
            battery: battery.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_ebike_follows_battery() {
        let bike = Bike::from_input(String::new(), input("Sonic", "  "), "Bulls", 2026, "now");
        assert!(!bike.is_ebike);

        let bike = Bike::from_input(
            String::new(),
            input("Sonic EVO", "Bosch 750Wh"),
            "Bulls",
            2026,
            "now",
        );
        assert!(bike.is_ebike);
        assert_eq!(bike.battery, "Bosch 750Wh");
    }

    #[test]
    fn test_replace_recomputes_ebike() {
        let mut bike = Bike::from_input(
            "b1".to_string(),
            input("Sonic EVO", "Bosch 750Wh"),
            "Bulls",
            2026,
            "now",
        );
        bike.replace_with(input("Sonic EVO", ""), 2026, "later");
        assert!(!bike.is_ebike);
        assert_eq!(bike.id, "b1");
        assert_eq!(bike.updated_at, "later");
    }

    #[test]
    fn test_model_family_grouping() {
        assert_eq!(model_family("WC101"), "WC1");
        assert_eq!(model_family("WC102"), model_family("WC101"));
        assert_ne!(model_family("WC209"), model_family("WC101"));
        assert_eq!(size_code("WC101"), "01");
        assert_eq!(model_family("AB"), "AB");
        assert_eq!(size_code("AB"), "");
        assert_eq!(model_family("ŽK548"), "ŽK5");
    }

    #[test]
    fn test_category_parse_lenient() {
        assert_eq!(Category::parse_lenient("mtb"), Category::Mtb);
        assert_eq!(Category::parse_lenient(" Road "), Category::Road);
        assert_eq!(Category::parse_lenient("E-MTB"), Category::Mtb);
        assert_eq!(Category::parse_lenient("eTrekking"), Category::Trekking);
        assert_eq!(Category::parse_lenient("tandem"), Category::Other);
        assert_eq!(Category::parse_lenient(""), Category::Other);
    }

    #[test]
    fn test_image_path_respects_base_path() {
        assert_eq!(image_path("", 7), "/jpeg/7.jpeg");
        assert_eq!(image_path("/inventory", 7), "/inventory/jpeg/7.jpeg");
    }

    #[test]
    fn test_input_ignores_submitted_ebike_flag() {
        let input: BikeInput =
            serde_json::from_str(r#"{"modelName":"Cross","isEbike":true}"#).unwrap();
        let bike = Bike::from_input(String::new(), input, "Bulls", 2026, "now");
        assert!(!bike.is_ebike);
    }

    #[test]
    fn test_parse_link_requires_scheme() {
        assert_eq!(parse_link(" https://bulls.de "), Some("https://bulls.de".to_string()));
        assert_eq!(parse_link("MAILTO:shop@bulls.de"), Some("MAILTO:shop@bulls.de".to_string()));
        assert_eq!(parse_link("www.bulls.de"), None);
        assert_eq!(parse_link("javascript:alert(1)"), None);
        assert_eq!(parse_link("https://"), None);
    }

    #[test]
    fn test_input_validation_rejects_bad_link() {
        let mut bad = input("Cross", "");
        bad.link = Some("www.bulls.de".to_string());
        assert!(bad.validate().is_err());

        let mut blank = input("Cross", "");
        blank.link = Some("  ".to_string());
        assert!(blank.validate().is_ok());
        let bike = Bike::from_input(String::new(), blank, "Bulls", 2026, "now");
        assert_eq!(bike.link, None);
    }

    #[test]
    fn test_input_validation_rejects_blank_name() {
        assert!(input("  ", "").validate().is_err());
        assert!(input("Cross", "").validate().is_ok());
    }
}
