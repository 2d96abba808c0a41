use crate::config::{DATE_FORMAT, SHORT_NAME_MAX_CHARS, UNSET_DATE};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Store-assigned product identifier, stable for the product's lifetime.
pub type ProductId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub type_of_product: String,
    #[serde(default)]
    pub product_features: String,
    #[serde(default)]
    pub taste: String,
    pub expiration_date: String, // "YYYY-MM-DD" or "-" when unset
    #[serde(default = "unset_date")]
    pub production_date: String,
    #[serde(default)]
    pub volume: i32,
    #[serde(default)]
    pub weight: i32,
    #[serde(default)]
    pub has_sugar: bool,
    #[serde(default)]
    pub has_salt: bool,
    // Payload below is carried for the store, never interpreted here
    #[serde(default)]
    pub hash_code: String,
    #[serde(default)]
    pub storage_location: String,
    #[serde(default)]
    pub composition: String,
    #[serde(default)]
    pub healing_properties: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub is_vege: bool,
    #[serde(default)]
    pub is_bio: bool,
    #[serde(default)]
    pub photo_name: String,
    #[serde(default)]
    pub photo_description: String,
}

fn unset_date() -> String {
    UNSET_DATE.to_string()
}

/// Parse a stored product date. The unset sentinel and malformed text both yield `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value == UNSET_DATE {
        return None;
    }
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl Product {
    pub fn new(name: String, expiration_date: String) -> Self {
        Self {
            id: 0, // Will be set by storage
            name,
            type_of_product: String::new(),
            product_features: String::new(),
            taste: String::new(),
            expiration_date,
            production_date: unset_date(),
            volume: 0,
            weight: 0,
            has_sugar: false,
            has_salt: false,
            hash_code: String::new(),
            storage_location: String::new(),
            composition: String::new(),
            healing_properties: String::new(),
            dosage: String::new(),
            is_vege: false,
            is_bio: false,
            photo_name: String::new(),
            photo_description: String::new(),
        }
    }

    pub fn expiration(&self) -> Option<NaiveDate> {
        parse_date(&self.expiration_date)
    }

    pub fn production(&self) -> Option<NaiveDate> {
        parse_date(&self.production_date)
    }

    /// Name trimmed for compact list rows.
    pub fn short_name(&self) -> String {
        if self.name.chars().count() > SHORT_NAME_MAX_CHARS {
            let head: String = self.name.chars().take(SHORT_NAME_MAX_CHARS - 1).collect();
            format!("{}...", head)
        } else {
            self.name.clone()
        }
    }

    /// Whether the product falls inside the reminder window as of `today`,
    /// i.e. `today + lead_days` has reached its expiration date.
    /// Products without a usable expiration date are never expiring.
    pub fn is_expiring_soon(&self, lead_days: u32, today: NaiveDate) -> bool {
        let Some(expiration) = self.expiration() else {
            return false;
        };
        match today.checked_add_days(Days::new(u64::from(lead_days))) {
            Some(window_end) => window_end >= expiration,
            None => {
                warn!(product_id = self.id, lead_days, "lead time overflows the calendar");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unset_and_malformed_dates_parse_as_none() {
        let mut product = Product::new("Jam".to_string(), UNSET_DATE.to_string());
        assert_eq!(product.expiration(), None);

        product.expiration_date = "2024-13-40".to_string();
        assert_eq!(product.expiration(), None);

        product.expiration_date = "2024-02-29".to_string();
        assert_eq!(product.expiration(), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_short_name() {
        let product = Product::new("Strawberry jam".to_string(), UNSET_DATE.to_string());
        assert_eq!(product.short_name(), "Strawberry jam");

        let product = Product::new("Pickled cucumbers with dill".to_string(), UNSET_DATE.to_string());
        assert_eq!(product.short_name(), "Pickled cucumbers...");
        assert_eq!(product.short_name().chars().count(), 20);
    }

    #[test]
    fn test_is_expiring_soon() {
        let product = Product::new("Milk".to_string(), "2024-05-10".to_string());
        assert!(!product.is_expiring_soon(3, date(2024, 5, 6)));
        assert!(product.is_expiring_soon(3, date(2024, 5, 7)));
        assert!(product.is_expiring_soon(3, date(2024, 5, 8)));
        assert!(product.is_expiring_soon(0, date(2024, 5, 10)));
        assert!(!product.is_expiring_soon(0, date(2024, 5, 9)));

        let undated = Product::new("Salt".to_string(), UNSET_DATE.to_string());
        assert!(!undated.is_expiring_soon(3, date(2024, 5, 8)));
    }

    #[test]
    fn test_is_expiring_soon_with_huge_lead_time_does_not_panic() {
        let product = Product::new("Rice".to_string(), "2024-05-10".to_string());
        assert!(!product.is_expiring_soon(u32::MAX, date(2024, 5, 1)));
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let json = r#"{"id":4,"name":"Honey","expiration_date":"2030-01-01"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 4);
        assert_eq!(product.production_date, UNSET_DATE);
        assert!(!product.has_sugar);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2024, 1, 5)), "2024-01-05");
    }
}
