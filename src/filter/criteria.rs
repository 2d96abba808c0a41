use crate::error::{AppError, AppResult};
use crate::product::{parse_date, Product};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One independently toggled filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Name,
    ExpirationDate,
    ProductionDate,
    TypeOfProduct,
    Volume,
    Weight,
    Taste,
    SugarAndSalt,
}

impl FilterKind {
    pub const ALL: [FilterKind; 8] = [
        FilterKind::Name,
        FilterKind::ExpirationDate,
        FilterKind::ProductionDate,
        FilterKind::TypeOfProduct,
        FilterKind::Volume,
        FilterKind::Weight,
        FilterKind::Taste,
        FilterKind::SugarAndSalt,
    ];
}

/// Tri-state constraint on a boolean product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Attribute must be true
    Required,
    /// Attribute must be false
    Excluded,
    #[default]
    Disabled,
}

impl Requirement {
    pub fn matches(self, value: bool) -> bool {
        match self {
            Requirement::Required => value,
            Requirement::Excluded => !value,
            Requirement::Disabled => true,
        }
    }
}

/// Date bounds, each optional. Both open means the slot is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    /// Build a range from user-typed `YYYY-MM-DD` text.
    ///
    /// Absent or blank bounds stay open. Unparsable text and `since` after
    /// `until` are rejected so they never reach the engine.
    pub fn parse(since: Option<&str>, until: Option<&str>) -> AppResult<Self> {
        let since = parse_bound(since)?;
        let until = parse_bound(until)?;
        if let (Some(s), Some(u)) = (since, until) {
            if s > u {
                return Err(AppError::validation(format!(
                    "date range starts after it ends ({} > {})",
                    s, u
                )));
            }
        }
        Ok(Self { since, until })
    }

    pub fn is_active(&self) -> bool {
        self.since.is_some() || self.until.is_some()
    }

    /// Undated products never fall inside an active range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return false;
        };
        self.since.map_or(true, |since| date >= since) && self.until.map_or(true, |until| date <= until)
    }
}

fn parse_bound(value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(text)
            .map(Some)
            .ok_or_else(|| AppError::validation(format!("invalid date: {}", text))),
    }
}

/// Inclusive integer bounds. `(-1, -1)` is the disabled sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: i32,
    pub max: i32,
}

impl ValueRange {
    pub const DISABLED: ValueRange = ValueRange { min: -1, max: -1 };

    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Validating constructor for user input.
    pub fn checked(min: i32, max: i32) -> AppResult<Self> {
        if min < 0 || max < 0 {
            return Err(AppError::validation(format!(
                "range bounds must not be negative ({}, {})",
                min, max
            )));
        }
        if min > max {
            return Err(AppError::validation(format!(
                "range minimum exceeds maximum ({} > {})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn is_active(&self) -> bool {
        *self != Self::DISABLED
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::DISABLED
    }
}

/// New value for a single slot. `None`/open/sentinel payloads disable the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Criterion {
    Name(Option<String>),
    ExpirationDate(DateRange),
    ProductionDate(DateRange),
    TypeOfProduct {
        type_of_product: Option<String>,
        product_features: Option<String>,
    },
    Volume(ValueRange),
    Weight(ValueRange),
    Taste(Option<String>),
    SugarAndSalt {
        has_sugar: Requirement,
        has_salt: Requirement,
    },
}

impl Criterion {
    pub fn kind(&self) -> FilterKind {
        match self {
            Criterion::Name(_) => FilterKind::Name,
            Criterion::ExpirationDate(_) => FilterKind::ExpirationDate,
            Criterion::ProductionDate(_) => FilterKind::ProductionDate,
            Criterion::TypeOfProduct { .. } => FilterKind::TypeOfProduct,
            Criterion::Volume(_) => FilterKind::Volume,
            Criterion::Weight(_) => FilterKind::Weight,
            Criterion::Taste(_) => FilterKind::Taste,
            Criterion::SugarAndSalt { .. } => FilterKind::SugarAndSalt,
        }
    }
}

/// Every slot of the product filter. `Default` has all slots disabled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub name: Option<String>,
    pub expiration: DateRange,
    pub production: DateRange,
    pub type_of_product: Option<String>,
    pub product_features: Option<String>,
    pub volume: ValueRange,
    pub weight: ValueRange,
    pub taste: Option<String>,
    pub has_sugar: Requirement,
    pub has_salt: Requirement,
}

impl FilterCriteria {
    /// Overwrite the slot named by `criterion`.
    pub fn apply(&mut self, criterion: Criterion) {
        match criterion {
            Criterion::Name(name) => {
                // An empty needle matches everything, so it is the same as no filter
                self.name = name.filter(|n| !n.is_empty());
            }
            Criterion::ExpirationDate(range) => self.expiration = range,
            Criterion::ProductionDate(range) => self.production = range,
            Criterion::TypeOfProduct {
                type_of_product,
                product_features,
            } => {
                self.type_of_product = type_of_product;
                self.product_features = product_features;
            }
            Criterion::Volume(range) => self.volume = range,
            Criterion::Weight(range) => self.weight = range,
            Criterion::Taste(taste) => self.taste = taste,
            Criterion::SugarAndSalt { has_sugar, has_salt } => {
                self.has_sugar = has_sugar;
                self.has_salt = has_salt;
            }
        }
    }

    pub fn disable(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Name => self.name = None,
            FilterKind::ExpirationDate => self.expiration = DateRange::default(),
            FilterKind::ProductionDate => self.production = DateRange::default(),
            FilterKind::TypeOfProduct => {
                self.type_of_product = None;
                self.product_features = None;
            }
            FilterKind::Volume => self.volume = ValueRange::DISABLED,
            FilterKind::Weight => self.weight = ValueRange::DISABLED,
            FilterKind::Taste => self.taste = None,
            FilterKind::SugarAndSalt => {
                self.has_sugar = Requirement::Disabled;
                self.has_salt = Requirement::Disabled;
            }
        }
    }

    pub fn is_active(&self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Name => self.name.is_some(),
            FilterKind::ExpirationDate => self.expiration.is_active(),
            FilterKind::ProductionDate => self.production.is_active(),
            FilterKind::TypeOfProduct => {
                self.type_of_product.is_some() || self.product_features.is_some()
            }
            FilterKind::Volume => self.volume.is_active(),
            FilterKind::Weight => self.weight.is_active(),
            FilterKind::Taste => self.taste.is_some(),
            FilterKind::SugarAndSalt => {
                self.has_sugar != Requirement::Disabled || self.has_salt != Requirement::Disabled
            }
        }
    }

    pub fn active_kinds(&self) -> Vec<FilterKind> {
        FilterKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active_kinds().is_empty()
    }

    /// Whether `product` passes every active slot.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_kind(FilterKind::Name, product)
            && self.matches_kind(FilterKind::ExpirationDate, product)
            && self.matches_kind(FilterKind::ProductionDate, product)
            && self.matches_kind(FilterKind::TypeOfProduct, product)
            && self.matches_kind(FilterKind::Volume, product)
            && self.matches_kind(FilterKind::Weight, product)
            && self.matches_kind(FilterKind::Taste, product)
            && self.matches_kind(FilterKind::SugarAndSalt, product)
    }

    /// Predicate of a single slot; a disabled slot matches everything.
    pub fn matches_kind(&self, kind: FilterKind, product: &Product) -> bool {
        if !self.is_active(kind) {
            return true;
        }
        match kind {
            FilterKind::Name => self.name.as_deref().map_or(true, |needle| {
                product.name.to_lowercase().contains(&needle.to_lowercase())
            }),
            FilterKind::ExpirationDate => self.expiration.contains(product.expiration()),
            FilterKind::ProductionDate => self.production.contains(product.production()),
            FilterKind::TypeOfProduct => {
                self.type_of_product
                    .as_deref()
                    .map_or(true, |t| product.type_of_product == t)
                    && self
                        .product_features
                        .as_deref()
                        .map_or(true, |f| product.product_features == f)
            }
            FilterKind::Volume => self.volume.contains(product.volume),
            FilterKind::Weight => self.weight.contains(product.weight),
            FilterKind::Taste => self.taste.as_deref().map_or(true, |t| product.taste == t),
            FilterKind::SugarAndSalt => {
                self.has_sugar.matches(product.has_sugar) && self.has_salt.matches(product.has_salt)
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
    fn test_default_criteria_are_all_disabled() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(criteria.volume, ValueRange::DISABLED);
        assert_eq!(criteria.weight, ValueRange::DISABLED);
    }

    #[test]
    fn test_requirement_matches() {
        assert!(Requirement::Required.matches(true));
        assert!(!Requirement::Required.matches(false));
        assert!(Requirement::Excluded.matches(false));
        assert!(!Requirement::Excluded.matches(true));
        assert!(Requirement::Disabled.matches(true));
        assert!(Requirement::Disabled.matches(false));
    }

    #[test]
    fn test_date_range_open_bounds() {
        let since_only = DateRange::new(Some(date(2024, 3, 1)), None);
        assert!(since_only.contains(Some(date(2024, 3, 1))));
        assert!(since_only.contains(Some(date(2099, 1, 1))));
        assert!(!since_only.contains(Some(date(2024, 2, 29))));

        let until_only = DateRange::new(None, Some(date(2024, 3, 1)));
        assert!(until_only.contains(Some(date(2024, 3, 1))));
        assert!(!until_only.contains(Some(date(2024, 3, 2))));

        assert!(!since_only.contains(None));
    }

    #[test]
    fn test_date_range_parse() {
        let range = DateRange::parse(Some("2024-01-01"), Some("")).unwrap();
        assert_eq!(range.since, Some(date(2024, 1, 1)));
        assert_eq!(range.until, None);

        assert!(!DateRange::parse(None, Some("  ")).unwrap().is_active());
        assert!(matches!(
            DateRange::parse(Some("01.02.2024"), None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            DateRange::parse(Some("2024-02-02"), Some("2024-02-01")),
            Err(AppError::Validation(_))
        ));
        assert!(DateRange::parse(Some("2024-02-01"), Some("2024-02-01")).is_ok());
    }

    #[test]
    fn test_value_range_checked() {
        assert_eq!(ValueRange::checked(0, 10).unwrap(), ValueRange::new(0, 10));
        assert!(ValueRange::checked(-1, -1).is_err());
        assert!(ValueRange::checked(5, 1).is_err());
    }

    #[test]
    fn test_value_range_is_inclusive() {
        let range = ValueRange::new(0, 10);
        assert!(range.is_active());
        assert!(range.contains(0));
        assert!(range.contains(10));
        assert!(!range.contains(11));
    }

    #[test]
    fn test_apply_and_disable_each_slot() {
        let mut criteria = FilterCriteria::default();
        let all = [
            Criterion::Name(Some("jam".into())),
            Criterion::ExpirationDate(DateRange::new(None, Some(date(2024, 1, 1)))),
            Criterion::ProductionDate(DateRange::new(Some(date(2023, 1, 1)), None)),
            Criterion::TypeOfProduct {
                type_of_product: Some("Preserves".into()),
                product_features: None,
            },
            Criterion::Volume(ValueRange::new(0, 500)),
            Criterion::Weight(ValueRange::new(100, 200)),
            Criterion::Taste(Some("sweet".into())),
            Criterion::SugarAndSalt {
                has_sugar: Requirement::Required,
                has_salt: Requirement::Disabled,
            },
        ];
        for criterion in all {
            let kind = criterion.kind();
            criteria.apply(criterion);
            assert!(criteria.is_active(kind), "{:?} should be active", kind);
        }
        assert_eq!(criteria.active_kinds().len(), FilterKind::ALL.len());

        for kind in FilterKind::ALL {
            criteria.disable(kind);
            assert!(!criteria.is_active(kind));
        }
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn test_empty_name_disables_slot() {
        let mut criteria = FilterCriteria::default();
        criteria.apply(Criterion::Name(Some(String::new())));
        assert!(!criteria.is_active(FilterKind::Name));
    }

    #[test]
    fn test_sentinel_payload_disables_slot() {
        let mut criteria = FilterCriteria::default();
        criteria.apply(Criterion::Volume(ValueRange::new(1, 2)));
        criteria.apply(Criterion::Volume(ValueRange::DISABLED));
        assert!(!criteria.is_active(FilterKind::Volume));
    }

    #[test]
    fn test_criterion_serialization() {
        let json = serde_json::to_string(&Criterion::Taste(Some("sour".into()))).unwrap();
        assert!(json.contains("\"kind\":\"taste\""));
        let back: Criterion = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), FilterKind::Taste);
    }
}
