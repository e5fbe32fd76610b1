//! Filter criteria and their translation into backend query parameters

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::catalog::SeasonCalendar;
use crate::domain::value_objects::CountryCode;

/// Lower price sentinel; a minimum at or below it is not sent.
pub const PRICE_FLOOR: Decimal = Decimal::ZERO;
/// Upper price sentinel; a maximum at or above it is not sent.
pub const PRICE_CEILING: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
}

impl SortOption {
    /// The single query parameter this sort contributes.
    pub fn query_param(&self) -> (&'static str, QueryValue) {
        match self {
            Self::Featured => ("featured", QueryValue::Bool(true)),
            Self::PriceLow => ("ordering", QueryValue::text("price")),
            Self::PriceHigh => ("ordering", QueryValue::text("-price")),
            Self::Rating => ("ordering", QueryValue::text("-rating")),
            Self::Newest => ("ordering", QueryValue::text("-created_at")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange { pub min: Decimal, pub max: Decimal }

impl Default for PriceRange {
    fn default() -> Self { Self { min: PRICE_FLOOR, max: PRICE_CEILING } }
}

/// Shopper-selected listing filters.
///
/// `country` and `local_only` are mutually exclusive; use [`FilterCriteria::select_country`]
/// and [`FilterCriteria::set_local_only`] to keep them that way.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: String,
    pub categories: Vec<String>,
    pub price_range: PriceRange,
    pub min_rating: Option<u8>,
    pub sort: SortOption,
    pub country: Option<CountryCode>,
    pub season: Option<u32>,
    pub local_only: bool,
}

impl FilterCriteria {
    pub fn toggle_category(&mut self, slug: &str, checked: bool) {
        if checked {
            if !self.categories.iter().any(|c| c == slug) { self.categories.push(slug.to_string()); }
        } else {
            self.categories.retain(|c| c != slug);
        }
    }

    pub fn select_country(&mut self, country: Option<CountryCode>) {
        if country.is_some() { self.local_only = false; }
        self.country = country;
    }

    pub fn set_local_only(&mut self, local_only: bool) {
        if local_only { self.country = None; }
        self.local_only = local_only;
    }

    pub fn clear(&mut self) { *self = Self::default(); }

    /// Backend query for these criteria against `calendar`.
    pub fn to_query(&self, user_country: Option<&CountryCode>, calendar: &SeasonCalendar) -> QueryParams {
        let mut params = QueryParams::default();

        let search = self.search.trim();
        if !search.is_empty() { params.insert("search", QueryValue::text(search)); }

        if !self.categories.is_empty() { params.insert("category", QueryValue::Text(self.categories.join(","))); }

        if self.price_range.min > PRICE_FLOOR { params.insert("min_price", QueryValue::Decimal(self.price_range.min)); }
        if self.price_range.max < PRICE_CEILING { params.insert("max_price", QueryValue::Decimal(self.price_range.max)); }

        if let Some(rating) = self.min_rating.filter(|r| *r > 0) {
            params.insert("min_rating", QueryValue::Int(i64::from(rating)));
        }

        let country = self.country.as_ref().or(if self.local_only { user_country } else { None });
        if let Some(country) = country { params.insert("country", QueryValue::text(country.as_str())); }

        if let Some(season) = self.season.and_then(|id| calendar.find(id)) {
            params.insert("season", QueryValue::Int(i64::from(season.id)));
            params.insert("hemisphere", QueryValue::text(season.hemisphere.as_str()));
        }

        let (key, value) = self.sort.query_param();
        params.insert(key, value);

        if let Some(country) = user_country { params.insert("user_country", QueryValue::text(country.as_str())); }

        tracing::debug!(?params, "built product query");
        params
    }
}

/// Query for `criteria` against the standard season calendar.
pub fn build_query(criteria: &FilterCriteria, user_country: Option<&CountryCode>) -> QueryParams {
    criteria.to_query(user_country, SeasonCalendar::standard())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Bool(bool),
}

impl QueryValue {
    pub fn text(value: impl Into<String>) -> Self { Self::Text(value.into()) }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{}", d.normalize()),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Ordered query parameter set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<&'static str, QueryValue>);

impl QueryParams {
    pub fn insert(&mut self, key: &'static str, value: QueryValue) { self.0.insert(key, value); }
    pub fn get(&self, key: &str) -> Option<&QueryValue> { self.0.get(key) }
    pub fn contains(&self, key: &str) -> bool { self.0.contains_key(key) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &QueryValue)> { self.0.iter().map(|(k, v)| (*k, v)) }

    /// Flattened into string pairs for a URL query.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> { self.iter().map(|(k, v)| (k, v.to_string())).collect() }
}
