//! OpenSASE Storefront
//!
//! Client core for the OpenSASE storefront backend.
//!
//! ## Features
//! - Seasonal product listing with filters, sorting and pagination
//! - Locality-aware product ranking
//! - Shopping cart totals and checkout
//! - Payment-return redirect flow
//! - Session and cart stores with change notification

pub mod client;
pub mod config;
pub mod domain;
pub mod gateway;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use domain::catalog::{Hemisphere, Season};

// =============================================================================
// Core Types
// =============================================================================

/// Product as served by the storefront backend.
///
/// Prices arrive either as JSON numbers or as decimal strings; both decode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub category: Option<u64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub primary_image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub seasons: Vec<Season>,
    /// Derived locally from the current season.
    #[serde(default)]
    pub is_in_season: bool,
    #[serde(default)]
    pub is_location_specific: bool,
    /// Comma-joined country codes; the backend sends `null` when unset.
    #[serde(default)]
    pub available_countries: Option<String>,
    #[serde(default)]
    pub available_regions: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: u64,
    pub image: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Page envelope returned by list endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self { Self { count: 0, next: None, previous: None, results: Vec::new() } }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartItem {
    pub id: u64,
    pub product: Product,
    pub quantity: u32,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

/// The backend's copy of the shopper's cart.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub id: u64,
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub item_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub product: u64,
    pub user: u64,
    #[serde(default)]
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub helpful_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Signed-in shopper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Product fetch failed: {0}")]
    FetchFailed(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("You must be logged in to perform this action")]
    NotAuthenticated,

    #[error("Invalid country code: {0}")]
    InvalidCountryCode(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for StorefrontError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() { Self::Decode(e.to_string()) } else { Self::FetchFailed(e.to_string()) }
    }
}

impl From<validator::ValidationErrors> for StorefrontError {
    fn from(e: validator::ValidationErrors) -> Self { Self::Validation(e.to_string()) }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
