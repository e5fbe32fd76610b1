//! Checkout and order placement

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{CartItem, Result, StorefrontError};

/// Shown when the checkout form is incomplete.
pub const INCOMPLETE_FORM_MESSAGE: &str = "Please fill in all required fields and accept the terms.";

pub(crate) fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() { return Err(ValidationError::new("blank")); }
    Ok(())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ShippingInfo {
    #[validate(custom = "not_blank")]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "not_blank")]
    pub address: String,
    #[validate(custom = "not_blank")]
    pub phone: String,
}

#[derive(Clone, Debug, Default)]
pub struct CheckoutForm {
    pub shipping: ShippingInfo,
    pub terms_accepted: bool,
}

impl CheckoutForm {
    pub fn is_valid(&self) -> bool { self.terms_accepted && self.shipping.validate().is_ok() }

    /// Order request for `items`, or the form-incomplete message.
    pub fn place_order(&self, items: &[CartItem]) -> Result<OrderRequest> {
        if !self.is_valid() {
            return Err(StorefrontError::Validation(INCOMPLETE_FORM_MESSAGE.to_string()));
        }
        if items.is_empty() {
            return Err(StorefrontError::Validation("Your cart is empty.".to_string()));
        }
        Ok(OrderRequest {
            shipping: self.shipping.clone(),
            items: items.iter().map(|i| OrderLine { product_id: i.product.id, quantity: i.quantity }).collect(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderRequest {
    #[serde(flatten)]
    pub shipping: ShippingInfo,
    pub items: Vec<OrderLine>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    #[serde(rename = "productId")]
    pub product_id: u64,
    pub quantity: u32,
}

/// Backend reply to a checkout; the shopper is sent on to `payment_url`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: u64,
    pub payment_url: String,
    pub reference_number: String,
}

/// A placed order as the backend reports it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: u64,
    pub product: u64,
    #[serde(default)]
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default)]
    pub total_price: Decimal,
}

/// Backend endpoint serving single orders.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_order(&self, order_id: u64) -> Result<Order>;
}
