//! Cart Aggregate

use rust_decimal::Decimal;
use serde::Serialize;
use crate::domain::value_objects::Money;
use crate::CartItem;

/// Flat shipping charged on every order.
pub const DEFAULT_SHIPPING: Decimal = Decimal::from_parts(599, 0, 0, false, 2);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
    pub item_count: u32,
}

/// A quantity change to send to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantityUpdate { pub item_id: u64, pub quantity: u32 }

/// Local view of the shopper's server-side cart.
#[derive(Clone, Debug)]
pub struct Cart {
    items: Vec<CartItem>,
    shipping: Money,
    currency: String,
    totals: CartTotals,
}

impl Cart {
    pub fn new(shipping: Decimal, currency: &str) -> Self {
        let shipping = Money::new(shipping, currency);
        let totals = CartTotals { subtotal: Money::zero(currency), shipping: shipping.clone(), total: shipping.clone(), item_count: 0 };
        Self { items: vec![], shipping, currency: currency.to_string(), totals }
    }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn totals(&self) -> &CartTotals { &self.totals }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Replaces the items with the backend's latest copy.
    pub fn replace_items(&mut self, items: Vec<CartItem>) {
        self.items = items;
        self.recalculate();
    }

    pub fn clear(&mut self) { self.items.clear(); self.recalculate(); }

    /// Quantities below one are ignored rather than removing the item.
    pub fn quantity_update(&self, item_id: u64, quantity: u32) -> Result<Option<QuantityUpdate>, CartError> {
        if !self.items.iter().any(|i| i.id == item_id) { return Err(CartError::ItemNotFound); }
        if quantity < 1 { return Ok(None); }
        Ok(Some(QuantityUpdate { item_id, quantity }))
    }

    fn recalculate(&mut self) {
        self.totals = compute_totals(&self.items, &self.shipping, &self.currency);
    }
}

/// Subtotal is the sum of unit price times quantity; total adds flat shipping.
pub fn compute_totals(items: &[CartItem], shipping: &Money, currency: &str) -> CartTotals {
    let subtotal = items.iter().fold(Money::zero(currency), |acc, i| {
        acc.add(&Money::new(i.product.price, currency).multiply(i.quantity)).unwrap_or(acc)
    });
    let total = subtotal.add(shipping).unwrap_or_else(|_| subtotal.clone());
    CartTotals { subtotal, shipping: shipping.clone(), total, item_count: items.iter().map(|i| i.quantity).sum() }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum CartError { ItemNotFound }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "Item not found") }
}
