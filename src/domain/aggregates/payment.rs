//! Payment return flow
//!
//! The payment gateway sends the shopper back with the order reference. On
//! success the storefront loads that order; on cancellation it shows why. In
//! both cases it counts down to a redirect back to the product list, which
//! the shopper may stop.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

use super::order::{Order, OrderSource};

pub const REDIRECT_AFTER_SECS: u32 = 10;
pub const DEFAULT_CANCEL_REASON: &str = "The payment was cancelled.";
pub const MISSING_REFERENCE_MESSAGE: &str = "No order reference found in the URL.";
pub const ORDER_UNAVAILABLE_MESSAGE: &str = "Could not load order details. Please contact customer support.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Products,
    Cart,
    Checkout { order_id: String, retry: bool },
    OrderDetails(String),
}

impl Destination {
    /// Client route with query string.
    pub fn path(&self) -> String {
        match self {
            Self::Products => "/products".to_string(),
            Self::Cart => "/cart".to_string(),
            Self::Checkout { order_id, retry } => format!("/checkout?orderId={order_id}&retry={retry}"),
            Self::OrderDetails(order_id) => format!("/orders/{order_id}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Remaining(u32),
    Redirect,
    Stopped,
}

#[derive(Clone, Debug)]
pub struct RedirectCountdown { remaining: u32, stopped: bool }

impl Default for RedirectCountdown {
    fn default() -> Self { Self::new(REDIRECT_AFTER_SECS) }
}

impl RedirectCountdown {
    pub fn new(seconds: u32) -> Self { Self { remaining: seconds, stopped: false } }
    pub fn remaining(&self) -> u32 { self.remaining }
    pub fn is_stopped(&self) -> bool { self.stopped }

    pub fn tick(&mut self) -> Tick {
        if self.stopped { return Tick::Stopped; }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 { Tick::Redirect } else { Tick::Remaining(self.remaining) }
    }

    pub fn stop(&mut self) {
        self.stopped = true;
        self.remaining = 0;
    }

    /// Ticks every `period` until the redirect fires or `stop` turns true.
    /// Returns the destination, or `None` when stopped.
    pub async fn run(&mut self, period: Duration, mut stop: watch::Receiver<bool>, mut on_tick: impl FnMut(u32)) -> Option<Destination> {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            if *stop.borrow() { self.stop(); }
            tokio::select! {
                _ = interval.tick() => match self.tick() {
                    Tick::Remaining(n) => on_tick(n),
                    Tick::Redirect => { on_tick(0); return Some(Destination::Products); }
                    Tick::Stopped => return None,
                },
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        self.stop();
                        return None;
                    }
                }
            }
        }
    }
}

/// Query parameters the payment gateway sends the shopper back with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentReturn {
    pub order_id: Option<String>,
    pub reason: String,
}

impl PaymentReturn {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let non_empty = |key: &str| params.get(key).filter(|v| !v.is_empty()).cloned();
        Self {
            order_id: non_empty("reference").or_else(|| non_empty("orderId")),
            reason: non_empty("reason").unwrap_or_else(|| DEFAULT_CANCEL_REASON.to_string()),
        }
    }

    /// Back to checkout for the same order, or to the cart when the order is unknown.
    pub fn retry(&self) -> Destination {
        match &self.order_id {
            Some(order_id) => Destination::Checkout { order_id: order_id.clone(), retry: true },
            None => Destination::Cart,
        }
    }

    pub fn order_details(&self) -> Option<Destination> { self.order_id.clone().map(Destination::OrderDetails) }
}

/// What the payment-result page shows once the returned order is looked up.
#[derive(Clone, Debug, PartialEq)]
pub enum PaymentResult {
    Loaded(Order),
    Unavailable { order_id: Option<String>, message: &'static str },
}

impl PaymentResult {
    /// Loads the order named by `ret`; references must be numeric order ids.
    pub async fn load(ret: &PaymentReturn, orders: &dyn OrderSource) -> Self {
        let Some(order_id) = ret.order_id.clone() else {
            warn!("payment result without an order reference");
            return Self::Unavailable { order_id: None, message: MISSING_REFERENCE_MESSAGE };
        };
        let Ok(id) = order_id.parse::<u64>() else {
            warn!(order_id = %order_id, "order reference is not an order id");
            return Self::Unavailable { order_id: Some(order_id), message: ORDER_UNAVAILABLE_MESSAGE };
        };
        match orders.fetch_order(id).await {
            Ok(order) => Self::Loaded(order),
            Err(e) => {
                warn!(error = %e, order_id = id, "error loading order details");
                Self::Unavailable { order_id: Some(order_id), message: ORDER_UNAVAILABLE_MESSAGE }
            }
        }
    }

    pub fn order(&self) -> Option<&Order> {
        match self { Self::Loaded(order) => Some(order), Self::Unavailable { .. } => None }
    }

    pub fn error(&self) -> Option<&str> {
        match self { Self::Loaded(_) => None, Self::Unavailable { message, .. } => Some(*message) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Result, StorefrontError};
    use async_trait::async_trait;

    struct FakeOrders;

    #[async_trait]
    impl OrderSource for FakeOrders {
        async fn fetch_order(&self, order_id: u64) -> Result<Order> {
            if order_id != 55 { return Err(StorefrontError::Api { status: 404, message: "Not found.".into() }); }
            Ok(serde_json::from_value(serde_json::json!({
                "id": 55, "full_name": "Tendai Moyo", "email": "tendai@example.com", "status": "processing",
                "payment_status": "paid", "total_amount": "21.99",
            }))
            .unwrap())
        }
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_countdown_redirects_after_ten_ticks() {
        let mut countdown = RedirectCountdown::default();
        for expected in (1..10).rev() {
            assert_eq!(countdown.tick(), Tick::Remaining(expected));
        }
        assert_eq!(countdown.tick(), Tick::Redirect);
    }

    #[test]
    fn test_stop_prevents_redirect() {
        let mut countdown = RedirectCountdown::default();
        countdown.tick();
        countdown.stop();
        assert_eq!(countdown.remaining(), 0);
        assert_eq!(countdown.tick(), Tick::Stopped);
    }

    #[test]
    fn test_return_params() {
        let ret = PaymentReturn::from_query(&query(&[("orderId", "55"), ("reason", "Card declined")]));
        assert_eq!(ret.order_id.as_deref(), Some("55"));
        assert_eq!(ret.reason, "Card declined");
        assert_eq!(ret.retry().path(), "/checkout?orderId=55&retry=true");

        let ret = PaymentReturn::from_query(&query(&[("reference", "PSP-9"), ("orderId", "55")]));
        assert_eq!(ret.order_id.as_deref(), Some("PSP-9"));

        let ret = PaymentReturn::from_query(&HashMap::new());
        assert_eq!(ret.reason, DEFAULT_CANCEL_REASON);
        assert_eq!(ret.retry(), Destination::Cart);
    }

    #[tokio::test]
    async fn test_result_loads_returned_order() {
        let ret = PaymentReturn::from_query(&query(&[("reference", "55")]));
        let result = PaymentResult::load(&ret, &FakeOrders).await;
        assert_eq!(result.order().map(|o| o.payment_status.as_str()), Some("paid"));
        assert!(result.error().is_none());
        assert_eq!(ret.order_details().unwrap().path(), "/orders/55");
    }

    #[tokio::test]
    async fn test_result_without_reference() {
        let ret = PaymentReturn::from_query(&HashMap::new());
        let result = PaymentResult::load(&ret, &FakeOrders).await;
        assert_eq!(result.error(), Some(MISSING_REFERENCE_MESSAGE));
        assert!(ret.order_details().is_none());
    }

    #[tokio::test]
    async fn test_result_for_unknown_order() {
        let missing = PaymentResult::load(&PaymentReturn::from_query(&query(&[("orderId", "7")])), &FakeOrders).await;
        assert_eq!(missing, PaymentResult::Unavailable { order_id: Some("7".into()), message: ORDER_UNAVAILABLE_MESSAGE });
        let opaque = PaymentResult::load(&PaymentReturn::from_query(&query(&[("reference", "PSP-9")])), &FakeOrders).await;
        assert_eq!(opaque.error(), Some(ORDER_UNAVAILABLE_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reaches_products() {
        let (_tx, rx) = watch::channel(false);
        let mut seen = vec![];
        let mut countdown = RedirectCountdown::new(3);
        let dest = countdown.run(Duration::from_secs(1), rx, |n| seen.push(n)).await;
        assert_eq!(dest, Some(Destination::Products));
        assert_eq!(seen, vec![2, 1, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_signal() {
        let (tx, rx) = watch::channel(false);
        let mut countdown = RedirectCountdown::default();
        let handle = tokio::spawn(async move { countdown.run(Duration::from_secs(1), rx, |_| {}).await });
        tokio::time::sleep(Duration::from_millis(2500)).await;
        tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap(), None);
    }
}
