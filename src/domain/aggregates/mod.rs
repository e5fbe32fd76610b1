//! Aggregates module
pub mod account;
pub mod cart;
pub mod order;
pub mod payment;

pub use account::{RegisteredUser, Registration, RegistrationForm};
pub use cart::{compute_totals, Cart, CartError, CartTotals, QuantityUpdate, DEFAULT_SHIPPING};
pub use order::{CheckoutForm, Order, OrderItem, OrderLine, OrderRequest, OrderResponse, OrderSource, ShippingInfo};
pub use payment::{Destination, PaymentResult, PaymentReturn, RedirectCountdown, Tick};
