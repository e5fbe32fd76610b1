//! Storefront domain: reference data, listing engine, cart/checkout/payment flows, state stores
pub mod aggregates;
pub mod catalog;
pub mod listing;
pub mod store;
pub mod value_objects;
