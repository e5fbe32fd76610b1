//! Value Objects for the storefront

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::StorefrontError;

/// Two-letter ISO 3166 country code, stored upper-case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(value: impl Into<String>) -> Result<Self, StorefrontError> {
        let value = value.into().trim().to_ascii_uppercase();
        if value.len() != 2 || !value.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(StorefrontError::InvalidCountryCode(value));
        }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }

    /// Exact match against one token of a comma-joined country list.
    pub fn matches_token(&self, token: &str) -> bool { token.trim().eq_ignore_ascii_case(&self.0) }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl FromStr for CountryCode {
    type Err = StorefrontError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl TryFrom<String> for CountryCode {
    type Error = StorefrontError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self { code.0 }
}

/// Calendar month, 1 through 12.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Month(u32);

impl Month {
    pub fn new(value: u32) -> Result<Self, StorefrontError> {
        if !(1..=12).contains(&value) { return Err(StorefrontError::InvalidMonth(value)); }
        Ok(Self(value))
    }
    pub fn value(&self) -> u32 { self.0 }

    pub fn from_date(date: &impl chrono::Datelike) -> Self { Self(date.month()) }

    /// Wrap-aware membership in `start..=end`; `start > end` spans the year boundary.
    pub fn within(&self, start: u32, end: u32) -> bool {
        if start <= end { start <= self.0 && self.0 <= end } else { self.0 >= start || self.0 <= end }
    }
}

impl TryFrom<u32> for Month {
    type Error = StorefrontError;
    fn try_from(value: u32) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Month> for u32 {
    fn from(month: Month) -> Self { month.0 }
}

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn usd(amount: Decimal) -> Self { Self::new(amount, "USD") }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }
    pub fn multiply(&self, qty: u32) -> Money { Money::new(self.amount * Decimal::from(qty), &self.currency) }
    /// Rounded to cents for display.
    pub fn rounded(&self) -> Money { Money::new(self.amount.round_dp(2), &self.currency) }
}

impl Default for Money { fn default() -> Self { Self::zero("USD") } }

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} {:.2}", self.currency, self.amount) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum MoneyError { CurrencyMismatch }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Currency mismatch") }
}
