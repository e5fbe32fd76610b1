//! Environment configuration

use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::aggregates::DEFAULT_SHIPPING;
use crate::domain::listing::DEFAULT_PAGE_SIZE;
use crate::StorefrontError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_PORT: u16 = 8083;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Storefront backend base URL, without trailing slash
    pub api_url: String,
    /// Gateway listen port
    pub port: u16,
    pub page_size: u32,
    /// Flat shipping added to every cart
    pub shipping: Decimal,
    pub http_timeout: Duration,
    /// Where the signed-in session is persisted, if anywhere
    pub session_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            port: DEFAULT_PORT,
            page_size: DEFAULT_PAGE_SIZE,
            shipping: DEFAULT_SHIPPING,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            session_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, StorefrontError> { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Builds a config from `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StorefrontError> {
        let defaults = Self::default();
        let page_size: u32 = parse_or(&lookup, "PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 { return Err(StorefrontError::Config("PAGE_SIZE must be at least 1".into())); }
        Ok(Self {
            api_url: lookup("STOREFRONT_API_URL").map_or(defaults.api_url, |url| url.trim_end_matches('/').to_string()),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            page_size,
            shipping: parse_or(&lookup, "SHIPPING_FLAT", defaults.shipping)?,
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?),
            session_file: lookup("SESSION_FILE").filter(|p| !p.is_empty()).map(PathBuf::from),
        })
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, StorefrontError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| StorefrontError::Config(format!("{key}: {e}"))),
    }
}
