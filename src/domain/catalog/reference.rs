//! Static country and category tables

use serde::Serialize;
use std::sync::OnceLock;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Country { pub code: &'static str, pub name: &'static str }

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category { pub id: u32, pub slug: &'static str, pub name: &'static str }

#[derive(Clone, Debug, Serialize)]
pub struct ReferenceData {
    pub countries: Vec<Country>,
    pub categories: Vec<Category>,
}

impl ReferenceData {
    pub fn standard() -> &'static ReferenceData {
        static DATA: OnceLock<ReferenceData> = OnceLock::new();
        DATA.get_or_init(|| {
            let countries = [
                ("US", "United States"), ("GB", "United Kingdom"), ("CA", "Canada"), ("AU", "Australia"),
                ("DE", "Germany"), ("FR", "France"), ("JP", "Japan"), ("CN", "China"), ("IN", "India"),
                ("BR", "Brazil"), ("ZA", "South Africa"), ("NG", "Nigeria"), ("KE", "Kenya"), ("ZW", "Zimbabwe"),
            ]
            .into_iter()
            .map(|(code, name)| Country { code, name })
            .collect();
            let categories = [
                (1, "electronics", "Electronics"),
                (2, "clothing", "Clothing"),
                (3, "home-kitchen", "Home & Kitchen"),
                (4, "beauty-personal-care", "Beauty & Personal Care"),
                (5, "sports-outdoors", "Sports & Outdoors"),
            ]
            .into_iter()
            .map(|(id, slug, name)| Category { id, slug, name })
            .collect();
            Self { countries, categories }
        })
    }

    /// Display name for a country code, falling back to the code itself.
    pub fn country_name<'a>(&self, code: &'a str) -> &'a str {
        self.countries.iter().find(|c| c.code.eq_ignore_ascii_case(code)).map_or(code, |c| c.name)
    }

    pub fn category(&self, slug: &str) -> Option<&Category> { self.categories.iter().find(|c| c.slug == slug) }
}
