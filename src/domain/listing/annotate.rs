//! Season and locality post-processing of fetched products

use crate::domain::catalog::{Hemisphere, Season};
use crate::domain::value_objects::CountryCode;
use crate::Product;

/// Products with no declared seasons, or an unresolved current season, are always in season.
pub fn is_in_season(product: &Product, current: Option<&Season>) -> bool {
    let Some(current) = current else { return true };
    if product.seasons.is_empty() { return true; }
    product.seasons.iter().any(|s| s.id == current.id || s.hemisphere == Hemisphere::Both)
}

/// True when `user_country` is one of the product's comma-delimited available countries.
/// A product without an available-countries list is never local.
pub fn is_local_product(product: &Product, user_country: Option<&CountryCode>) -> bool {
    let (Some(country), Some(countries)) = (user_country, product.available_countries.as_deref()) else { return false };
    countries.split(',').any(|token| country.matches_token(token))
}

pub fn annotate_in_season(products: &mut [Product], current: Option<&Season>) {
    for product in products.iter_mut() {
        product.is_in_season = is_in_season(product, current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::SeasonCalendar;
    use rust_decimal::Decimal;

    fn product(seasons: Vec<Season>, countries: Option<&str>) -> Product {
        Product {
            id: 1, name: "Mazhanje".into(), slug: "mazhanje".into(), description: String::new(),
            price: Decimal::new(500, 2), discount_price: None, category: None, category_name: None,
            stock: 10, featured: false, images: vec![], primary_image: None, rating: 0.0, review_count: 0,
            seasons, is_in_season: false, is_location_specific: true,
            available_countries: countries.map(str::to_string), available_regions: None, created_at: None, updated_at: None,
        }
    }

    fn season(id: u32) -> Season { SeasonCalendar::standard().find(id).cloned().unwrap() }

    #[test]
    fn test_seasonless_product_is_always_in_season() {
        let p = product(vec![], Some(""));
        for s in SeasonCalendar::standard().seasons() {
            assert!(is_in_season(&p, Some(s)));
        }
        assert!(is_in_season(&p, None));
    }

    #[test]
    fn test_unresolved_season_means_in_season() {
        assert!(is_in_season(&product(vec![season(1)], None), None));
    }

    #[test]
    fn test_matches_current_season_id() {
        let p = product(vec![season(2), season(8)], None);
        assert!(is_in_season(&p, Some(&season(8))));
        assert!(!is_in_season(&p, Some(&season(6))));
    }

    #[test]
    fn test_both_hemisphere_season_always_matches() {
        let all_year = Season::new(9, "All Year", 1, 12, Hemisphere::Both);
        let p = product(vec![season(1), all_year], None);
        assert!(is_in_season(&p, Some(&season(3))));
    }

    #[test]
    fn test_local_product_uses_exact_tokens() {
        let us = CountryCode::new("US").unwrap();
        assert!(is_local_product(&product(vec![], Some("US,CA")), Some(&us)));
        assert!(is_local_product(&product(vec![], Some("CA, us")), Some(&us)));
        assert!(!is_local_product(&product(vec![], Some("CAUS")), Some(&us)));
        assert!(!is_local_product(&product(vec![], Some("")), Some(&us)));
        assert!(!is_local_product(&product(vec![], Some("US,CA")), None));
    }

    #[test]
    fn test_missing_country_list_is_not_local() {
        let us = CountryCode::new("US").unwrap();
        assert!(!is_local_product(&product(vec![], None), Some(&us)));
    }

    #[test]
    fn test_annotate_sets_flags() {
        let mut products = vec![product(vec![season(1)], None), product(vec![season(2)], None), product(vec![], Some(""))];
        annotate_in_season(&mut products, Some(&season(1)));
        let flags: Vec<bool> = products.iter().map(|p| p.is_in_season).collect();
        assert_eq!(flags, vec![true, false, true]);
    }
}
