//! HTTP gateway exposing the listing engine to the presentation layer

use axum::{extract::{Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::domain::aggregates::{compute_totals, CartTotals};
use crate::domain::catalog::{Category, Country, Hemisphere, ReferenceData, Season, SeasonCalendar};
use crate::domain::listing::controller::FETCH_FAILED_MESSAGE;
use crate::domain::listing::{page_window, FetchOutcome, FilterCriteria, PageToken, PriceRange, ProductListing, ProductSource, SortOption};
use crate::domain::value_objects::{CountryCode, Money};
use crate::{CartItem, Product, StorefrontError};

pub const CURRENCY: &str = "USD";

#[derive(Clone)]
pub struct AppState { pub source: Arc<dyn ProductSource>, pub page_size: u32, pub shipping: Decimal }

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-storefront"})) }))
        .route("/api/v1/listing", get(listing))
        .route("/api/v1/pages", get(pages))
        .route("/api/v1/seasons/current", get(current_season))
        .route("/api/v1/reference", get(reference))
        .route("/api/v1/cart/summary", post(cart_summary))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

fn bad_request(e: StorefrontError) -> (StatusCode, String) { (StatusCode::BAD_REQUEST, e.to_string()) }

fn parse_country(raw: Option<&str>) -> Result<Option<CountryCode>, StorefrontError> {
    raw.filter(|c| !c.trim().is_empty()).map(CountryCode::new).transpose()
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    /// Comma-joined category slugs
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<u8>,
    pub sort: Option<SortOption>,
    pub country: Option<String>,
    pub season: Option<u32>,
    pub local_only: Option<bool>,
    pub page: Option<u32>,
    pub user_country: Option<String>,
}

impl ListingQuery {
    pub fn to_criteria(&self) -> Result<(FilterCriteria, Option<CountryCode>), StorefrontError> {
        let defaults = PriceRange::default();
        let mut criteria = FilterCriteria {
            search: self.search.clone().unwrap_or_default(),
            categories: self.category.as_deref().unwrap_or_default().split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect(),
            price_range: PriceRange { min: self.min_price.unwrap_or(defaults.min), max: self.max_price.unwrap_or(defaults.max) },
            min_rating: self.min_rating,
            sort: self.sort.unwrap_or_default(),
            season: self.season,
            ..Default::default()
        };
        criteria.set_local_only(self.local_only.unwrap_or(false));
        if let Some(country) = parse_country(self.country.as_deref())? { criteria.select_country(Some(country)); }
        Ok((criteria, parse_country(self.user_country.as_deref())?))
    }
}

#[derive(Debug, Serialize)]
pub struct ListingView {
    pub products: Vec<Product>,
    pub count: u64,
    pub page: u32,
    pub total_pages: u32,
    pub pages: Vec<PageToken>,
    pub current_season: Option<Season>,
}

async fn listing(State(s): State<AppState>, Query(q): Query<ListingQuery>) -> Result<Json<ListingView>, (StatusCode, String)> {
    let (criteria, user_country) = q.to_criteria().map_err(bad_request)?;
    let mut listing = ProductListing::new(s.page_size, user_country, Utc::now());
    let request = listing.restore(criteria, q.page.unwrap_or(1));
    match listing.execute(request, s.source.as_ref()).await {
        FetchOutcome::Applied => Ok(Json(ListingView {
            products: listing.products().to_vec(),
            count: listing.page().count(),
            page: listing.page().current(),
            total_pages: listing.page().total_pages(),
            pages: listing.page_tokens(),
            current_season: listing.current_season().cloned(),
        })),
        FetchOutcome::Failed | FetchOutcome::Stale => {
            Err((StatusCode::BAD_GATEWAY, listing.error().unwrap_or(FETCH_FAILED_MESSAGE).to_string()))
        }
    }
}

#[derive(Debug, Deserialize)] pub struct PagesQuery { pub current: u32, pub total: u32 }

async fn pages(Query(q): Query<PagesQuery>) -> Json<Vec<PageToken>> { Json(page_window(q.current, q.total)) }

#[derive(Debug, Deserialize)] pub struct SeasonQuery { pub country: Option<String> }
#[derive(Debug, Serialize)] pub struct CurrentSeason { pub hemisphere: Hemisphere, pub season: Option<Season> }

async fn current_season(Query(q): Query<SeasonQuery>) -> Result<Json<CurrentSeason>, (StatusCode, String)> {
    let country = parse_country(q.country.as_deref()).map_err(bad_request)?;
    let season = SeasonCalendar::standard().current(Utc::now(), country.as_ref()).cloned();
    Ok(Json(CurrentSeason { hemisphere: Hemisphere::for_country(country.as_ref()), season }))
}

#[derive(Debug, Serialize)]
pub struct Reference { pub seasons: &'static [Season], pub countries: &'static [Country], pub categories: &'static [Category] }

async fn reference() -> Json<Reference> {
    let data = ReferenceData::standard();
    Json(Reference { seasons: SeasonCalendar::standard().seasons(), countries: &data.countries, categories: &data.categories })
}

async fn cart_summary(State(s): State<AppState>, Json(items): Json<Vec<CartItem>>) -> Json<CartTotals> {
    Json(compute_totals(&items, &Money::new(s.shipping, CURRENCY), CURRENCY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{QueryParams, QueryValue};
    use crate::domain::aggregates::DEFAULT_SHIPPING;
    use crate::Paginated;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct FakeSource { fail: bool, seen: Mutex<Vec<QueryParams>> }

    #[async_trait]
    impl ProductSource for FakeSource {
        async fn list_products(&self, params: &QueryParams) -> crate::Result<Paginated<Product>> {
            self.seen.lock().unwrap().push(params.clone());
            if self.fail { return Err(StorefrontError::FetchFailed("backend down".into())); }
            let results = serde_json::from_value(serde_json::json!([
                { "id": 1, "name": "Rooibos", "price": "4.00" },
                { "id": 2, "name": "Marula jam", "price": "6.00",
                  "seasons": [{ "id": 99, "name": "Never", "start_month": 1, "end_month": 1, "hemisphere": "N" }] },
            ]))
            .unwrap();
            Ok(Paginated { count: 20, next: None, previous: None, results })
        }
    }

    fn app(source: Arc<FakeSource>) -> Router {
        router(AppState { source, page_size: 9, shipping: DEFAULT_SHIPPING })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(Arc::default()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_listing_builds_query_and_annotates() {
        let source = Arc::new(FakeSource::default());
        let uri = "/api/v1/listing?search=jam&category=clothing,electronics&min_price=5&sort=price-high&local_only=true&user_country=ZA&page=2";
        let (status, body) = get_json(app(source.clone()), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 20);
        assert_eq!(body["page"], 2);
        assert_eq!(body["total_pages"], 3);
        assert_eq!(body["pages"], serde_json::json!([1, 2, 3]));
        assert_eq!(body["products"][0]["is_in_season"], true);
        assert_eq!(body["products"][1]["is_in_season"], false);

        let seen = source.seen.lock().unwrap();
        assert_eq!(seen[0].get("country"), Some(&QueryValue::text("ZA")));
        assert_eq!(seen[0].get("ordering"), Some(&QueryValue::text("-price")));
        assert_eq!(seen[0].get("category"), Some(&QueryValue::text("clothing,electronics")));
        assert_eq!(seen[0].get("page"), Some(&QueryValue::Int(2)));
        assert!(!seen[0].contains("max_price"));
    }

    #[test]
    fn test_explicit_country_overrides_local_only() {
        let query = ListingQuery { country: Some("ke".into()), local_only: Some(true), ..Default::default() };
        let (criteria, _) = query.to_criteria().unwrap();
        assert!(!criteria.local_only);
        assert_eq!(criteria.country.map(String::from).as_deref(), Some("KE"));
    }

    #[tokio::test]
    async fn test_listing_rejects_bad_country() {
        let (status, _) = get_json(app(Arc::default()), "/api/v1/listing?country=Kenya").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_listing_failure_is_bad_gateway() {
        let source = Arc::new(FakeSource { fail: true, ..Default::default() });
        let resp = app(source).oneshot(Request::builder().uri("/api/v1/listing").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), FETCH_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_pages_endpoint() {
        let (_, body) = get_json(app(Arc::default()), "/api/v1/pages?current=5&total=10").await;
        assert_eq!(body, serde_json::json!([1, "...", 4, 5, 6, "...", 10]));
    }

    #[tokio::test]
    async fn test_pages_endpoint_with_huge_current() {
        let (status, body) = get_json(app(Arc::default()), "/api/v1/pages?current=4294967295&total=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([1, "...", 9, 10]));
    }

    #[tokio::test]
    async fn test_current_season_endpoint() {
        let (status, body) = get_json(app(Arc::default()), "/api/v1/seasons/current?country=ZW").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hemisphere"], "S");
        assert_eq!(body["season"]["hemisphere"], "S");
    }

    #[tokio::test]
    async fn test_reference_endpoint() {
        let (_, body) = get_json(app(Arc::default()), "/api/v1/reference").await;
        assert_eq!(body["seasons"].as_array().unwrap().len(), 8);
        assert_eq!(body["categories"][0]["slug"], "electronics");
    }

    #[tokio::test]
    async fn test_cart_summary() {
        let items = serde_json::json!([
            { "id": 1, "quantity": 2, "product": { "id": 1, "name": "Rooibos", "price": "4.00" } },
        ]);
        let req = Request::builder()
            .method("POST").uri("/api/v1/cart/summary")
            .header("content-type", "application/json")
            .body(Body::from(items.to_string())).unwrap();
        let resp = app(Arc::default()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap();
        assert_eq!(body["subtotal"]["amount"], "8.00");
        assert_eq!(body["total"]["amount"], "13.99");
        assert_eq!(body["item_count"], 2);
    }
}
