//! Product listing view state
//!
//! [`ProductListing`] owns the shopper's filter criteria and page position,
//! issues one fetch per change through a [`ProductSource`], and applies only
//! the response to the most recent fetch. Every fetch carries a generation
//! number; completions for an older generation are dropped so a slow response
//! to superseded filters can never overwrite newer results.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::annotate::annotate_in_season;
use super::filter::{FilterCriteria, PriceRange, QueryParams, QueryValue, SortOption};
use super::pagination::{PageState, PageToken};
use crate::domain::catalog::{Season, SeasonCalendar};
use crate::domain::value_objects::CountryCode;
use crate::{Paginated, Product, Result};

/// Default number of products per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Message shown to the shopper when a product fetch fails.
pub const FETCH_FAILED_MESSAGE: &str = "We couldn't load products right now. Please try again.";

/// Backend endpoint serving paginated product listings.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn list_products(&self, params: &QueryParams) -> Result<Paginated<Product>>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListingRequest {
    pub generation: u64,
    pub params: QueryParams,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued before this one completed.
    Stale,
    Failed,
}

#[derive(Debug)]
pub struct ProductListing {
    calendar: &'static SeasonCalendar,
    criteria: FilterCriteria,
    page: PageState,
    user_country: Option<CountryCode>,
    current_season: Option<Season>,
    products: Vec<Product>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl ProductListing {
    pub fn new(per_page: u32, user_country: Option<CountryCode>, now: DateTime<Utc>) -> Self {
        Self::with_calendar(SeasonCalendar::standard(), per_page, user_country, now)
    }

    pub fn with_calendar(calendar: &'static SeasonCalendar, per_page: u32, user_country: Option<CountryCode>, now: DateTime<Utc>) -> Self {
        let current_season = calendar.current(now, user_country.as_ref()).cloned();
        Self {
            calendar, criteria: FilterCriteria::default(), page: PageState::new(per_page), user_country,
            current_season, products: vec![], loading: false, error: None, generation: 0,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria { &self.criteria }
    pub fn page(&self) -> &PageState { &self.page }
    pub fn products(&self) -> &[Product] { &self.products }
    pub fn is_loading(&self) -> bool { self.loading }
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }
    pub fn current_season(&self) -> Option<&Season> { self.current_season.as_ref() }
    pub fn user_country(&self) -> Option<&CountryCode> { self.user_country.as_ref() }
    pub fn page_tokens(&self) -> Vec<PageToken> { self.page.window() }

    /// Applies a criteria change, returning to page 1 and starting a fetch.
    pub fn update_criteria(&mut self, change: impl FnOnce(&mut FilterCriteria)) -> ListingRequest {
        change(&mut self.criteria);
        self.page.reset();
        self.begin_fetch()
    }

    pub fn search(&mut self, text: &str) -> ListingRequest { self.update_criteria(|c| c.search = text.to_string()) }

    pub fn toggle_category(&mut self, slug: &str, checked: bool) -> ListingRequest {
        self.update_criteria(|c| c.toggle_category(slug, checked))
    }

    pub fn set_price_range(&mut self, min: Decimal, max: Decimal) -> ListingRequest {
        self.update_criteria(|c| c.price_range = PriceRange { min, max })
    }

    pub fn set_min_rating(&mut self, rating: Option<u8>) -> ListingRequest { self.update_criteria(|c| c.min_rating = rating) }

    pub fn select_country(&mut self, country: Option<CountryCode>) -> ListingRequest {
        self.update_criteria(|c| c.select_country(country))
    }

    pub fn set_local_only(&mut self, local_only: bool) -> ListingRequest { self.update_criteria(|c| c.set_local_only(local_only)) }

    pub fn select_season(&mut self, season: Option<u32>) -> ListingRequest { self.update_criteria(|c| c.season = season) }

    /// Filters to the season in effect now; `None` when it could not be resolved.
    pub fn select_current_season(&mut self) -> Option<ListingRequest> {
        let id = self.current_season.as_ref()?.id;
        Some(self.select_season(Some(id)))
    }

    pub fn set_sort(&mut self, sort: SortOption) -> ListingRequest { self.update_criteria(|c| c.sort = sort) }

    pub fn clear_filters(&mut self) -> ListingRequest { self.update_criteria(FilterCriteria::clear) }

    /// Moves to `page` and starts a fetch; out-of-range pages are ignored.
    pub fn go_to_page(&mut self, page: u32) -> Option<ListingRequest> {
        if !self.page.go_to(page) {
            debug!(page, total = self.page.total_pages(), "ignoring out-of-range page request");
            return None;
        }
        Some(self.begin_fetch())
    }

    /// Rebuilds the view for a stateless request; the backend validates `page`.
    pub fn restore(&mut self, criteria: FilterCriteria, page: u32) -> ListingRequest {
        self.criteria = criteria;
        self.page.start_at(page);
        self.begin_fetch()
    }

    /// Starts a fetch for the current criteria and page, superseding any in flight.
    pub fn begin_fetch(&mut self) -> ListingRequest {
        self.generation += 1;
        self.loading = true;
        let mut params = self.criteria.to_query(self.user_country.as_ref(), self.calendar);
        params.insert("page", QueryValue::Int(i64::from(self.page.current())));
        params.insert("page_size", QueryValue::Int(i64::from(self.page.per_page())));
        ListingRequest { generation: self.generation, params }
    }

    /// Applies the result of fetch `generation` if it is still the latest.
    pub fn complete(&mut self, generation: u64, result: Result<Paginated<Product>>) -> FetchOutcome {
        if generation != self.generation {
            warn!(generation, latest = self.generation, "discarding stale product response");
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                let mut products = page.results;
                annotate_in_season(&mut products, self.current_season.as_ref());
                self.products = products;
                self.page.set_count(page.count);
                self.error = None;
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "error fetching products");
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
                FetchOutcome::Failed
            }
        }
    }

    pub async fn execute(&mut self, request: ListingRequest, source: &dyn ProductSource) -> FetchOutcome {
        let result = source.list_products(&request.params).await;
        self.complete(request.generation, result)
    }

    /// Fetches the current criteria and page.
    pub async fn refresh(&mut self, source: &dyn ProductSource) -> FetchOutcome {
        let request = self.begin_fetch();
        self.execute(request, source).await
    }
}
