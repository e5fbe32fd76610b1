//! Product listing: filters, seasonal annotation, pagination
pub mod annotate;
pub mod controller;
pub mod filter;
pub mod pagination;

pub use annotate::{annotate_in_season, is_in_season, is_local_product};
pub use controller::{FetchOutcome, ListingRequest, ProductListing, ProductSource, DEFAULT_PAGE_SIZE};
pub use filter::{build_query, FilterCriteria, PriceRange, QueryParams, QueryValue, SortOption};
pub use pagination::{page_window, PageState, PageToken};
