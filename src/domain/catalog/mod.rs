//! Immutable reference data: seasons, countries, categories
pub mod reference;
pub mod season;

pub use reference::{Category, Country, ReferenceData};
pub use season::{Hemisphere, Season, SeasonCalendar, SOUTHERN_COUNTRIES};
