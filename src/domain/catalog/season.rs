//! Season calendar and current-season resolution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::domain::value_objects::{CountryCode, Month};

/// Countries whose seasons follow the southern calendar.
pub const SOUTHERN_COUNTRIES: [&str; 7] = ["AU", "NZ", "AR", "BR", "CL", "ZA", "ZW"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    #[default]
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    /// Season applies in both hemispheres.
    #[serde(rename = "B")]
    Both,
}

impl Hemisphere {
    pub fn as_str(&self) -> &'static str {
        match self { Self::North => "N", Self::South => "S", Self::Both => "B" }
    }

    /// Northern unless the country is in the southern partition.
    pub fn for_country(country: Option<&CountryCode>) -> Self {
        match country {
            Some(code) if SOUTHERN_COUNTRIES.contains(&code.as_str()) => Self::South,
            _ => Self::North,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: u32,
    pub name: String,
    pub start_month: u32,
    pub end_month: u32,
    pub hemisphere: Hemisphere,
}

impl Season {
    pub fn new(id: u32, name: &str, start_month: u32, end_month: u32, hemisphere: Hemisphere) -> Self {
        Self { id, name: name.to_string(), start_month, end_month, hemisphere }
    }

    pub fn contains(&self, month: Month) -> bool { month.within(self.start_month, self.end_month) }
}

/// Immutable season table, one non-overlapping cycle per hemisphere.
#[derive(Clone, Debug)]
pub struct SeasonCalendar {
    seasons: Vec<Season>,
}

impl SeasonCalendar {
    pub fn new(seasons: Vec<Season>) -> Self { Self { seasons } }

    /// The storefront's reference calendar, built once per process.
    pub fn standard() -> &'static SeasonCalendar {
        static CALENDAR: OnceLock<SeasonCalendar> = OnceLock::new();
        CALENDAR.get_or_init(|| {
            use Hemisphere::{North, South};
            Self::new(vec![
                Season::new(1, "Spring", 3, 5, North),
                Season::new(2, "Summer", 6, 8, North),
                Season::new(3, "Fall", 9, 11, North),
                Season::new(4, "Winter", 12, 2, North),
                Season::new(5, "Spring", 9, 11, South),
                Season::new(6, "Summer", 12, 2, South),
                Season::new(7, "Fall", 3, 5, South),
                Season::new(8, "Winter", 6, 8, South),
            ])
        })
    }

    pub fn seasons(&self) -> &[Season] { &self.seasons }

    pub fn find(&self, id: u32) -> Option<&Season> { self.seasons.iter().find(|s| s.id == id) }

    /// First season of `hemisphere` whose range holds `month`.
    pub fn resolve(&self, month: Month, hemisphere: Hemisphere) -> Option<&Season> {
        let found = self.seasons.iter().find(|s| s.hemisphere == hemisphere && s.contains(month));
        if found.is_none() {
            tracing::warn!(month = month.value(), hemisphere = hemisphere.as_str(), "season calendar has no entry for month");
        }
        found
    }

    /// Season in effect at `now` for a shopper in `country`.
    pub fn current(&self, now: DateTime<Utc>, country: Option<&CountryCode>) -> Option<&Season> {
        let hemisphere = Hemisphere::for_country(country);
        let season = self.resolve(Month::from_date(&now), hemisphere);
        tracing::debug!(season = season.map(|s| s.name.as_str()), hemisphere = hemisphere.as_str(), "resolved current season");
        season
    }
}
