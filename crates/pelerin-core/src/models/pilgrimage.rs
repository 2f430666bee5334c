//! Pilgrimage listing records and feed filters.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::text::fold;

/// A bookable pilgrimage as listed by the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pilgrimage {
    pub id: u64,
    pub title: String,
    /// Destination, usually a monastery or region
    pub location: String,
    pub start_date: Date,
    pub end_date: Date,
    /// Price per person in whole currency units
    pub price: u32,
    pub currency: String,
    /// Total seats
    pub capacity: u32,
    /// Seats already booked
    #[serde(default)]
    pub booked: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: Timestamp,
}

impl Pilgrimage {
    pub fn seats_left(&self) -> u32 {
        self.capacity.saturating_sub(self.booked)
    }

    pub fn is_full(&self) -> bool {
        self.seats_left() == 0
    }

    /// Number of nights between start and end date.
    pub fn nights(&self) -> i32 {
        self.end_date
            .since(self.start_date)
            .map(|span| span.get_days())
            .unwrap_or_default()
    }
}

/// Filters accepted by the pilgrimage feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PilgrimageFilter {
    /// Substring of the location, ignoring case and diacritics
    pub location: Option<String>,
    pub max_price: Option<u32>,
    /// Only pilgrimages starting on or after this date
    pub starts_after: Option<Date>,
    pub featured_only: bool,
    /// Hide pilgrimages without free seats
    pub available_only: bool,
    pub limit: Option<u32>,
}

impl PilgrimageFilter {
    /// Whether a record passes every filter except `limit`.
    pub fn matches(&self, pilgrimage: &Pilgrimage) -> bool {
        if let Some(location) = &self.location {
            if !fold(&pilgrimage.location).contains(&fold(location)) {
                return false;
            }
        }
        if self.max_price.is_some_and(|max| pilgrimage.price > max) {
            return false;
        }
        if self.starts_after.is_some_and(|d| pilgrimage.start_date < d) {
            return false;
        }
        if self.featured_only && !pilgrimage.featured {
            return false;
        }
        !(self.available_only && pilgrimage.is_full())
    }
}
