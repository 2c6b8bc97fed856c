//! Data types for the TV.com scraper
//!
//! The per-field cache cell lives here, along with the plain data types
//! extracted from episode pages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fetch state of a single lazily populated field.
///
/// A field moves from `Unfetched` to `Fetched` exactly once per entity.
/// A pattern miss is stored as a fetched-but-empty value and is never
/// re-attempted; a failed fetch leaves the field `Unfetched` so the next
/// access retries verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Field<T> {
    #[default]
    Unfetched,
    Fetched(T),
}

impl<T> Field<T> {
    pub(crate) fn is_unfetched(&self) -> bool {
        matches!(self, Field::Unfetched)
    }

    /// Cached value, or `None` while unfetched.
    pub(crate) fn value(&self) -> Option<&T> {
        match self {
            Field::Fetched(value) => Some(value),
            Field::Unfetched => None,
        }
    }
}

/// Air date of an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirDate {
    /// Normalized `YYYY-MM-DD` date
    Date(String),
    /// The page states the episode has no air date (`n/a`)
    NotApplicable,
}

impl fmt::Display for AirDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AirDate::Date(date) => f.write_str(date),
            AirDate::NotApplicable => f.write_str("n/a"),
        }
    }
}

/// Season number, series-absolute episode number and air date.
///
/// The three values share one source region on the episode page and are
/// extracted together in a single pass; fetching one fetches all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// Season this episode belongs to
    pub season_number: u32,
    /// Airing-order number across the whole series, not production order
    pub episode_number: u32,
    /// First air date, normalized
    pub first_aired: AirDate,
}
