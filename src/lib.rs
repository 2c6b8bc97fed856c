//! TV.com Scraper
//!
//! Screen-scraping client for TV.com series and episode metadata. The
//! site has no official API, so fields are extracted from its HTML pages
//! with fixed text patterns, fetched lazily and cached per entity
//! instance.
//!
//! # Features
//! - Look up a show by id, by name search, or by a single ambiguous token
//! - Lazily fetched series fields: name, summary, genres, cast, image
//! - Per-season episode listings, cached per season key
//! - Episode vitals (season/episode number, normalized air date) and credits
//! - Series/Episode cross-referencing and `%x`-token detail formatting
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use tvcom_scraper::{HttpTransport, Series};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(HttpTransport::new()?);
//!     let mut series = Series::by_name("Prison Break", transport)?;
//!
//!     println!("{}", series.name()?.unwrap_or_default());
//!     for mut episode in series.episodes(Some(1))? {
//!         println!("{}", episode.format_details(None)?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod episode;
pub mod error;
mod parser;
pub mod series;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use episode::{Episode, EpisodeOptions, DEFAULT_DETAILS_FORMAT};
pub use error::{Result, TvComError};
pub use series::{Series, SeriesOptions};
pub use transport::{HttpTransport, Transport, TransportConfig, TransportError, DEFAULT_AGENT};
pub use types::{AirDate, Vitals};
