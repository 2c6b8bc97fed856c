//! The Series entity: identity plus lazily populated show-page fields.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use regex_lite::Regex;

use crate::episode::{Episode, EpisodeOptions};
use crate::error::{Result, TvComError};
use crate::parser;
use crate::transport::{Transport, DEFAULT_AGENT, TVCOM_BASE_URL};
use crate::types::Field;

/// Options applied at [`Series`] construction time.
#[derive(Debug, Clone)]
pub struct SeriesOptions {
    /// Client identity sent with every request this series issues
    pub agent: String,
    /// Default season selector for `episodes(None)`; 0 selects all seasons
    pub season: u32,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            agent: DEFAULT_AGENT.to_string(),
            season: 0,
        }
    }
}

/// A TV.com show.
///
/// Fields are extracted from the show's summary page on first access and
/// cached per instance; the page itself is fetched at most once and
/// reused for every field. A pattern miss is cached as an empty value
/// and never re-attempted, while a failed fetch leaves the field
/// unfetched so the next access retries. Accessors take `&mut self`
/// because they fill the cache; sharing one instance across threads is
/// unsupported.
#[derive(Clone)]
pub struct Series {
    id: u32,
    agent: String,
    season: u32,
    transport: Arc<dyn Transport>,
    page: Field<String>,
    name: Field<Option<String>>,
    summary: Field<Option<String>>,
    image: Field<Option<String>>,
    genres: Field<Vec<String>>,
    cast: Field<Vec<String>>,
    episodes: HashMap<u32, Vec<Episode>>,
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("id", &self.id)
            .field("agent", &self.agent)
            .field("season", &self.season)
            .finish_non_exhaustive()
    }
}

impl Series {
    /// Construct a series from a known TV.com show id.
    ///
    /// # Errors
    /// `InvalidArgument` if `id` is zero.
    pub fn by_id(id: u32, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::by_id_with(id, transport, SeriesOptions::default())
    }

    /// Construct a series from a known id with explicit options.
    pub fn by_id_with(id: u32, transport: Arc<dyn Transport>, options: SeriesOptions) -> Result<Self> {
        if id == 0 {
            return Err(TvComError::InvalidArgument(
                "series id must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            id,
            agent: options.agent,
            season: options.season,
            transport,
            page: Field::Unfetched,
            name: Field::Unfetched,
            summary: Field::Unfetched,
            image: Field::Unfetched,
            genres: Field::Unfetched,
            cast: Field::Unfetched,
            episodes: HashMap::new(),
        })
    }

    /// Construct a series by show name.
    ///
    /// The id is resolved through the site's program search: exactly one
    /// search request is issued, at construction, and never re-attempted.
    ///
    /// # Errors
    /// - `InvalidArgument` if `name` is empty
    /// - `LookupFailed` if the search request fails
    /// - `NotFound` if no show matches
    pub fn by_name(name: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::by_name_with(name, transport, SeriesOptions::default())
    }

    /// Construct a series by name with explicit options.
    pub fn by_name_with(
        name: &str,
        transport: Arc<dyn Transport>,
        options: SeriesOptions,
    ) -> Result<Self> {
        let query = name.trim();
        if query.is_empty() {
            return Err(TvComError::InvalidArgument(
                "series name must not be empty".to_string(),
            ));
        }
        let id = resolve_show_id(transport.as_ref(), &options.agent, query)?;
        Self::by_id_with(id, transport, options)
    }

    /// Construct a series from a single ambiguous token: an all-digit
    /// token is taken as an id, anything else as a name to search for.
    pub fn from_token(token: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::from_token_with(token, transport, SeriesOptions::default())
    }

    /// Construct from an ambiguous token with explicit options.
    pub fn from_token_with(
        token: &str,
        transport: Arc<dyn Transport>,
        options: SeriesOptions,
    ) -> Result<Self> {
        let digits = Regex::new(r"^\d+$").unwrap();
        if digits.is_match(token) {
            let id: u32 = token.parse().map_err(|_| {
                TvComError::InvalidArgument(format!("series id out of range: {}", token))
            })?;
            Self::by_id_with(id, transport, options)
        } else {
            Self::by_name_with(token, transport, options)
        }
    }

    /// TV.com show id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Client identity used for requests issued by this instance.
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Canonical summary page URL for this show.
    pub fn url(&self) -> String {
        format!("{}/show/{}/summary.html", TVCOM_BASE_URL, self.id)
    }

    /// Episode listing page URL, scoped to one season (0 = all seasons).
    pub fn episode_url(&self, season: u32) -> String {
        format!(
            "{}/show/{}/episode_listings.html?season={}",
            TVCOM_BASE_URL, self.id, season
        )
    }

    /// Show name, from the page heading.
    pub fn name(&mut self) -> Result<Option<String>> {
        if self.name.is_unfetched() {
            let value = parser::extract_name(self.document()?);
            trace!("series {}: name = {:?}", self.id, value);
            self.name = Field::Fetched(value);
        }
        Ok(self.name.value().cloned().flatten())
    }

    /// Show summary text.
    pub fn summary(&mut self) -> Result<Option<String>> {
        if self.summary.is_unfetched() {
            let value = parser::extract_summary(self.document()?);
            self.summary = Field::Fetched(value);
        }
        Ok(self.summary.value().cloned().flatten())
    }

    /// Thumbnail image URL.
    pub fn image(&mut self) -> Result<Option<String>> {
        if self.image.is_unfetched() {
            let value = parser::series::extract_image(self.document()?);
            self.image = Field::Fetched(value);
        }
        Ok(self.image.value().cloned().flatten())
    }

    /// Genres, in page order.
    pub fn genres(&mut self) -> Result<Vec<String>> {
        if self.genres.is_unfetched() {
            let value = parser::series::extract_genres(self.document()?);
            self.genres = Field::Fetched(value);
        }
        Ok(self.genres.value().cloned().unwrap_or_default())
    }

    /// Cast member names, in page order.
    pub fn cast(&mut self) -> Result<Vec<String>> {
        if self.cast.is_unfetched() {
            let value = parser::series::extract_cast(self.document()?);
            self.cast = Field::Fetched(value);
        }
        Ok(self.cast.value().cloned().unwrap_or_default())
    }

    /// Episodes listed for `season`, or for the constructed default
    /// season when `None` (0 = all seasons).
    ///
    /// Each distinct season key is fetched once and cached
    /// independently; entries come back as fresh [`Episode`] values with
    /// their names pre-populated from the listing.
    pub fn episodes(&mut self, season: Option<u32>) -> Result<Vec<Episode>> {
        let season = season.unwrap_or(self.season);
        if !self.episodes.contains_key(&season) {
            let url = self.episode_url(season);
            debug!("series {}: fetching episode listing, season {}", self.id, season);
            let body = self
                .transport
                .fetch(&url, &self.agent)
                .map_err(|source| TvComError::FetchFailed { id: self.id, source })?;
            let doc = parser::normalize_document(&body);
            let episodes = parser::series::parse_episode_listing(&doc)
                .into_iter()
                .map(|(id, name)| {
                    Episode::by_id_with(
                        id,
                        Arc::clone(&self.transport),
                        EpisodeOptions {
                            name: Some(name),
                            agent: self.agent.clone(),
                        },
                    )
                })
                .collect::<Result<Vec<_>>>()?;
            trace!("series {}: season {} lists {} episodes", self.id, season, episodes.len());
            self.episodes.insert(season, episodes);
        }
        Ok(self.episodes.get(&season).cloned().unwrap_or_default())
    }

    /// Normalized summary page document, fetched on first use.
    fn document(&mut self) -> Result<&str> {
        if self.page.is_unfetched() {
            let url = self.url();
            debug!("series {}: fetching {}", self.id, url);
            let body = self
                .transport
                .fetch(&url, &self.agent)
                .map_err(|source| TvComError::FetchFailed { id: self.id, source })?;
            self.page = Field::Fetched(parser::normalize_document(&body));
        }
        match self.page.value() {
            Some(doc) => Ok(doc),
            None => unreachable!("summary page cached above"),
        }
    }
}

/// Resolve a show name to its id via the program search endpoint; the
/// first show summary anchor in the response wins.
fn resolve_show_id(transport: &dyn Transport, agent: &str, query: &str) -> Result<u32> {
    let url = format!(
        "{}/search.php?stype=program&qs={}",
        TVCOM_BASE_URL,
        urlencoding::encode(query)
    );
    debug!("resolving show id for {:?}", query);
    let body = transport.fetch(&url, agent).map_err(TvComError::LookupFailed)?;
    parser::search::first_show_id(&body).ok_or_else(|| TvComError::NotFound(query.to_string()))
}
