//! The Episode entity: identity, lazily populated episode-page fields,
//! and the back-reference to its parent series.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use regex_lite::Regex;

use crate::error::{Result, TvComError};
use crate::parser;
use crate::series::{Series, SeriesOptions};
use crate::transport::{Transport, DEFAULT_AGENT, TVCOM_BASE_URL};
use crate::types::{AirDate, Field, Vitals};

/// Default `format_details` template; renders as
/// `"Prison Break.s01e01 - Pilot"`.
pub const DEFAULT_DETAILS_FORMAT: &str = "%S.s%ze%o - %n";

/// Options applied at [`Episode`] construction time.
#[derive(Debug, Clone)]
pub struct EpisodeOptions {
    /// Pre-populated episode name. The name is the only field eligible
    /// for pre-population; a series episode listing supplies it so the
    /// listed episodes answer `name()` without a fetch.
    pub name: Option<String>,
    /// Client identity sent with every request this episode issues
    pub agent: String,
}

impl Default for EpisodeOptions {
    fn default() -> Self {
        Self {
            name: None,
            agent: DEFAULT_AGENT.to_string(),
        }
    }
}

/// A TV.com episode.
///
/// Fields are extracted from the episode's summary page on first access
/// and cached per instance, with the same fetch-once contract as
/// [`Series`]. Season number, episode number and air date share one
/// source region and are filled as an atomic group.
#[derive(Clone)]
pub struct Episode {
    id: u32,
    agent: String,
    transport: Arc<dyn Transport>,
    page: Field<String>,
    name: Field<Option<String>>,
    summary: Field<Option<String>>,
    vitals: Field<Option<Vitals>>,
    stars: Field<Vec<String>>,
    guest_stars: Field<Vec<String>>,
    recurring_roles: Field<Vec<String>>,
    writers: Field<Vec<String>>,
    directors: Field<Vec<String>>,
    series_id: Field<Option<u32>>,
}

impl fmt::Debug for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Episode")
            .field("id", &self.id)
            .field("agent", &self.agent)
            .finish_non_exhaustive()
    }
}

impl Episode {
    /// Construct an episode from a known TV.com episode id.
    ///
    /// # Errors
    /// `InvalidArgument` if `id` is zero.
    pub fn by_id(id: u32, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::by_id_with(id, transport, EpisodeOptions::default())
    }

    /// Construct an episode from a known id with explicit options.
    pub fn by_id_with(id: u32, transport: Arc<dyn Transport>, options: EpisodeOptions) -> Result<Self> {
        if id == 0 {
            return Err(TvComError::InvalidArgument(
                "episode id must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            id,
            agent: options.agent,
            transport,
            page: Field::Unfetched,
            name: match options.name {
                Some(name) => Field::Fetched(Some(name)),
                None => Field::Unfetched,
            },
            summary: Field::Unfetched,
            vitals: Field::Unfetched,
            stars: Field::Unfetched,
            guest_stars: Field::Unfetched,
            recurring_roles: Field::Unfetched,
            writers: Field::Unfetched,
            directors: Field::Unfetched,
            series_id: Field::Unfetched,
        })
    }

    /// Construct an episode from a single token. Episodes have no name
    /// search, so the token must be an all-digit id.
    pub fn from_token(token: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let digits = Regex::new(r"^\d+$").unwrap();
        if !digits.is_match(token) {
            return Err(TvComError::InvalidArgument(format!(
                "episode id must be numeric: {}",
                token
            )));
        }
        let id: u32 = token.parse().map_err(|_| {
            TvComError::InvalidArgument(format!("episode id out of range: {}", token))
        })?;
        Self::by_id(id, transport)
    }

    /// TV.com episode id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Client identity used for requests issued by this instance.
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Canonical summary page URL for this episode.
    pub fn url(&self) -> String {
        format!("{}/episode/{}/summary.html", TVCOM_BASE_URL, self.id)
    }

    /// Episode name, from the page heading (or pre-populated at
    /// construction by an episode listing).
    pub fn name(&mut self) -> Result<Option<String>> {
        if self.name.is_unfetched() {
            let value = parser::extract_name(self.document()?);
            trace!("episode {}: name = {:?}", self.id, value);
            self.name = Field::Fetched(value);
        }
        Ok(self.name.value().cloned().flatten())
    }

    /// Episode summary text, line-break markup stripped.
    pub fn summary(&mut self) -> Result<Option<String>> {
        if self.summary.is_unfetched() {
            let value = parser::extract_summary(self.document()?);
            self.summary = Field::Fetched(value);
        }
        Ok(self.summary.value().cloned().flatten())
    }

    /// Season number, episode number and air date as one group.
    ///
    /// The trio is captured from the page in a single pass, so fetching
    /// any one of the three fills all of them.
    pub fn vitals(&mut self) -> Result<Option<Vitals>> {
        if self.vitals.is_unfetched() {
            let value = parser::episode::extract_vitals(self.document()?);
            trace!("episode {}: vitals = {:?}", self.id, value);
            self.vitals = Field::Fetched(value);
        }
        Ok(self.vitals.value().cloned().flatten())
    }

    /// Season this episode belongs to.
    pub fn season_number(&mut self) -> Result<Option<u32>> {
        Ok(self.vitals()?.map(|vitals| vitals.season_number))
    }

    /// Series-absolute airing-order number, not production order.
    pub fn episode_number(&mut self) -> Result<Option<u32>> {
        Ok(self.vitals()?.map(|vitals| vitals.episode_number))
    }

    /// First air date, normalized to `YYYY-MM-DD`, or the
    /// not-applicable marker when the page states no air date.
    pub fn first_aired(&mut self) -> Result<Option<AirDate>> {
        Ok(self.vitals()?.map(|vitals| vitals.first_aired))
    }

    /// Billed stars, role notes stripped.
    pub fn stars(&mut self) -> Result<Vec<String>> {
        if self.stars.is_unfetched() {
            let value = parser::episode::extract_people(self.document()?, "Star:", true);
            self.stars = Field::Fetched(value);
        }
        Ok(self.stars.value().cloned().unwrap_or_default())
    }

    /// Guest stars, role notes stripped.
    pub fn guest_stars(&mut self) -> Result<Vec<String>> {
        if self.guest_stars.is_unfetched() {
            let value = parser::episode::extract_people(self.document()?, "Guest Star:", true);
            self.guest_stars = Field::Fetched(value);
        }
        Ok(self.guest_stars.value().cloned().unwrap_or_default())
    }

    /// Recurring roles, role notes stripped.
    pub fn recurring_roles(&mut self) -> Result<Vec<String>> {
        if self.recurring_roles.is_unfetched() {
            let value = parser::episode::extract_people(self.document()?, "Recurring Role:", true);
            self.recurring_roles = Field::Fetched(value);
        }
        Ok(self.recurring_roles.value().cloned().unwrap_or_default())
    }

    /// Credited writers.
    pub fn writers(&mut self) -> Result<Vec<String>> {
        if self.writers.is_unfetched() {
            let value = parser::episode::extract_people(self.document()?, "Writer:", false);
            self.writers = Field::Fetched(value);
        }
        Ok(self.writers.value().cloned().unwrap_or_default())
    }

    /// Credited directors.
    pub fn directors(&mut self) -> Result<Vec<String>> {
        if self.directors.is_unfetched() {
            let value = parser::episode::extract_people(self.document()?, "Director:", false);
            self.directors = Field::Fetched(value);
        }
        Ok(self.directors.value().cloned().unwrap_or_default())
    }

    /// Id of the show this episode belongs to, from the page's cast link.
    pub fn series_id(&mut self) -> Result<Option<u32>> {
        if self.series_id.is_unfetched() {
            let value = parser::episode::extract_series_id(self.document()?);
            trace!("episode {}: series id = {:?}", self.id, value);
            self.series_id = Field::Fetched(value);
        }
        Ok(self.series_id.value().cloned().flatten())
    }

    /// The show this episode belongs to.
    ///
    /// A fresh [`Series`] is constructed on every call; instances are
    /// never shared or cached across traversals, so the returned series
    /// fetches its own pages.
    pub fn series(&mut self) -> Result<Series> {
        let id = self.series_id()?.ok_or_else(|| {
            TvComError::InvalidArgument(format!(
                "episode {} page does not link back to a show",
                self.id
            ))
        })?;
        debug!("episode {}: resolving series {}", self.id, id);
        Series::by_id_with(
            id,
            Arc::clone(&self.transport),
            SeriesOptions {
                agent: self.agent.clone(),
                season: 0,
            },
        )
    }

    /// Every episode listed for this episode's season, resolved through
    /// a freshly constructed parent series. A missing season number
    /// falls back to the all-seasons listing.
    pub fn season(&mut self) -> Result<Vec<Episode>> {
        let season_number = self.season_number()?.unwrap_or(0);
        self.series()?.episodes(Some(season_number))
    }

    /// Render episode details through a small `%x` token template;
    /// `None` uses [`DEFAULT_DETAILS_FORMAT`]. Unknown tokens pass
    /// through untouched.
    ///
    /// | Token | Substitution                |
    /// |-------|-----------------------------|
    /// | `%I`  | series id                   |
    /// | `%S`  | series name                 |
    /// | `%s`  | season number               |
    /// | `%z`  | season number, zero-padded  |
    /// | `%i`  | episode id                  |
    /// | `%e`  | episode number              |
    /// | `%o`  | episode number, zero-padded |
    /// | `%n`  | episode name                |
    /// | `%a`  | air date                    |
    pub fn format_details(&mut self, template: Option<&str>) -> Result<String> {
        let template = template.unwrap_or(DEFAULT_DETAILS_FORMAT).to_string();
        let mut out = String::new();
        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('I') => {
                    if let Some(id) = self.series_id()? {
                        out.push_str(&id.to_string());
                    }
                }
                Some('S') => {
                    if self.series_id()?.is_some() {
                        if let Some(name) = self.series()?.name()? {
                            out.push_str(&name);
                        }
                    }
                }
                Some('s') => out.push_str(&self.season_number()?.unwrap_or(0).to_string()),
                Some('z') => out.push_str(&format!("{:02}", self.season_number()?.unwrap_or(0))),
                Some('i') => out.push_str(&self.id.to_string()),
                Some('e') => out.push_str(&self.episode_number()?.unwrap_or(0).to_string()),
                Some('o') => out.push_str(&format!("{:02}", self.episode_number()?.unwrap_or(0))),
                Some('n') => {
                    if let Some(name) = self.name()? {
                        out.push_str(&name);
                    }
                }
                Some('a') => {
                    if let Some(aired) = self.first_aired()? {
                        out.push_str(&aired.to_string());
                    }
                }
                Some(other) => {
                    out.push('%');
                    out.push(other);
                }
                None => out.push('%'),
            }
        }
        Ok(out)
    }

    /// Normalized summary page document, fetched on first use.
    fn document(&mut self) -> Result<&str> {
        if self.page.is_unfetched() {
            let url = self.url();
            debug!("episode {}: fetching {}", self.id, url);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::fixtures;
    use crate::transport::stub::StubTransport;

    const EPISODE_URL: &str = "https://www.tv.com/episode/475628/summary.html";
    const SERIES_URL: &str = "https://www.tv.com/show/31635/summary.html";
    const LISTING_S1_URL: &str = "https://www.tv.com/show/31635/episode_listings.html?season=1";

    fn pilot_stub() -> Arc<StubTransport> {
        Arc::new(
            StubTransport::new()
                .page(EPISODE_URL, fixtures::EPISODE_PAGE)
                .page(SERIES_URL, fixtures::SERIES_PAGE)
                .page(LISTING_S1_URL, fixtures::LISTING_SEASON_1),
        )
    }

    #[test]
    fn test_by_id_zero_is_invalid() {
        let stub = pilot_stub();
        assert!(matches!(
            Episode::by_id(0, stub),
            Err(TvComError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_token_digits() {
        let stub = pilot_stub();
        let episode = Episode::from_token("475628", Arc::clone(&stub) as Arc<dyn Transport>).unwrap();
        assert_eq!(episode.id(), 475628);
        assert!(stub.requests().is_empty());
    }

    #[test]
    fn test_from_token_non_numeric_is_invalid() {
        let stub = pilot_stub();
        assert!(matches!(
            Episode::from_token("abc", stub),
            Err(TvComError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_url_shape() {
        let stub = pilot_stub();
        let episode = Episode::by_id(475628, stub).unwrap();
        assert_eq!(episode.url(), EPISODE_URL);
    }

    #[test]
    fn test_prepopulated_name_skips_fetch() {
        let stub = pilot_stub();
        let mut episode = Episode::by_id_with(
            475628,
            Arc::clone(&stub) as Arc<dyn Transport>,
            EpisodeOptions {
                name: Some("Pilot".to_string()),
                ..EpisodeOptions::default()
            },
        )
        .unwrap();

        assert_eq!(episode.name().unwrap(), Some("Pilot".to_string()));
        assert!(stub.requests().is_empty());
    }

    #[test]
    fn test_vitals_fill_as_a_group_with_one_fetch() {
        let stub = pilot_stub();
        let mut episode = Episode::by_id(475628, Arc::clone(&stub) as Arc<dyn Transport>).unwrap();

        assert_eq!(episode.season_number().unwrap(), Some(1));
        assert_eq!(episode.episode_number().unwrap(), Some(1));
        assert_eq!(
            episode.first_aired().unwrap(),
            Some(AirDate::Date("2005-08-29".to_string()))
        );
        assert_eq!(stub.request_count(EPISODE_URL), 1);
    }

    #[test]
    fn test_first_aired_not_applicable_sentinel() {
        let stub = Arc::new(
            StubTransport::new().page(
                "https://www.tv.com/episode/600001/summary.html",
                fixtures::EPISODE_PAGE_UNAIRED,
            ),
        );
        let mut episode = Episode::by_id(600001, stub).unwrap();
        assert_eq!(episode.first_aired().unwrap(), Some(AirDate::NotApplicable));
        assert_eq!(episode.season_number().unwrap(), Some(4));
    }

    #[test]
    fn test_people_lists() {
        let stub = pilot_stub();
        let mut episode = Episode::by_id(475628, Arc::clone(&stub) as Arc<dyn Transport>).unwrap();

        assert_eq!(
            episode.stars().unwrap(),
            vec!["Wentworth Miller", "Dominic Purcell"]
        );
        assert_eq!(episode.guest_stars().unwrap(), vec!["Philip Edward Van Lear"]);
        assert_eq!(episode.recurring_roles().unwrap(), vec!["Stacy Keach"]);
        assert_eq!(episode.writers().unwrap(), vec!["Paul Scheuring"]);
        assert_eq!(episode.directors().unwrap(), vec!["Brett Ratner"]);
        assert_eq!(stub.request_count(EPISODE_URL), 1);
    }

    #[test]
    fn test_people_list_miss_is_empty_not_error() {
        let stub = Arc::new(
            StubTransport::new().page(
                "https://www.tv.com/episode/600001/summary.html",
                fixtures::EPISODE_PAGE_UNAIRED,
            ),
        );
        let mut episode = Episode::by_id(600001, Arc::clone(&stub) as Arc<dyn Transport>).unwrap();

        assert!(episode.stars().unwrap().is_empty());
        assert!(episode.stars().unwrap().is_empty());
        assert_eq!(
            stub.request_count("https://www.tv.com/episode/600001/summary.html"),
            1
        );
    }

    #[test]
    fn test_series_round_trip() {
        let stub = pilot_stub();
        let mut episode = Episode::by_id(475628, Arc::clone(&stub) as Arc<dyn Transport>).unwrap();

        assert_eq!(episode.series_id().unwrap(), Some(31635));
        let mut series = episode.series().unwrap();
        assert_eq!(series.id(), 31635);
        assert_eq!(series.name().unwrap(), Some("Prison Break".to_string()));
    }

    #[test]
    fn test_series_is_reconstructed_each_call() {
        let stub = pilot_stub();
        let mut episode = Episode::by_id(475628, Arc::clone(&stub) as Arc<dyn Transport>).unwrap();

        episode.series().unwrap().name().unwrap();
        episode.series().unwrap().name().unwrap();
        // No shared cache between the two fresh series instances.
        assert_eq!(stub.request_count(SERIES_URL), 2);
    }

    #[test]
    fn test_season_includes_this_episode() {
        let stub = pilot_stub();
        let mut episode = Episode::by_id(475628, Arc::clone(&stub) as Arc<dyn Transport>).unwrap();

        let season = episode.season().unwrap();
        assert!(season.iter().any(|e| e.id() == episode.id()));
        assert_eq!(stub.request_count(LISTING_S1_URL), 1);
    }

    #[test]
    fn test_format_details_default_template() {
        let stub = pilot_stub();
        let mut episode = Episode::by_id(475628, Arc::clone(&stub) as Arc<dyn Transport>).unwrap();

        assert_eq!(
            episode.format_details(None).unwrap(),
            "Prison Break.s01e01 - Pilot"
        );
    }

    #[test]
    fn test_format_details_all_tokens() {
        let stub = pilot_stub();
        let mut episode = Episode::by_id(475628, Arc::clone(&stub) as Arc<dyn Transport>).unwrap();

        assert_eq!(
            episode.format_details(Some("%I %S s%s e%e %i %a")).unwrap(),
            "31635 Prison Break s1 e1 475628 2005-08-29"
        );
    }

    #[test]
    fn test_format_details_unknown_tokens_pass_through() {
        let stub = pilot_stub();
        let mut episode = Episode::by_id(475628, Arc::clone(&stub) as Arc<dyn Transport>).unwrap();

        assert_eq!(episode.format_details(Some("%q literal %")).unwrap(), "%q literal %");
        assert_eq!(episode.format_details(Some("no tokens")).unwrap(), "no tokens");
    }

    #[test]
    fn test_fetch_failure_carries_id_and_retries() {
        let stub = Arc::new(StubTransport::new().failure(EPISODE_URL, "connection reset"));
        let mut episode = Episode::by_id(475628, Arc::clone(&stub) as Arc<dyn Transport>).unwrap();

        match episode.summary() {
            Err(TvComError::FetchFailed { id, .. }) => assert_eq!(id, 475628),
            other => panic!("expected FetchFailed, got {:?}", other),
        }
        assert!(episode.summary().is_err());
        assert_eq!(stub.request_count(EPISODE_URL), 2);
    }
}
