//! Newsletter data model and aggregation
//!
//! This module folds the flat "new since X" item listing into the nested
//! model the renderer consumes: a list of movies plus a
//! series → season → episode tree. Series and seasons are created lazily
//! the first time one of their episodes shows up; they never exist empty.

use crate::duration::format_runtime_ticks;
use crate::jellyfin::{ContentApi, ContentCounts, EpisodeRecord, ImageType, JellyfinError};
use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;

/// Blur level requested for backdrop images; posters stay sharp.
const BACKDROP_BLUR: u8 = 5;

/// Errors that can occur while aggregating the new-items listing.
#[derive(Debug, Error)]
pub enum NewsletterError {
    /// The listing contained the same movie twice
    #[error("Movie {0} appeared twice in the new-items listing")]
    DuplicateMovie(String),

    /// The listing contained the same episode twice
    #[error("Episode {episode_id} appeared twice in season {season_id}")]
    DuplicateEpisode {
        episode_id: String,
        season_id: String,
    },

    /// Fetching metadata from the server failed
    #[error("Metadata fetch failed: {0}")]
    Api(#[from] JellyfinError),
}

/// A newly added episode. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub runtime_ticks: u64,
    /// Human-readable runtime, e.g. "42 min"
    pub duration: String,
    pub premiere_date: DateTime<Utc>,
    pub year: i32,
    /// Ordinal index of the episode within its season
    pub index_number: u32,
}

impl From<EpisodeRecord> for Episode {
    fn from(record: EpisodeRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            runtime_ticks: record.runtime_ticks,
            duration: format_runtime_ticks(record.runtime_ticks),
            premiere_date: record.premiere_date,
            year: record.premiere_date.year(),
            index_number: record.index_number,
        }
    }
}

/// A season holding the episodes of it that were newly added.
#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    pub id: String,
    pub series_id: String,
    pub title: String,
    pub year: i32,
    /// Ordinal index of the season within its series
    pub index_number: u32,
    /// Number of episodes of this season available on the server
    pub available_episode_count: usize,
    pub(crate) episodes: Vec<Episode>,
}

impl Season {
    fn fetch(api: &dyn ContentApi, id: &str, series_id: &str) -> Result<Self, NewsletterError> {
        let info = api.get_season_info(id)?;

        Ok(Self {
            id: id.to_string(),
            series_id: series_id.to_string(),
            title: info.title,
            year: info.premiere_date.year(),
            index_number: info.index_number,
            available_episode_count: info.episode_count,
            episodes: Vec::new(),
        })
    }

    /// Inserts an episode, keeping the collection sorted by ordinal index.
    ///
    /// Inserting an episode whose id is already present is a fatal error.
    fn add_episode(&mut self, episode: Episode) -> Result<(), NewsletterError> {
        if self.episodes.iter().any(|e| e.id == episode.id) {
            return Err(NewsletterError::DuplicateEpisode {
                episode_id: episode.id,
                season_id: self.id.clone(),
            });
        }

        self.episodes.push(episode);
        self.episodes.sort_by_key(|e| e.index_number);
        Ok(())
    }

    /// The newly added episodes, sorted by ordinal index.
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn added_episode_count(&self) -> usize {
        self.episodes.len()
    }

    /// True when every episode of this season on the server is new.
    pub fn is_fully_new(&self) -> bool {
        self.added_episode_count() == self.available_episode_count
    }
}

/// A series holding the seasons in which episodes were newly added.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub id: String,
    pub title: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub year: i32,
    /// Number of seasons available on the server
    pub available_season_count: usize,
    /// Number of episodes available on the server, across all seasons
    pub available_episode_count: usize,
    pub(crate) seasons: Vec<Season>,
}

impl Series {
    fn fetch(api: &dyn ContentApi, id: &str) -> Result<Self, NewsletterError> {
        let info = api.get_series_info(id)?;

        Ok(Self {
            id: id.to_string(),
            title: info.title,
            poster_url: api.image_url(id, ImageType::Primary, 0),
            backdrop_url: api.image_url(id, ImageType::Backdrop, BACKDROP_BLUR),
            year: info.premiere_date.year(),
            available_season_count: info.season_count,
            available_episode_count: info.episode_count,
            seasons: Vec::new(),
        })
    }

    /// Inserts an episode, creating its season on first sight.
    ///
    /// Seasons are kept sorted by their ordinal index, not by the order in
    /// which they were first seen.
    fn add_episode(
        &mut self,
        api: &dyn ContentApi,
        record: EpisodeRecord,
    ) -> Result<(), NewsletterError> {
        let pos = match self.seasons.iter().position(|s| s.id == record.season_id) {
            Some(pos) => pos,
            None => {
                let season = Season::fetch(api, &record.season_id, &self.id)?;
                self.seasons.push(season);
                self.seasons.len() - 1
            }
        };

        self.seasons[pos].add_episode(Episode::from(record))?;
        self.seasons.sort_by_key(|s| s.index_number);
        Ok(())
    }

    /// The seasons with newly added episodes, sorted by ordinal index.
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn added_episode_count(&self) -> usize {
        self.seasons.iter().map(Season::added_episode_count).sum()
    }

    /// True when every episode of this series on the server is new.
    pub fn is_new(&self) -> bool {
        self.added_episode_count() == self.available_episode_count
    }

    /// Mean runtime of the aggregated episodes, formatted for display.
    ///
    /// Returns `None` for a series without episodes. By construction a
    /// series only exists once an episode triggered its creation, so
    /// callers working off a composed newsletter always get a value.
    pub fn average_episode_duration(&self) -> Option<String> {
        let ticks: Vec<u64> = self
            .seasons
            .iter()
            .flat_map(|season| season.episodes.iter().map(|e| e.runtime_ticks))
            .collect();

        if ticks.is_empty() {
            return None;
        }

        let mean = ticks.iter().sum::<u64>() / ticks.len() as u64;
        Some(format_runtime_ticks(mean))
    }
}

/// A newly added movie. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: String,
    pub title: String,
    /// Human-readable runtime, e.g. "1h52"
    pub duration: String,
    pub year: i32,
    pub poster_url: String,
    pub backdrop_url: String,
}

impl Movie {
    fn fetch(api: &dyn ContentApi, id: &str) -> Result<Self, NewsletterError> {
        let info = api.get_movie_info(id)?;

        Ok(Self {
            title: info.title,
            duration: format_runtime_ticks(info.runtime_ticks),
            year: info.premiere_date.year(),
            poster_url: api.image_url(&info.id, ImageType::Primary, 0),
            backdrop_url: api.image_url(&info.id, ImageType::Backdrop, BACKDROP_BLUR),
            id: info.id,
        })
    }
}

/// The assembled newsletter: everything the renderer needs.
#[derive(Debug, Clone)]
pub struct Newsletter {
    pub(crate) movies: Vec<Movie>,
    pub(crate) series: Vec<Series>,
    /// Server-wide library totals, fetched once at construction
    pub totals: ContentCounts,
    /// Cutoff timestamp the listing was queried with
    pub since: DateTime<Utc>,
    pub server_name: String,
    pub public_url: String,
    pub server_logo_url: String,
    pub header_text: String,
    pub footer_text: String,
    pub random_fact: Option<String>,
}

impl Newsletter {
    pub(crate) fn add_movie(&mut self, api: &dyn ContentApi, id: &str) -> Result<(), NewsletterError> {
        let movie = Movie::fetch(api, id)?;

        if self.movies.iter().any(|m| m.id == movie.id) {
            return Err(NewsletterError::DuplicateMovie(movie.id));
        }

        self.movies.push(movie);
        Ok(())
    }

    pub(crate) fn add_episode(
        &mut self,
        api: &dyn ContentApi,
        record: EpisodeRecord,
    ) -> Result<(), NewsletterError> {
        let pos = match self.series.iter().position(|s| s.id == record.series_id) {
            Some(pos) => pos,
            None => {
                let series = Series::fetch(api, &record.series_id)?;
                self.series.push(series);
                self.series.len() - 1
            }
        };

        self.series[pos].add_episode(api, record)
    }

    /// The newly added movies, in listing order.
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// The series with newly added episodes, in first-sight order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn added_movie_count(&self) -> usize {
        self.movies.len()
    }

    pub fn added_episode_count(&self) -> usize {
        self.series.iter().map(Series::added_episode_count).sum()
    }

    /// Number of series for which every available episode is new.
    pub fn added_series_count(&self) -> usize {
        self.series.iter().filter(|s| s.is_new()).count()
    }
}
