/// Data structures and traits for talking to a Jellyfin media server.
///
/// This module defines the parsed-and-validated record types the rest of the
/// crate consumes, as well as the trait implemented by the HTTP client. Raw
/// JSON is only handled inside the client; everything past this boundary has
/// named, typed fields.
mod client;
mod types;

pub use client::JellyfinClient;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while fetching data from the server.
#[derive(Debug, Error)]
pub enum JellyfinError {
    /// Request to the server failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Failed to parse the server's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// A record is missing a field the newsletter needs
    #[error("Item {item_id} is missing required field '{field}'")]
    MissingField {
        item_id: String,
        field: &'static str,
    },

    /// A record carries a premiere date that cannot be parsed
    #[error("Item {item_id} has invalid premiere date '{value}': {source}")]
    InvalidDate {
        item_id: String,
        value: String,
        source: chrono::ParseError,
    },

    /// The new-items listing contained an item type we do not handle
    #[error("Unrecognized item type '{item_type}' for item {item_id}")]
    UnrecognizedItemType { item_id: String, item_type: String },
}

/// Image variants the newsletter requests from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Primary,
    Backdrop,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Primary => "Primary",
            ImageType::Backdrop => "Backdrop",
        }
    }
}

/// An entry from the new-items listing, already sorted by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NewItem {
    /// A newly added movie; full metadata is fetched separately
    Movie { id: String },
    /// A newly added episode with everything needed to aggregate it
    Episode(EpisodeRecord),
}

/// A validated episode entry from the new-items listing.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub id: String,
    pub series_id: String,
    pub season_id: String,
    pub title: String,
    pub runtime_ticks: u64,
    pub premiere_date: DateTime<Utc>,
    pub index_number: u32,
}

/// Full metadata for a single movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieInfo {
    pub id: String,
    pub title: String,
    pub runtime_ticks: u64,
    pub premiere_date: DateTime<Utc>,
}

/// Full metadata for a series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesInfo {
    pub title: String,
    pub premiere_date: DateTime<Utc>,
    /// Number of seasons available on the server
    pub season_count: usize,
    /// Number of episodes available on the server, across all seasons
    pub episode_count: usize,
}

/// Full metadata for a season.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonInfo {
    pub title: String,
    pub premiere_date: DateTime<Utc>,
    pub index_number: u32,
    /// Number of episodes of this season available on the server
    pub episode_count: usize,
}

/// Server-wide library totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentCounts {
    pub movies: usize,
    pub series: usize,
    pub episodes: usize,
}

/// Trait for the media server operations the newsletter consumes.
///
/// `JellyfinClient` is the production implementation; tests substitute an
/// in-memory fake.
pub trait ContentApi {
    /// Lists the movies and episodes added to the server since the cutoff.
    fn get_new_items(&self, since: DateTime<Utc>) -> Result<Vec<NewItem>, JellyfinError>;

    /// Fetches full metadata for a movie.
    fn get_movie_info(&self, id: &str) -> Result<MovieInfo, JellyfinError>;

    /// Fetches full metadata for a series.
    fn get_series_info(&self, id: &str) -> Result<SeriesInfo, JellyfinError>;

    /// Fetches full metadata for a season.
    fn get_season_info(&self, id: &str) -> Result<SeasonInfo, JellyfinError>;

    /// Builds the public URL of an item image, optionally blurred.
    fn image_url(&self, item_id: &str, image_type: ImageType, blur_level: u8) -> String;

    /// Fetches the server-wide movie/series/episode totals.
    fn get_content_counts(&self) -> Result<ContentCounts, JellyfinError>;

    /// Fetches the display name of the server.
    fn get_server_name(&self) -> Result<String, JellyfinError>;
}
