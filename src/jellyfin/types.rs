/// Jellyfin API response types for deserialization.
///
/// These structures mirror the JSON response format of the Jellyfin REST
/// API. Fields the server may omit are `Option` here and validated into the
/// typed records in `client.rs`.
use serde::Deserialize;

/// Paged item listing, as returned by `/Users/{id}/Items`.
#[derive(Debug, Deserialize)]
pub(super) struct ItemsPage {
    /// The items of the current page
    #[serde(rename = "Items")]
    pub items: Vec<ItemDto>,
}

/// A single library item (movie, episode, series, or season).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ItemDto {
    pub id: String,
    pub name: Option<String>,
    /// Item kind, e.g. "Movie" or "Episode"
    #[serde(rename = "Type")]
    pub item_type: Option<String>,
    pub run_time_ticks: Option<u64>,
    /// ISO-8601 premiere date, e.g. "2019-05-06T00:00:00.0000000Z"
    pub premiere_date: Option<String>,
    /// Ordinal index (episode within season, or season within series)
    pub index_number: Option<u32>,
    pub series_id: Option<String>,
    pub season_id: Option<String>,
    /// For a series: number of seasons
    pub child_count: Option<usize>,
    /// For a series or season: number of episodes underneath
    pub recursive_item_count: Option<usize>,
}

/// Library totals, as returned by `/Items/Counts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct CountsDto {
    pub movie_count: usize,
    pub series_count: usize,
    pub episode_count: usize,
}

/// Public server info, as returned by `/System/Info/Public`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct PublicSystemInfoDto {
    pub server_name: String,
}
