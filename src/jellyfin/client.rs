/// HTTP client for the Jellyfin REST API.
use super::types::{CountsDto, ItemDto, ItemsPage, PublicSystemInfoDto};
use super::{
    ContentApi, ContentCounts, EpisodeRecord, ImageType, JellyfinError, MovieInfo, NewItem,
    SeasonInfo, SeriesInfo,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Client for a Jellyfin server.
///
/// Authenticates with an API key (`X-Emby-Token` header) and queries the
/// library as the configured admin user. All calls are blocking; the
/// newsletter is assembled strictly sequentially.
pub struct JellyfinClient {
    client: reqwest::blocking::Client,
    public_url: String,
    api_key: String,
    user_id: String,
}

impl JellyfinClient {
    /// Creates a new client for the server at `public_url`.
    pub fn new(public_url: &str, api_key: &str, admin_user_id: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            public_url: public_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            user_id: admin_user_id.to_string(),
        }
    }

    /// The public base URL of the server, without a trailing slash.
    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    /// Performs a GET request against the API and deserializes the response.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, JellyfinError> {
        let url = format!("{}{}", self.public_url, path);

        let response = self
            .client
            .get(&url)
            .header("X-Emby-Token", &self.api_key)
            .query(query)
            .send()
            .map_err(|e| JellyfinError::RequestError(e.to_string()))?;

        // Ensure request was successful
        if !response.status().is_success() {
            return Err(JellyfinError::RequestError(format!(
                "HTTP {} {} for {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown"),
                url,
            )));
        }

        response
            .json()
            .map_err(|e| JellyfinError::ParseError(e.to_string()))
    }
}

impl ContentApi for JellyfinClient {
    fn get_new_items(&self, since: DateTime<Utc>) -> Result<Vec<NewItem>, JellyfinError> {
        let since = since.to_rfc3339();
        let page: ItemsPage = self.get_json(
            &format!("/Users/{}/Items", self.user_id),
            &[
                ("Recursive", "true"),
                ("IncludeItemTypes", "Movie,Episode"),
                ("Fields", "PremiereDate"),
                ("SortBy", "DateCreated"),
                ("SortOrder", "Ascending"),
                ("minDateCreated", since.as_str()),
            ],
        )?;

        page.items.into_iter().map(convert_new_item).collect()
    }

    fn get_movie_info(&self, id: &str) -> Result<MovieInfo, JellyfinError> {
        let dto: ItemDto = self.get_json(&format!("/Users/{}/Items/{}", self.user_id, id), &[])?;
        convert_movie_info(dto)
    }

    fn get_series_info(&self, id: &str) -> Result<SeriesInfo, JellyfinError> {
        let dto: ItemDto = self.get_json(&format!("/Users/{}/Items/{}", self.user_id, id), &[])?;
        convert_series_info(dto)
    }

    fn get_season_info(&self, id: &str) -> Result<SeasonInfo, JellyfinError> {
        let dto: ItemDto = self.get_json(&format!("/Users/{}/Items/{}", self.user_id, id), &[])?;
        convert_season_info(dto)
    }

    fn image_url(&self, item_id: &str, image_type: ImageType, blur_level: u8) -> String {
        format!(
            "{}/Items/{}/Images/{}?blur={}",
            self.public_url,
            item_id,
            image_type.as_str(),
            blur_level,
        )
    }

    fn get_content_counts(&self) -> Result<ContentCounts, JellyfinError> {
        let counts: CountsDto = self.get_json("/Items/Counts", &[("userId", &self.user_id)])?;

        Ok(ContentCounts {
            movies: counts.movie_count,
            series: counts.series_count,
            episodes: counts.episode_count,
        })
    }

    fn get_server_name(&self) -> Result<String, JellyfinError> {
        let info: PublicSystemInfoDto = self.get_json("/System/Info/Public", &[])?;
        Ok(info.server_name)
    }
}

/// Unwraps an optional DTO field, failing with a typed error when absent.
fn required<T>(value: Option<T>, item_id: &str, field: &'static str) -> Result<T, JellyfinError> {
    value.ok_or_else(|| JellyfinError::MissingField {
        item_id: item_id.to_string(),
        field,
    })
}

/// Parses an ISO-8601 premiere date as reported by the server.
fn parse_premiere_date(item_id: &str, value: &str) -> Result<DateTime<Utc>, JellyfinError> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|source| JellyfinError::InvalidDate {
            item_id: item_id.to_string(),
            value: value.to_string(),
            source,
        })
}

/// Converts a new-items listing entry into a validated `NewItem`.
fn convert_new_item(dto: ItemDto) -> Result<NewItem, JellyfinError> {
    let item_type = required(dto.item_type.clone(), &dto.id, "Type")?;

    match item_type.as_str() {
        "Movie" => Ok(NewItem::Movie { id: dto.id }),
        "Episode" => {
            let premiere = required(dto.premiere_date.clone(), &dto.id, "PremiereDate")?;

            Ok(NewItem::Episode(EpisodeRecord {
                series_id: required(dto.series_id, &dto.id, "SeriesId")?,
                season_id: required(dto.season_id, &dto.id, "SeasonId")?,
                title: required(dto.name, &dto.id, "Name")?,
                runtime_ticks: required(dto.run_time_ticks, &dto.id, "RunTimeTicks")?,
                premiere_date: parse_premiere_date(&dto.id, &premiere)?,
                index_number: required(dto.index_number, &dto.id, "IndexNumber")?,
                id: dto.id,
            }))
        }
        _ => Err(JellyfinError::UnrecognizedItemType {
            item_id: dto.id,
            item_type,
        }),
    }
}

/// Converts an item DTO into validated movie metadata.
fn convert_movie_info(dto: ItemDto) -> Result<MovieInfo, JellyfinError> {
    let premiere = required(dto.premiere_date, &dto.id, "PremiereDate")?;

    Ok(MovieInfo {
        title: required(dto.name, &dto.id, "Name")?,
        runtime_ticks: required(dto.run_time_ticks, &dto.id, "RunTimeTicks")?,
        premiere_date: parse_premiere_date(&dto.id, &premiere)?,
        id: dto.id,
    })
}

/// Converts an item DTO into validated series metadata.
fn convert_series_info(dto: ItemDto) -> Result<SeriesInfo, JellyfinError> {
    let premiere = required(dto.premiere_date, &dto.id, "PremiereDate")?;

    Ok(SeriesInfo {
        title: required(dto.name, &dto.id, "Name")?,
        premiere_date: parse_premiere_date(&dto.id, &premiere)?,
        season_count: required(dto.child_count, &dto.id, "ChildCount")?,
        episode_count: required(dto.recursive_item_count, &dto.id, "RecursiveItemCount")?,
    })
}

/// Converts an item DTO into validated season metadata.
fn convert_season_info(dto: ItemDto) -> Result<SeasonInfo, JellyfinError> {
    let premiere = required(dto.premiere_date, &dto.id, "PremiereDate")?;

    Ok(SeasonInfo {
        title: required(dto.name, &dto.id, "Name")?,
        premiere_date: parse_premiere_date(&dto.id, &premiere)?,
        index_number: required(dto.index_number, &dto.id, "IndexNumber")?,
        episode_count: required(dto.recursive_item_count, &dto.id, "RecursiveItemCount")?,
    })
}
