//! newsreel - Email newsletters for newly added Jellyfin content
//!
//! This library queries a Jellyfin server for the movies and episodes added
//! since a cutoff, aggregates them into a movie list plus a
//! series → season → episode tree, renders the result as an HTML email, and
//! sends it over SMTP.

mod config;
mod duration;
mod jellyfin;
mod mailer;
mod newsletter;
mod random_fact;
mod render;
mod template;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use config::{Config, ConfigError, JellyfinConfig, SmtpConfig};
pub use duration::format_runtime_ticks;
pub use jellyfin::{
    ContentApi, ContentCounts, EpisodeRecord, ImageType, JellyfinClient, JellyfinError, MovieInfo,
    NewItem, SeasonInfo, SeriesInfo,
};
pub use mailer::{Mailer, MailerError};
pub use newsletter::{Episode, Movie, Newsletter, NewsletterError, Season, Series};
pub use random_fact::{RandomFact, RandomFactError, fetch_random_fact, review_random_fact};
pub use render::newsletter_to_html;
pub use template::TemplateError;

/// Progress event emitted while the newsletter is assembled
///
/// These events allow library users to track progress and provide feedback;
/// the CLI prints them, other callers may ignore them.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Composition started
    Started { since: DateTime<Utc> },

    /// Fetching server name and library totals
    FetchingServerInfo,

    /// Server info fetched
    ServerInfoFetched {
        server_name: String,
        totals: ContentCounts,
    },

    /// Fetching the new-items listing
    FetchingNewItems,

    /// Listing fetched
    NewItemsFound { count: usize },

    /// Aggregating one item of the listing
    ProcessingItem { index: usize, total: usize },

    /// Composition complete
    Complete {
        movie_count: usize,
        series_count: usize,
        episode_count: usize,
    },
}

/// Presentation inputs for a newsletter run.
#[derive(Debug, Clone)]
pub struct ComposeParams {
    /// Only items added after this timestamp are included
    pub since: DateTime<Utc>,
    /// Public base URL the cards link back to
    pub public_url: String,
    /// Logo image shown at the top of the email
    pub server_logo_url: String,
    /// Greeting paragraph under the logo
    pub header_text: String,
    /// Footer line at the bottom of the email
    pub footer_text: String,
    /// Optional fact-of-the-week text
    pub random_fact: Option<String>,
}

/// Top-level error type for newsreel operations
#[derive(Debug, Error)]
pub enum NewsreelError {
    /// Error while loading configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while talking to the media server
    #[error("Media server error: {0}")]
    Jellyfin(#[from] JellyfinError),

    /// Error while aggregating the new-items listing
    #[error("Aggregation error: {0}")]
    Newsletter(#[from] NewsletterError),

    /// Error while rendering the HTML document
    #[error("Render error: {0}")]
    Template(#[from] TemplateError),

    /// Error while sending the email
    #[error("Mailer error: {0}")]
    Mailer(#[from] MailerError),

    /// Error while acquiring the random fact
    #[error("Random fact error: {0}")]
    RandomFact(#[from] RandomFactError),
}

/// Composes the newsletter for everything added since `params.since`
///
/// Fetches the library totals and server name once, then folds the
/// new-items listing into the newsletter strictly in listing order. Any
/// duplicate identifier, unrecognized item type, or fetch failure aborts
/// composition.
///
/// # Examples
///
/// ```no_run
/// use newsreel::{ComposeParams, JellyfinClient, compose_newsletter};
///
/// let api = JellyfinClient::new("https://media.example.org", "api-key", "admin-id");
/// let newsletter = compose_newsletter(
///     &api,
///     ComposeParams {
///         since: chrono::Utc::now() - chrono::Duration::days(30),
///         public_url: "https://media.example.org".to_string(),
///         server_logo_url: "https://media.example.org/logo.png".to_string(),
///         header_text: "Here is what's new!".to_string(),
///         footer_text: String::new(),
///         random_fact: None,
///     },
///     |_| {}, // Ignore all progress events
/// ).unwrap();
///
/// let html = newsreel::newsletter_to_html(&newsletter).unwrap();
/// ```
pub fn compose_newsletter<F>(
    api: &dyn ContentApi,
    params: ComposeParams,
    mut progress_callback: F,
) -> Result<Newsletter, NewsreelError>
where
    F: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::Started {
        since: params.since,
    });

    progress_callback(ProgressEvent::FetchingServerInfo);
    let totals = api.get_content_counts()?;
    let server_name = api.get_server_name()?;
    progress_callback(ProgressEvent::ServerInfoFetched {
        server_name: server_name.clone(),
        totals,
    });

    let mut newsletter = Newsletter {
        movies: Vec::new(),
        series: Vec::new(),
        totals,
        since: params.since,
        server_name,
        public_url: params.public_url,
        server_logo_url: params.server_logo_url,
        header_text: params.header_text,
        footer_text: params.footer_text,
        random_fact: params.random_fact,
    };

    progress_callback(ProgressEvent::FetchingNewItems);
    let items = api.get_new_items(params.since)?;
    progress_callback(ProgressEvent::NewItemsFound { count: items.len() });

    let total = items.len();
    for (index, item) in items.into_iter().enumerate() {
        progress_callback(ProgressEvent::ProcessingItem { index, total });

        match item {
            NewItem::Movie { id } => newsletter.add_movie(api, &id)?,
            NewItem::Episode(record) => newsletter.add_episode(api, record)?,
        }
    }

    progress_callback(ProgressEvent::Complete {
        movie_count: newsletter.added_movie_count(),
        series_count: newsletter.series().len(),
        episode_count: newsletter.added_episode_count(),
    });

    Ok(newsletter)
}
