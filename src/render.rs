//! HTML rendering
//!
//! Maps the aggregated newsletter onto the mail templates embedded under
//! `assets/mail/`. The renderer owns the placeholder contract: each template
//! below is rendered with exactly the named values listed at its call site,
//! and an unresolved placeholder aborts the run.

use crate::newsletter::{Movie, Newsletter, Season, Series};
use crate::template::{Template, TemplateError};

const DOCUMENT: Template = Template {
    name: "document",
    text: include_str!("../assets/mail/document.html"),
};

const HEADER: Template = Template {
    name: "header",
    text: include_str!("../assets/mail/header.html"),
};

const MOVIE_CARD: Template = Template {
    name: "movie_card",
    text: include_str!("../assets/mail/movie_card.html"),
};

const SERIES_CARD: Template = Template {
    name: "series_card",
    text: include_str!("../assets/mail/series_card.html"),
};

const SEASON_LINE: Template = Template {
    name: "season_line",
    text: include_str!("../assets/mail/season_line.html"),
};

const BADGE_NEW_SERIES: &str =
    r#"<span class="info-badge" style="background:#ff9800;">New Series</span>"#;
const BADGE_NEW_SEASON: &str =
    r#"<span class="info-badge" style="background:#9c27b0;">New Season</span>"#;
const BADGE_NEW_EPISODES: &str =
    r#"<span class="info-badge" style="background:#00bcd4;">New Episodes</span>"#;

/// Renders a populated newsletter into the final HTML document.
pub fn newsletter_to_html(newsletter: &Newsletter) -> Result<String, TemplateError> {
    let mut cards = Vec::new();

    for movie in newsletter.movies() {
        cards.push(movie_card(&newsletter.public_url, movie)?);
    }
    for series in newsletter.series() {
        cards.push(series_card(&newsletter.public_url, series)?);
    }

    let nb_new_movies = newsletter.added_movie_count();
    let nb_new_series = newsletter.added_series_count();
    let nb_new_episodes = newsletter.added_episode_count();

    DOCUMENT.render(&[
        ("header", &HEADER.render(&[])?),
        ("server_logo_url", &newsletter.server_logo_url),
        ("public_url", &newsletter.public_url),
        ("header_text", &newsletter.header_text),
        (
            "nb_movies",
            &newsletter.totals.movies.saturating_sub(nb_new_movies).to_string(),
        ),
        ("nb_new_movies", &nb_new_movies.to_string()),
        (
            "nb_series",
            &newsletter.totals.series.saturating_sub(nb_new_series).to_string(),
        ),
        ("nb_new_series", &nb_new_series.to_string()),
        (
            "nb_episodes",
            &newsletter.totals.episodes.saturating_sub(nb_new_episodes).to_string(),
        ),
        ("nb_new_episodes", &nb_new_episodes.to_string()),
        ("random_fact", newsletter.random_fact.as_deref().unwrap_or("")),
        ("body", &cards.join("\n")),
        ("footer", &newsletter.footer_text),
    ])
}

fn movie_card(public_url: &str, movie: &Movie) -> Result<String, TemplateError> {
    MOVIE_CARD.render(&[
        ("public_url", public_url),
        ("poster_image", &movie.poster_url),
        ("background_image", &movie.backdrop_url),
        ("title", &movie.title),
        ("duration", &movie.duration),
        ("year", &movie.year.to_string()),
        ("summary", ""),
    ])
}

fn series_card(public_url: &str, series: &Series) -> Result<String, TemplateError> {
    let seasons = series
        .seasons()
        .iter()
        .map(season_line)
        .collect::<Result<Vec<_>, _>>()?
        .join("\n");

    SERIES_CARD.render(&[
        ("public_url", public_url),
        ("poster_image", &series.poster_url),
        ("background_image", &series.backdrop_url),
        ("title", &series.title),
        ("badge", badge(series)),
        ("duration", &series.average_episode_duration().unwrap_or_default()),
        ("year", &series.year.to_string()),
        ("seasons", &seasons),
        ("summary", ""),
    ])
}

fn season_line(season: &Season) -> Result<String, TemplateError> {
    SEASON_LINE.render(&[
        ("title", &season.title),
        ("year", &season.year.to_string()),
        ("episode_span", &episode_span(season)),
    ])
}

/// The ordinal range of a season's new episodes, `"1-3"` or just `"5"`.
fn episode_span(season: &Season) -> String {
    // Episodes are kept sorted by ordinal index
    let (min, max) = match (season.episodes().first(), season.episodes().last()) {
        (Some(first), Some(last)) => (first.index_number, last.index_number),
        _ => return String::new(),
    };

    if min == max {
        min.to_string()
    } else {
        format!("{min}-{max}")
    }
}

/// Picks the single badge for a series card.
///
/// Priority: a fully new series beats a fully new season, which beats the
/// plain new-episodes badge. Exactly one badge is ever emitted.
fn badge(series: &Series) -> &'static str {
    if series.is_new() {
        BADGE_NEW_SERIES
    } else if series.seasons().iter().any(Season::is_fully_new) {
        BADGE_NEW_SEASON
    } else {
        BADGE_NEW_EPISODES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jellyfin::ContentCounts;
    use crate::newsletter::Episode;
    use chrono::{DateTime, TimeZone, Utc};

    const TICKS_PER_MINUTE: u64 = 10_000_000 * 60;

    fn premiere(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 5, 6, 0, 0, 0).unwrap()
    }

    fn episode(id: &str, index_number: u32) -> Episode {
        Episode {
            id: id.to_string(),
            title: format!("Episode {index_number}"),
            runtime_ticks: TICKS_PER_MINUTE * 55,
            duration: "55 min".to_string(),
            premiere_date: premiere(2003),
            year: 2003,
            index_number,
        }
    }

    fn season(id: &str, index_number: u32, available: usize, episodes: Vec<Episode>) -> Season {
        Season {
            id: id.to_string(),
            series_id: "serie-1".to_string(),
            title: format!("Season {index_number}"),
            year: 2002 + index_number as i32,
            index_number,
            available_episode_count: available,
            episodes,
        }
    }

    fn series(available_episodes: usize, seasons: Vec<Season>) -> Series {
        Series {
            id: "serie-1".to_string(),
            title: "The Wire".to_string(),
            poster_url: "https://img/poster".to_string(),
            backdrop_url: "https://img/backdrop".to_string(),
            year: 2002,
            available_season_count: seasons.len(),
            available_episode_count: available_episodes,
            seasons,
        }
    }

    fn movie(id: &str, title: &str) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            duration: "1h52".to_string(),
            year: 1999,
            poster_url: "https://img/poster".to_string(),
            backdrop_url: "https://img/backdrop".to_string(),
        }
    }

    fn newsletter(movies: Vec<Movie>, series: Vec<Series>) -> Newsletter {
        Newsletter {
            movies,
            series,
            totals: ContentCounts {
                movies: 10,
                series: 5,
                episodes: 100,
            },
            since: premiere(2024),
            server_name: "Test Server".to_string(),
            public_url: "https://media.example.org".to_string(),
            server_logo_url: "https://media.example.org/logo.png".to_string(),
            header_text: "Fresh from the server".to_string(),
            footer_text: "Bye".to_string(),
            random_fact: None,
        }
    }

    #[test]
    fn test_episode_span_renders_range() {
        let s = season("season-1", 1, 13, vec![episode("e1", 1), episode("e2", 2), episode("e3", 3)]);
        assert_eq!(episode_span(&s), "1-3");
    }

    #[test]
    fn test_episode_span_renders_single_index() {
        let s = season("season-1", 1, 13, vec![episode("e5", 5)]);
        assert_eq!(episode_span(&s), "5");
    }

    #[test]
    fn test_badge_new_series_when_everything_is_new() {
        let s = series(2, vec![season("season-1", 1, 2, vec![episode("e1", 1), episode("e2", 2)])]);
        assert_eq!(badge(&s), BADGE_NEW_SERIES);
    }

    #[test]
    fn test_badge_new_season_beats_new_episodes() {
        // Season 2 is fully new, but the series as a whole is not
        let s = series(
            15,
            vec![
                season("season-1", 1, 13, vec![episode("e13", 13)]),
                season("season-2", 2, 2, vec![episode("e14", 1), episode("e15", 2)]),
            ],
        );
        assert_eq!(badge(&s), BADGE_NEW_SEASON);
    }

    #[test]
    fn test_badge_falls_back_to_new_episodes() {
        let s = series(15, vec![season("season-1", 1, 13, vec![episode("e13", 13)])]);
        assert_eq!(badge(&s), BADGE_NEW_EPISODES);
    }

    #[test]
    fn test_document_renders_cards_in_order() {
        let fully_new_series = series(
            3,
            vec![
                season("season-1", 1, 2, vec![episode("e1", 1), episode("e2", 2)]),
                season("season-2", 2, 1, vec![episode("e3", 1)]),
            ],
        );
        let n = newsletter(
            vec![movie("m1", "Heat"), movie("m2", "Ronin")],
            vec![fully_new_series],
        );

        let html = newsletter_to_html(&n).unwrap();

        // Movies first, in insertion order, then the series
        let heat = html.find("Heat").unwrap();
        let ronin = html.find("Ronin").unwrap();
        let wire = html.find("The Wire").unwrap();
        assert!(heat < ronin && ronin < wire);

        // Exactly one badge, and it is the series-level one
        assert_eq!(html.matches(BADGE_NEW_SERIES).count(), 1);
        assert_eq!(html.matches(BADGE_NEW_SEASON).count(), 0);
        assert_eq!(html.matches(BADGE_NEW_EPISODES).count(), 0);

        // Three cards in total
        assert_eq!(html.matches("https://img/poster").count(), 3);
    }

    #[test]
    fn test_document_counts_subtract_new_items() {
        let n = newsletter(vec![movie("m1", "Heat")], Vec::new());

        let html = newsletter_to_html(&n).unwrap();

        // 10 total movies, 1 new: 9 before this run
        assert!(html.contains(r#"<div class="num">9</div><div>Movies</div>"#));
        assert!(html.contains("+1 new"));
    }

    #[test]
    fn test_missing_random_fact_renders_empty() {
        let n = newsletter(Vec::new(), Vec::new());

        let html = newsletter_to_html(&n).unwrap();
        assert!(html.contains(r#"<div class="fact"></div>"#));
    }
}
