use chrono::{Duration, Utc};
use clap::Parser;
use newsreel::{
    ComposeParams, Config, JellyfinClient, Mailer, ProgressEvent, compose_newsletter,
    fetch_random_fact, newsletter_to_html, review_random_fact,
};
use std::process;

/// Build and send an email newsletter of the movies and episodes newly
/// added to a Jellyfin server.
#[derive(Debug, Parser)]
#[command(name = "newsreel", version)]
struct Cli {
    /// How many days to look back for new content
    #[arg(long, default_value_t = 30)]
    since_days: i64,

    /// Recipient email address (repeatable)
    #[arg(long = "to", value_name = "ADDRESS")]
    recipients: Vec<String>,

    /// Subject line (default: "New on <server name>")
    #[arg(long)]
    subject: Option<String>,

    /// Print the rendered HTML to stdout instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Include a random fact, translated to this language when not "en"
    #[arg(long, value_name = "LANG")]
    fact_lang: Option<String>,

    /// Interactively review the random fact before it goes out
    #[arg(long, requires = "fact_lang")]
    review_fact: bool,
}

/// Handles progress events and prints formatted output to stdout
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::Started { since } => {
            println!("Composing newsletter for everything added since {since}...");
        }
        ProgressEvent::FetchingServerInfo => {
            println!("\nFetching server info...");
        }
        ProgressEvent::ServerInfoFetched {
            server_name,
            totals,
        } => {
            println!(
                "Server '{}': {} movies, {} series, {} episodes",
                server_name, totals.movies, totals.series, totals.episodes
            );
        }
        ProgressEvent::FetchingNewItems => {
            println!("\nFetching new items...");
        }
        ProgressEvent::NewItemsFound { count } => {
            if count == 0 {
                println!("Nothing new on the server.");
            } else {
                println!("Found {count} new item(s)\n");
            }
        }
        ProgressEvent::ProcessingItem { index, total } => {
            println!("[{}/{}] Aggregating...", index + 1, total);
        }
        ProgressEvent::Complete {
            movie_count,
            series_count,
            episode_count,
        } => {
            println!(
                "\nNewsletter composed: {movie_count} movie(s), {episode_count} episode(s) across {series_count} series."
            );
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if !cli.dry_run && cli.recipients.is_empty() {
        eprintln!("Error: no recipients. Pass --to at least once, or use --dry-run.");
        process::exit(1);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let random_fact = match &cli.fact_lang {
        Some(lang) if cli.review_fact => review_random_fact(lang).map(Some),
        Some(lang) => fetch_random_fact(lang).map(|fact| Some(fact.translated)),
        None => Ok(None),
    };
    let random_fact = match random_fact {
        Ok(fact) => fact,
        Err(e) => {
            eprintln!("Error while fetching the random fact: {e}");
            process::exit(1);
        }
    };

    let api = JellyfinClient::new(
        &config.jellyfin.public_url,
        &config.jellyfin.api_key,
        &config.jellyfin.admin_user_id,
    );

    let params = ComposeParams {
        since: Utc::now() - Duration::days(cli.since_days),
        public_url: api.public_url().to_string(),
        server_logo_url: config.server_logo_url.clone(),
        header_text: config.header_text.clone(),
        footer_text: config.footer_text.clone(),
        random_fact,
    };

    let newsletter = match compose_newsletter(&api, params, handle_progress_event) {
        Ok(newsletter) => newsletter,
        Err(e) => {
            eprintln!("\nError while composing the newsletter: {e}");
            process::exit(1);
        }
    };

    let html = match newsletter_to_html(&newsletter) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("\nError while rendering the newsletter: {e}");
            process::exit(1);
        }
    };

    if cli.dry_run {
        println!("{html}");
        return;
    }

    let subject = cli
        .subject
        .unwrap_or_else(|| format!("New on {}", newsletter.server_name));

    let mailer = Mailer::new(
        &config.smtp.host,
        &config.smtp.username,
        &config.smtp.password,
        &config.smtp.from,
    );

    println!(
        "\nSending '{}' to {} recipient(s)...",
        subject,
        cli.recipients.len()
    );

    match mailer.send(&subject, &html, &cli.recipients) {
        Ok(()) => println!("Newsletter sent!"),
        Err(e) => {
            eprintln!("\nError while sending the newsletter: {e}");
            process::exit(1);
        }
    }
}
