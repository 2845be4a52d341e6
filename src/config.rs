//! Environment-based configuration
//!
//! Connection parameters and secrets come from environment variables so they
//! stay out of shell history and cron definitions; presentation text has
//! sensible defaults.

use std::env;
use thiserror::Error;

/// Default header paragraph shown above the statistics block.
const DEFAULT_HEADER_TEXT: &str =
    "Here is what landed on the server since the last newsletter. Enjoy!";

/// Errors that can occur while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Environment variable {0} is not set")]
    MissingVariable(&'static str),
}

/// Connection parameters for the Jellyfin server.
#[derive(Debug, Clone)]
pub struct JellyfinConfig {
    /// Public base URL of the server, e.g. `https://media.example.org`
    pub public_url: String,
    /// API key used for all requests
    pub api_key: String,
    /// Id of the admin user the library is queried as
    pub admin_user_id: String,
}

/// Connection parameters for the SMTP account.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Sender address for the newsletter
    pub from: String,
}

/// Full configuration of a newsletter run.
#[derive(Debug, Clone)]
pub struct Config {
    pub jellyfin: JellyfinConfig,
    pub smtp: SmtpConfig,
    /// Logo image shown at the top of the email
    pub server_logo_url: String,
    /// Greeting paragraph under the logo
    pub header_text: String,
    /// Footer line at the bottom of the email
    pub footer_text: String,
}

impl Config {
    /// Loads the configuration from environment variables.
    ///
    /// # Required
    /// `JELLYFIN_PUBLIC_URL`, `JELLYFIN_API_KEY`, `JELLYFIN_ADMIN_USER_ID`,
    /// `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `MAIL_FROM`
    ///
    /// # Optional
    /// `SERVER_LOGO_URL` (defaults to the Jellyfin banner on the server),
    /// `HEADER_TEXT`, `FOOTER_TEXT`
    pub fn from_env() -> Result<Self, ConfigError> {
        let public_url = required("JELLYFIN_PUBLIC_URL")?;
        let public_url = public_url.trim_end_matches('/').to_string();

        let server_logo_url = env::var("SERVER_LOGO_URL")
            .unwrap_or_else(|_| format!("{public_url}/web/assets/img/banner-light.png"));

        Ok(Self {
            jellyfin: JellyfinConfig {
                api_key: required("JELLYFIN_API_KEY")?,
                admin_user_id: required("JELLYFIN_ADMIN_USER_ID")?,
                public_url,
            },
            smtp: SmtpConfig {
                host: required("SMTP_HOST")?,
                username: required("SMTP_USERNAME")?,
                password: required("SMTP_PASSWORD")?,
                from: required("MAIL_FROM")?,
            },
            server_logo_url,
            header_text: env::var("HEADER_TEXT")
                .unwrap_or_else(|_| DEFAULT_HEADER_TEXT.to_string()),
            footer_text: env::var("FOOTER_TEXT").unwrap_or_default(),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVariable(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_error_names_the_variable() {
        let err = required("NEWSREEL_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVariable("NEWSREEL_TEST_UNSET_VARIABLE")
        ));
        assert_eq!(
            err.to_string(),
            "Environment variable NEWSREEL_TEST_UNSET_VARIABLE is not set"
        );
    }
}
