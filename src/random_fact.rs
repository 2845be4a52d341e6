//! Random fact of the week
//!
//! Independent side feature: fetches a short fact from a public API,
//! optionally machine-translates it, and can run an interactive review loop
//! so the operator approves (or fixes) the text before it goes out.

use dialoguer::{Input, Select};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const FACT_ENDPOINT: &str = "https://uselessfacts.jsph.pl/api/v2/facts/random";
const TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while acquiring the random fact
#[derive(Debug, Error)]
pub enum RandomFactError {
    /// Request to the fact or translation endpoint failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Failed to parse a response body
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The translation response did not have the expected shape
    #[error("Unexpected translation response: {0}")]
    TranslationError(String),

    /// The interactive review prompt failed
    #[error("Console interaction failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Response body of the facts endpoint.
#[derive(Debug, Deserialize)]
struct FactResponse {
    text: String,
}

/// A fetched fact, in English and in the requested language.
///
/// Both fields are identical when the requested language is English.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomFact {
    pub english: String,
    pub translated: String,
}

/// Fetches a random fact, translating it when `lang` is not `"en"`.
pub fn fetch_random_fact(lang: &str) -> Result<RandomFact, RandomFactError> {
    let client = client()?;

    let fact: FactResponse = client
        .get(FACT_ENDPOINT)
        .send()
        .map_err(|e| RandomFactError::RequestError(e.to_string()))?
        .error_for_status()
        .map_err(|e| RandomFactError::RequestError(e.to_string()))?
        .json()
        .map_err(|e| RandomFactError::ParseError(e.to_string()))?;

    let translated = if lang == "en" {
        fact.text.clone()
    } else {
        translate(&client, &fact.text, lang)?
    };

    Ok(RandomFact {
        english: fact.text,
        translated,
    })
}

/// Interactively reviews facts until the operator accepts one.
///
/// Accepting returns the proposed translation; rejecting fetches a fresh
/// fact. A hand-typed translation fix does not end the review: the fixed
/// text is proposed again for a final yes/no.
pub fn review_random_fact(lang: &str) -> Result<String, RandomFactError> {
    let mut fact = fetch_random_fact(lang)?;

    loop {
        println!("\nProposition:\n{}\n{}\n", fact.english, fact.translated);

        let choice = Select::new()
            .with_prompt("Use this fact?")
            .items(&["Yes", "No, fetch another", "Fix translation"])
            .default(0)
            .interact()?;

        match choice {
            0 => return Ok(fact.translated),
            1 => fact = fetch_random_fact(lang)?,
            _ => {
                let fixed: String = Input::new().with_prompt("Enter fix").interact_text()?;
                fact = apply_translation_fix(fact, fixed);
            }
        }
    }
}

/// Replaces the proposed translation with a hand-typed fix.
///
/// The English source is kept so the next review round still shows what the
/// fix was made against.
fn apply_translation_fix(fact: RandomFact, fixed: String) -> RandomFact {
    RandomFact {
        english: fact.english,
        translated: fixed,
    }
}

fn client() -> Result<reqwest::blocking::Client, RandomFactError> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| RandomFactError::RequestError(e.to_string()))
}

/// Translates English text via the public Google translate endpoint.
fn translate(
    client: &reqwest::blocking::Client,
    text: &str,
    target_lang: &str,
) -> Result<String, RandomFactError> {
    let body: Value = client
        .get(TRANSLATE_ENDPOINT)
        .query(&[
            ("client", "gtx"),
            ("sl", "en"),
            ("tl", target_lang),
            ("dt", "t"),
            ("q", text),
        ])
        .send()
        .map_err(|e| RandomFactError::RequestError(e.to_string()))?
        .error_for_status()
        .map_err(|e| RandomFactError::RequestError(e.to_string()))?
        .json()
        .map_err(|e| RandomFactError::ParseError(e.to_string()))?;

    collect_translated_segments(&body)
}

/// Extracts the translated text from the endpoint's nested-array response.
///
/// The body looks like `[[["Bonjour", "Hello", ...], ...], ...]`; the first
/// element of each inner array is one translated segment.
fn collect_translated_segments(body: &Value) -> Result<String, RandomFactError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| RandomFactError::TranslationError(body.to_string()))?;

    let mut translated = String::new();
    for segment in segments {
        let part = segment
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| RandomFactError::TranslationError(segment.to_string()))?;
        translated.push_str(part);
    }

    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collects_translation_segments_in_order() {
        let body = json!([
            [
                ["Les chats dorment ", "Cats sleep ", null],
                ["seize heures par jour.", "sixteen hours a day.", null]
            ],
            null,
            "en"
        ]);

        assert_eq!(
            collect_translated_segments(&body).unwrap(),
            "Les chats dorment seize heures par jour."
        );
    }

    #[test]
    fn test_translation_fix_keeps_the_english_source() {
        let fact = RandomFact {
            english: "Cats sleep sixteen hours a day.".to_string(),
            translated: "Les chats dorment seize heurs par jour.".to_string(),
        };

        let fixed = apply_translation_fix(fact, "Les chats dorment seize heures par jour.".to_string());
        assert_eq!(fixed.english, "Cats sleep sixteen hours a day.");
        assert_eq!(fixed.translated, "Les chats dorment seize heures par jour.");
    }

    #[test]
    fn test_unexpected_translation_shape_is_an_error() {
        let body = json!({ "error": "nope" });

        let err = collect_translated_segments(&body).unwrap_err();
        assert!(matches!(err, RandomFactError::TranslationError(_)));
    }
}
