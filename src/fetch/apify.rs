use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::comment::comment_model::{RawComment, Timestamp};
use crate::error::PickerError;
use crate::fetch::CommentSource;

pub const DEFAULT_BASE_URL: &str = "https://api.apify.com";
pub const DEFAULT_ACTOR: &str = "apify~instagram-scraper";

/// Longest error body carried in `PickerError::FetchStatus`.
const MAX_ERROR_BODY_CHARS: usize = 500;

// ============================================================================
// Request payload
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApifyRunRequest {
    pub direct_urls: Vec<String>,
    pub results_type: &'static str,
    pub results_limit: u32,
    pub search_type: &'static str,
    pub search_limit: u32,
    pub max_comments: u32,
}

impl ApifyRunRequest {
    pub fn comments(post_url: &str, limit: u32) -> Self {
        Self {
            direct_urls: vec![post_url.to_string()],
            results_type: "comments",
            results_limit: limit,
            search_type: "hashtag",
            search_limit: 1,
            max_comments: limit,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Resolved settings for one Apify client.
#[derive(Debug, Clone)]
pub struct ApifySettings {
    pub token: String,
    pub base_url: String,
    pub actor: String,
    pub results_limit: u32,
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff: Duration,
}

/// Fetches Instagram comments through the Apify scraper's synchronous
/// run-and-return-dataset endpoint.
pub struct ApifyClient {
    settings: ApifySettings,
    client: reqwest::blocking::Client,
}

impl ApifyClient {
    pub fn new(settings: ApifySettings) -> Result<Self, PickerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(PickerError::HttpClient)?;
        Ok(Self { settings, client })
    }

    pub fn endpoint(&self) -> String {
        dataset_endpoint(&self.settings.base_url, &self.settings.actor)
    }
}

impl CommentSource for ApifyClient {
    fn fetch(&self, post_url: &str) -> Result<Vec<RawComment>, PickerError> {
        let post_url = validate_post_url(post_url)?;
        let endpoint = self.endpoint();
        let request = ApifyRunRequest::comments(post_url, self.settings.results_limit);

        let mut attempt = 0;
        loop {
            attempt += 1;
            info!(post_url, attempt, "calling Apify");

            // Token travels in a header; reqwest error text includes the URL
            let outcome = self
                .client
                .post(&endpoint)
                .bearer_auth(&self.settings.token)
                .json(&request)
                .send();

            let retries_left = attempt <= self.settings.max_retries;

            match outcome {
                Ok(response) if response.status().is_success() => {
                    let data: Value = response
                        .json()
                        .map_err(|e| PickerError::ResponseFormat(e.without_url().to_string()))?;
                    let comments = parse_dataset_items(&data)?;
                    info!(count = comments.len(), "parsed comments from Apify");
                    return Ok(comments);
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = match response.text() {
                        Ok(body) => body,
                        Err(e) => {
                            let error = e.without_url();
                            debug!(status, %error, "could not read Apify error body");
                            String::new()
                        }
                    };
                    if is_retryable_status(status) && retries_left {
                        let delay = backoff_delay(self.settings.backoff, attempt);
                        warn!(status, ?delay, "Apify returned retryable status, backing off");
                        std::thread::sleep(delay);
                        continue;
                    }
                    return Err(PickerError::FetchStatus {
                        status,
                        body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
                    });
                }
                Err(source) => {
                    let source = source.without_url();
                    if retries_left {
                        let delay = backoff_delay(self.settings.backoff, attempt);
                        warn!(error = %source, ?delay, "Apify request failed, backing off");
                        std::thread::sleep(delay);
                        continue;
                    }
                    return Err(PickerError::FetchTransport { attempts: attempt, source });
                }
            }
        }
    }
}

// ============================================================================
// Pure helpers
// ============================================================================

pub fn dataset_endpoint(base_url: &str, actor: &str) -> String {
    format!(
        "{}/v2/acts/{}/run-sync-get-dataset-items",
        base_url.trim_end_matches('/'),
        actor
    )
}

/// Accept only Instagram post URLs. Returns the trimmed URL.
pub fn validate_post_url(url: &str) -> Result<&str, PickerError> {
    let url = url.trim();
    if url.is_empty() || !url.contains("instagram.com") {
        return Err(PickerError::InvalidPostUrl(url.to_string()));
    }
    Ok(url)
}

/// 429 and 5xx are worth another attempt; anything else is final.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Exponential backoff: `base * 2^(attempt - 1)`, exponent capped at 10.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10);
    base.saturating_mul(1u32 << exponent)
}

/// Map an Apify dataset (JSON array of comment items) to raw comments.
///
/// Items with neither `ownerUsername` nor `username` are dropped here;
/// everything else is left for the normalizer.
pub fn parse_dataset_items(data: &Value) -> Result<Vec<RawComment>, PickerError> {
    let items = data.as_array().ok_or_else(|| {
        PickerError::ResponseFormat(format!("expected a JSON array, got {}", json_kind(data)))
    })?;

    let mut comments = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let username =
            non_empty_str(&item["ownerUsername"]).or_else(|| non_empty_str(&item["username"]));
        let Some(username) = username else {
            debug!(index, "dropping dataset item without username");
            continue;
        };

        comments.push(RawComment {
            username: Some(username.to_string()),
            text: Some(item["text"].as_str().unwrap_or("").to_string()),
            timestamp: parse_timestamp(&item["timestamp"]),
            id: Some(parse_id(&item["id"]).unwrap_or_else(|| index.to_string())),
        });
    }

    Ok(comments)
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

fn parse_timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Timestamp::Millis)
            .or_else(|| n.as_f64().map(Timestamp::Float)),
        Value::String(s) if !s.is_empty() => Some(Timestamp::Text(s.clone())),
        _ => None,
    }
}

fn parse_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
