use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::comment::normalize::EmptyKeyPolicy;
use crate::draw::session::parse_winner_count;
use crate::error::PickerError;
use crate::fetch::apify::{ApifySettings, DEFAULT_ACTOR, DEFAULT_BASE_URL};
use crate::trace::logger::DEFAULT_TRACE_PATH;

pub const DEFAULT_CONFIG_PATH: &str = "comment-picker.yaml";
pub const TOKEN_ENV_VAR: &str = "APIFY_API_TOKEN";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "comment-picker",
    version,
    about = "Fair giveaway winner picker for Instagram comments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: comment-picker.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Audit trail file (JSONL)
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Apify API token (overrides config file and APIFY_API_TOKEN)
    #[arg(long, global = true)]
    pub apify_token: Option<String>,
}

/// Where the comments come from. Exactly one must be given.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Text file of pasted comments, one `username: comment` per line (`-` for stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// JSON file of raw comments (as written by `fetch`)
    #[arg(long)]
    pub comments: Option<String>,

    /// Instagram post URL, fetched through Apify
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deduplicate comments and show the participant list
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// How usernames that are empty after cleanup are counted: drop or duplicate
        #[arg(long)]
        empty_keys: Option<EmptyKeyPolicy>,
    },

    /// Deduplicate comments and draw winners
    Pick {
        #[command(flatten)]
        source: SourceArgs,

        /// Number of winners to draw
        #[arg(short = 'n', long, value_parser = parse_winner_count)]
        count: Option<usize>,

        /// Extra independent draws on the same participants ("pick again")
        #[arg(long, default_value_t = 0)]
        redraws: u32,

        /// Export the final draw; without a value a dated file name is used
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        export: Option<String>,

        /// Export format: text or json
        #[arg(long, value_parser = ["text", "json"])]
        format: Option<String>,

        /// How usernames that are empty after cleanup are counted: drop or duplicate
        #[arg(long)]
        empty_keys: Option<EmptyKeyPolicy>,
    },

    /// Fetch raw comments for a post and save them as JSON
    Fetch {
        /// Instagram post URL
        #[arg(long)]
        url: String,

        /// Output JSON file
        #[arg(short, long, default_value = "comments.json")]
        output: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `comment-picker.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub apify: ApifyConfig,
    #[serde(default)]
    pub pick: PickConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApifyConfig {
    pub token: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_actor")]
    pub actor: String,

    #[serde(default = "default_results_limit")]
    pub results_limit: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for ApifyConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_base_url(),
            actor: default_actor(),
            results_limit: default_results_limit(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickConfig {
    #[serde(default = "default_count")]
    pub count: usize,

    #[serde(default)]
    pub empty_keys: EmptyKeyPolicy,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            empty_keys: EmptyKeyPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_format")]
    pub format: String,

    pub output: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_trace_path")]
    pub path: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_trace_path(),
        }
    }
}

// Serde default helpers
fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_actor() -> String { DEFAULT_ACTOR.to_string() }
fn default_results_limit() -> u32 { 999_999 }
fn default_timeout_secs() -> u64 { 300 }
fn default_max_retries() -> u32 { 2 }
fn default_backoff_ms() -> u64 { 1_000 }
fn default_count() -> usize { 1 }
fn default_format() -> String { "text".to_string() }
fn default_true() -> bool { true }
fn default_trace_path() -> String { DEFAULT_TRACE_PATH.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, serde_yaml::Error> {
    // An empty file deserializes to null, which is not a mapping.
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(content)
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Token precedence: CLI > config file > environment.
pub fn resolve_token(
    cli_token: Option<&str>,
    config_token: Option<&str>,
    env_token: Option<&str>,
) -> Result<String, PickerError> {
    [cli_token, config_token, env_token]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(PickerError::MissingApiToken)
}

/// Build client settings from the config file plus an optional CLI token.
pub fn build_apify_settings(
    config: &ApifyConfig,
    cli_token: Option<&str>,
) -> Result<ApifySettings, PickerError> {
    let env_token = std::env::var(TOKEN_ENV_VAR).ok();
    let token = resolve_token(cli_token, config.token.as_deref(), env_token.as_deref())?;

    Ok(ApifySettings {
        token,
        base_url: config.base_url.clone(),
        actor: config.actor.clone(),
        results_limit: config.results_limit,
        timeout: Duration::from_secs(config.timeout_secs),
        max_retries: config.max_retries,
        backoff: Duration::from_millis(config.backoff_ms),
    })
}
