use thiserror::Error;

/// Every failure the picker can report to its caller.
///
/// Fetch-side variants are raised before the normalizer runs; the core
/// itself never fails, it only produces empty rosters or empty draws.
#[derive(Debug, Error)]
pub enum PickerError {
    /// Winner count was zero, negative or not a number
    #[error("Invalid winner count '{0}': pick at least 1 winner")]
    InvalidCount(String),

    /// Post URL does not point at Instagram
    #[error("Not an Instagram post URL: '{0}'")]
    InvalidPostUrl(String),

    /// No Apify token in CLI args, config file or APIFY_API_TOKEN
    #[error("Apify API token not set (use --apify-token, the config file or APIFY_API_TOKEN)")]
    MissingApiToken,

    /// HTTP client could not be constructed (TLS backend, bad settings)
    #[error("Could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Request never produced a response (connect, timeout, TLS)
    #[error("Fetch failed after {attempts} attempt(s): {source}")]
    FetchTransport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// Scraper answered with a non-success status
    #[error("Apify returned {status}: {body}")]
    FetchStatus { status: u16, body: String },

    /// Scraper answered 2xx with something that is not a dataset array
    #[error("Unexpected scraper response: {0}")]
    ResponseFormat(String),

    /// Export format other than text or json
    #[error("Unknown export format '{0}': use text or json")]
    InvalidFormat(String),

    /// Source delivered zero comments
    #[error("No comments found on this post")]
    NoComments,

    /// Comments were delivered but none had a usable username
    #[error("No valid participants found")]
    NoParticipants,

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PickerError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        PickerError::Io { path: path.into(), source }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        PickerError::Json { context: context.into(), source }
    }

    /// True for failures of the external fetch collaborator, as opposed to
    /// user-input or empty-result conditions.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            PickerError::FetchTransport { .. }
                | PickerError::FetchStatus { .. }
                | PickerError::ResponseFormat(_)
        )
    }
}
