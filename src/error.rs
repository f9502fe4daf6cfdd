use thiserror::Error;

/// problems with the run configuration, these end the run
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TARGETS_ENCRYPTED is missing or empty")]
    MissingTargets,

    #[error("target list is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("target list is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("target list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vocabulary: {0}")]
    Vocabulary(String),

    #[error("lookup providers: {0}")]
    Provider(String),

    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// why a run ended early, `main` turns either into exit code 1
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("writing results failed: {0}")]
    Write(#[from] std::io::Error),
}

/// a single request that went wrong, never fatal
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status { status: u16, url: String },

    #[error("{provider}: unexpected response ({reason})")]
    Parse { provider: String, reason: String },
}

impl FetchError {
    pub fn parse(provider: &str, reason: impl ToString) -> Self {
        FetchError::Parse {
            provider: provider.to_string(),
            reason: reason.to_string(),
        }
    }
}
