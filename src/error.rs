use thiserror::Error;

/// Failures of a single `process_message` call, surfaced to the host as
/// distinguishable values so it can pick status codes and log levels.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("message cannot be empty")]
    EmptyInput,

    /// The provider rejected the request, either with a non-2xx status or
    /// with an explicit `error` object in the body.
    #[error("provider error (status {status:?}): {message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },

    /// HTTP succeeded but the body matched neither known success shape.
    #[error("unexpected response format from completion API: {body}")]
    MalformedResponse {
        body: String,
    },

    /// Network-level failure: timeout, DNS, connection refused.
    #[error("completion API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Anything outside the four named kinds. Never escapes the agent:
    /// `process_message` collapses it into the fixed fallback reply.
    #[error("internal agent error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::Internal(err.to_string())
    }
}

/// Construction-time configuration failures. Fatal before the server
/// starts, never part of a per-request error path.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("LLAMA_API_KEY or META_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("--extra-params must be a JSON object: {0}")]
    InvalidExtraParams(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
