use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::RequestFailed(e.to_string())
        }
    }
}

/// Why a page yielded no caption. Always absorbed into a placeholder.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Page returned HTTP {0}")]
    Status(u16),

    #[error("No usable text found in page")]
    NoContent,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No JSON object found in model output")]
    NoJsonObject,

    #[error("Invalid JSON in model output: {0}")]
    InvalidJson(String),
}

/// Any reason a remote provider did not produce a classification.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: HttpError,
    },

    #[error("{provider} rate limit or quota exceeded: {message}")]
    RateLimited {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} rejected credentials (HTTP {status})")]
    Unauthorized { provider: &'static str, status: u16 },

    #[error("{provider} returned error: {status} - {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider} returned an unexpected response: {detail}")]
    UnexpectedSchema {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} has no available model after {attempts} attempts")]
    NoModelAvailable {
        provider: &'static str,
        attempts: usize,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ProviderError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }

    /// Map a non-success status to the matching variant.
    pub(crate) fn from_status(provider: &'static str, status: u16, body: &str) -> Self {
        let message: String = crate::models::take_chars(body, 200).to_string();
        match status {
            429 => ProviderError::RateLimited { provider, message },
            401 | 403 => ProviderError::Unauthorized { provider, status },
            _ => ProviderError::Api {
                provider,
                status,
                message,
            },
        }
    }
}
