//! Error types returned by the Netatmo client.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Failure reported by the Netatmo HTTP API itself.
///
/// Rendered as `"<code> <message>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Wire envelope of an API failure: `{"error": {"code": .., "message": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

/// Token endpoint failure as produced by the `oauth2` crate.
pub type TokenError =
    oauth2::basic::BasicRequestTokenError<oauth2::HttpClientError<reqwest::Error>>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("request to the Netatmo API failed")]
    Transport(#[from] reqwest::Error),

    #[error("could not obtain an access token")]
    Token(#[source] Box<TokenError>),

    #[error("could not decode the Netatmo API response")]
    Json(#[from] serde_json::Error),

    #[error("Netatmo API error: {0}")]
    Api(#[from] ApiError),

    #[error("request did not complete within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("invalid URL")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// The API error, when the server answered with a failure status.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Error::DeadlineExceeded(_))
    }
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        Error::Token(Box::new(err))
    }
}
