use thiserror::Error;

/// Transport and protocol failures shared by every endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("unexpected http status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("missing Location header")]
    MissingLocation,
}

/// Image upload verdicts with their own user-facing meaning.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file not accepted for upload")]
    InvalidFile,
    #[error("not logged in")]
    Unauthenticated,
    #[error("too many uploads, slow down")]
    RateLimited,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Failures while obtaining an identity-provider authorization URL.
#[derive(Debug, Error)]
pub enum LoginUrlError {
    #[error("login provider not supported")]
    UnsupportedProvider,
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}
