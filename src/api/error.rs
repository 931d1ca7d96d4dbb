//! Backend API client errors.

use thiserror::Error;

use crate::session::SessionError;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed, e.g. the host was unreachable or the
    /// request timed out.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success HTTP status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code of the response.
        status: u16,

        /// Message from the response body, or the status reason phrase.
        message: String,
    },

    /// The backend answered 2xx but marked the request as unsuccessful.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The backend answered 401. The stored session has been cleared and
    /// the user must log in again.
    #[error("not authenticated, please log in")]
    Unauthorized,

    /// The response body did not decode as the expected payload.
    #[error("malformed response body")]
    Decode(#[from] serde_json::Error),

    /// The session file could not be read or written.
    #[error("session error")]
    Session(#[from] SessionError),
}
