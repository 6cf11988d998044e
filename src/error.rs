//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into plain-text HTTP responses with appropriate status codes.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

/// Message sent back when any of the required start fields is missing or mistyped.
pub const MISSING_FIELDS_MESSAGE: &str =
    "Please specify UserID(string), MessageID(string) and QuestionCount(int) in the JSON!";

/// Application-wide error type.
///
/// Every failure a request can run into is one of these variants. Each variant
/// carries its own HTTP status (see the `IntoResponse` implementation), so adding
/// a variant without deciding its status is a compile error.
///
/// # Error Categories
///
/// - **Authentication Errors**: Missing or wrong Basic credentials
/// - **Routing Errors**: Wrong path or wrong client identity marker
/// - **Payload Errors**: Body too large, not a JSON object, or missing fields
/// - **Game Errors**: No active session, empty question bank
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Basic credentials are missing, malformed, or do not match.
    ///
    /// Returns HTTP 401 Unauthorized with `WWW-Authenticate: Basic`.
    #[error("Unauthorized, invalid credentials")]
    Unauthorized,

    /// Request path is not the path the handler is bound to.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("404 Page Not Found.")]
    NotFound,

    /// The `User-Agent` header is not the expected bot identity.
    ///
    /// Returns HTTP 500, which is what the bot client expects for this case.
    #[error("Invalid User Agent!")]
    InvalidClient,

    /// Body is not valid JSON, or is valid JSON but not an object.
    ///
    /// Returns HTTP 500.
    #[error("Error While Decoding JSON! Did You Send It Wrong?")]
    PayloadDecode,

    /// Body exceeded the configured size limit.
    ///
    /// Returns HTTP 413 Payload Too Large.
    #[error("Request body too large!")]
    PayloadTooLarge,

    /// Decoded payload is missing fields or holds out-of-range values.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// HTTP method is not accepted by the endpoint.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Method no support!")]
    MethodNotAllowed,

    /// The user has no game in progress.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("No active game for this user!")]
    SessionNotFound,

    /// There are no questions to build a game from.
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("No questions available!")]
    QuestionBankEmpty,
}

impl AppError {
    /// HTTP status code for this error.
    ///
    /// # Status Code Mapping
    ///
    /// - `Unauthorized` → 401
    /// - `NotFound`, `SessionNotFound` → 404
    /// - `InvalidRequest`, `MethodNotAllowed` → 400
    /// - `PayloadTooLarge` → 413
    /// - `InvalidClient`, `PayloadDecode` → 500
    /// - `QuestionBankEmpty` → 503
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound | AppError::SessionNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) | AppError::MethodNotAllowed => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidClient | AppError::PayloadDecode => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::QuestionBankEmpty => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers and middleware to return
/// `Result<T, AppError>` and have errors automatically converted to proper
/// HTTP responses.
///
/// # Response Format
///
/// The body is the error message followed by a newline, sent as
/// `text/plain`. Every error is logged before it leaves the server.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        tracing::warn!(status = status.as_u16(), "{}", message);

        let mut response = (status, format!("{message}\n")).into_response();

        if matches!(self, AppError::Unauthorized) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
        }

        response
    }
}
