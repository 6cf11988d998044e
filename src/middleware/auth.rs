//! HTTP Basic authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the credentials from the `Authorization: Basic` header
//! 2. Verify them against the configured credential store
//! 3. Reject unauthorized requests with HTTP 401 and a `WWW-Authenticate` challenge

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{credentials::CredentialStore, error::AppError};

/// Why a request failed authentication. Only ever logged; the client sees a plain 401.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("Authorization header is not a Basic credential")]
    NotBasic,

    #[error("Basic credential is not valid base64")]
    InvalidEncoding,

    #[error("Basic credential is not UTF-8")]
    InvalidUtf8,

    #[error("Basic credential has no ':' separator")]
    MissingSeparator,

    #[error("credentials do not match")]
    Mismatch,
}

/// Extract the username and password from an `Authorization: Basic` header.
///
/// The scheme name is matched case-insensitively and the pair is split on the
/// first `:`, so passwords may themselves contain colons.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingHeader)?
        .to_str()
        .map_err(|_| AuthFailure::NotBasic)?;

    let (scheme, encoded) = value.split_once(' ').ok_or(AuthFailure::NotBasic)?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return Err(AuthFailure::NotBasic);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthFailure::InvalidEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthFailure::InvalidUtf8)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthFailure::MissingSeparator)?;

    Ok((username.to_string(), password.to_string()))
}

/// Basic authentication middleware function.
///
/// # Flow
///
/// 1. Decode `Authorization: Basic <base64(username:password)>`
/// 2. Verify the pair with the constant-time credential store
/// 3. If valid: call next handler unchanged
/// 4. If not: log the reason and return 401 Unauthorized
///
/// # Arguments
///
/// * `State(credentials)` - Credential store injected by Axum
/// * `request` - Incoming HTTP request
/// * `next` - Next middleware/handler in the chain
pub async fn basic_auth(
    State(credentials): State<Arc<CredentialStore>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let outcome = basic_credentials(request.headers()).and_then(|(username, password)| {
        if credentials.verify(&username, &password) {
            Ok(username)
        } else {
            Err(AuthFailure::Mismatch)
        }
    });

    match outcome {
        Ok(username) => {
            tracing::debug!(%username, path = %request.uri().path(), "request authenticated");
            Ok(next.run(request).await)
        }
        Err(reason) => {
            tracing::warn!(%reason, path = %request.uri().path(), "authentication failed");
            Err(AppError::Unauthorized)
        }
    }
}
