//! Request validation middleware.
//!
//! Checks that a request targets the path its handler is bound to and comes
//! from the expected bot client. This runs before the handler, so a rejected
//! request never has its body read.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;

/// Path and client identity a route expects.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    path: &'static str,
    user_agent: Arc<str>,
}

impl RequestValidator {
    pub fn new(path: &'static str, user_agent: impl Into<Arc<str>>) -> Self {
        Self {
            path,
            user_agent: user_agent.into(),
        }
    }

    /// # Errors
    ///
    /// - `NotFound`: The path differs from the bound path
    /// - `InvalidClient`: `User-Agent` is missing or differs from the expected value
    pub fn validate(&self, parts: &Parts) -> Result<(), AppError> {
        if parts.uri.path() != self.path {
            return Err(AppError::NotFound);
        }

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok());

        if user_agent != Some(&*self.user_agent) {
            tracing::warn!(?user_agent, expected = %self.user_agent, "unexpected client");
            return Err(AppError::InvalidClient);
        }

        Ok(())
    }
}

/// Validation middleware function.
///
/// Only the request head is inspected; the body is passed on untouched.
pub async fn validate_request(
    State(validator): State<RequestValidator>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    validator.validate(&parts)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
