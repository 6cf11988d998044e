//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Reject requests from unexpected clients
//! - Short-circuit requests before the body is read

/// HTTP Basic authentication middleware
pub mod auth;
/// Path and client identity validation
pub mod validator;
