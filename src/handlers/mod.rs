//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Checks the HTTP method before reading anything else
//! 2. Decodes the JSON body and validates it into a typed request
//! 3. Drives the session store and returns the response (text or JSON)

/// Unbound paths
pub mod fallback;
/// Start-game and next-question endpoints
pub mod game;
