//! Business logic services.
//!
//! Services hold the shared game state and the rules that mutate it,
//! separated from the HTTP handlers.

pub mod question_bank;
pub mod session_store;
