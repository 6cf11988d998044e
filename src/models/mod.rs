//! Data models for the game.
//!
//! This module contains the typed requests, questions and session state.

/// Validated start/next requests
pub mod game;
/// Trivia questions
pub mod question;
/// Per-user game sessions
pub mod session;
