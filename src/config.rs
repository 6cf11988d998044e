//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 6969
/// - `CREDENTIALS_PATH` (optional): Basic auth credentials file, defaults to `creds.json`
/// - `QUESTIONS_PATH` (optional): question bank file, defaults to `questions.json`
/// - `CLIENT_USER_AGENT` (optional): required `User-Agent` value, defaults to `TheoryBot`
/// - `MAX_BODY_BYTES` (optional): request body limit, defaults to 16384
/// - `SESSION_IDLE_SECS` (optional): idle time before a game is dropped, defaults to 3600
/// - `SESSION_SWEEP_SECS` (optional): interval between idle sweeps, defaults to 60
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,

    #[serde(default = "default_questions_path")]
    pub questions_path: String,

    #[serde(default = "default_client_user_agent")]
    pub client_user_agent: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u32,

    #[serde(default = "default_session_sweep_secs")]
    pub session_sweep_secs: u64,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    6969
}

fn default_credentials_path() -> String {
    "creds.json".to_string()
}

fn default_questions_path() -> String {
    "questions.json".to_string()
}

/// The bot client identifies itself with this exact value.
fn default_client_user_agent() -> String {
    "TheoryBot".to_string()
}

fn default_max_body_bytes() -> usize {
    16 * 1024
}

fn default_session_idle_secs() -> u32 {
    3600
}

fn default_session_sweep_secs() -> u64 {
    60
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed
    /// into the expected type (e.g. a non-numeric `SERVER_PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: server_port -> SERVER_PORT
        envy::from_env::<Config>()
    }
}
