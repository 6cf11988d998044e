//! Trivia Game Server - Main Application Entry Point
//!
//! This is the HTTP backend of a quiz bot. The bot starts games for its users
//! and fetches their questions one at a time; the server keeps each user's game
//! state and hands out final statistics when a game ends.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Authentication**: HTTP Basic, verified in constant time
//! - **Client check**: Fixed `User-Agent` value of the bot
//! - **State**: In-memory, per-user sessions behind per-key locks
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Load credentials (fatal if missing or malformed)
//! 3. Load the question bank
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod credentials;
mod error;
mod handlers;
mod middleware;
mod models;
mod payload;
mod router;
mod services;
mod state;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::{
    credentials::{CredentialStore, Credentials},
    services::{
        question_bank::QuestionBank,
        session_store::{InMemorySessionStore, SessionStore, sweep_idle_sessions},
    },
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env().context("invalid configuration")?;
    tracing::info!("Configuration loaded");

    let credentials = Credentials::load(&config.credentials_path)
        .context("error while opening the credentials file, does it exist?")?;
    let credentials = CredentialStore::new(credentials)?;
    tracing::info!(path = %config.credentials_path, "Credentials loaded");

    let questions = QuestionBank::load(&config.questions_path)?;
    if questions.is_empty() {
        tracing::warn!(path = %config.questions_path, "Question bank is empty, games cannot be started");
    } else {
        tracing::info!(path = %config.questions_path, count = questions.len(), "Question bank loaded");
    }

    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    // Abandoned games are dropped once idle
    tokio::spawn(sweep_idle_sessions(
        sessions.clone(),
        chrono::Duration::seconds(i64::from(config.session_idle_secs)),
        Duration::from_secs(config.session_sweep_secs.max(1)),
    ));

    let state = AppState {
        credentials: Arc::new(credentials),
        sessions,
        questions: Arc::new(questions),
        client_user_agent: Arc::from(config.client_user_agent.as_str()),
        max_body_bytes: config.max_body_bytes,
    };

    let app = router::build_router(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot listen on {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    // Each connection is served on its own tokio task
    axum::serve(listener, app).await?;

    Ok(())
}
