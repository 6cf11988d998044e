//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::{
    credentials::CredentialStore,
    services::{question_bank::QuestionBank, session_store::SessionStore},
};

#[derive(Clone)]
pub struct AppState {
    /// Configured Basic auth credentials (read-only)
    pub credentials: Arc<CredentialStore>,

    /// Active games keyed by user ID
    pub sessions: Arc<dyn SessionStore>,

    /// Questions new games are drawn from (read-only)
    pub questions: Arc<QuestionBank>,

    /// Required `User-Agent` value of the bot client
    pub client_user_agent: Arc<str>,

    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,
}
