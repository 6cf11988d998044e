//! Session store - per-user game state shared by all request handlers.
//!
//! # Concurrency
//!
//! Sessions live in a `DashMap` keyed by user ID. Every mutation runs while
//! holding that key's entry lock, so two concurrent `advance` calls for the
//! same user are serialized: the second one observes the state left by the
//! first and can never consume the same question twice.
//!
//! # Lifetime
//!
//! A session leaves the store when its user starts a new game, abandons it,
//! or stops playing for longer than the idle limit. Finished sessions stay
//! until then so a retried final answer still receives the statistics.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry};

use crate::{
    error::AppError,
    models::{
        game::AnswerSubmission,
        session::{GameSession, NextStep, SessionSnapshot},
    },
};

/// Capability interface for game session storage.
pub trait SessionStore: Send + Sync {
    /// Store a new session, replacing any session the user already had.
    ///
    /// Returns the snapshot of the replaced session, if any.
    fn start(&self, session: GameSession) -> Option<SessionSnapshot>;

    /// Read-only view of the user's active session. Finished games are not active.
    fn lookup(&self, user_id: &str) -> Option<SessionSnapshot>;

    /// Move the user's game forward by one interaction.
    ///
    /// Once every question is answered the statistics are returned, and
    /// returned again for any later call until the session is dropped.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound`: The user has no active game
    fn advance(
        &self,
        user_id: &str,
        answer: Option<&AnswerSubmission>,
    ) -> Result<NextStep, AppError>;

    /// Drop the user's session.
    ///
    /// Returns the snapshot of the dropped game if it was still active.
    fn abandon(&self, user_id: &str) -> Option<SessionSnapshot>;

    /// Drop every session with no activity since `cutoff`.
    ///
    /// Returns the number of sessions dropped.
    fn expire_idle(&self, cutoff: DateTime<Utc>) -> usize;
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, GameSession>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn start(&self, session: GameSession) -> Option<SessionSnapshot> {
        self.sessions
            .insert(session.user_id.clone(), session)
            .map(|replaced| replaced.snapshot())
    }

    fn lookup(&self, user_id: &str) -> Option<SessionSnapshot> {
        self.sessions
            .get(user_id)
            .filter(|session| !session.is_finished())
            .map(|session| session.snapshot())
    }

    fn advance(
        &self,
        user_id: &str,
        answer: Option<&AnswerSubmission>,
    ) -> Result<NextStep, AppError> {
        let Entry::Occupied(mut entry) = self.sessions.entry(user_id.to_string()) else {
            return Err(AppError::SessionNotFound);
        };

        let was_finished = entry.get().is_finished();
        let step = entry.get_mut().advance(answer);

        if !was_finished && entry.get().is_finished() {
            tracing::info!(user_id, "game finished");
        }

        Ok(step)
    }

    fn abandon(&self, user_id: &str) -> Option<SessionSnapshot> {
        self.sessions
            .remove(user_id)
            .map(|(_, session)| session)
            .filter(|session| !session.is_finished())
            .map(|session| session.snapshot())
    }

    fn expire_idle(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.last_activity >= cutoff);
        before.saturating_sub(self.sessions.len())
    }
}

/// Periodically drop sessions idle for longer than `max_idle`.
///
/// Runs until the task is aborted; the server spawns it once at startup.
pub async fn sweep_idle_sessions(
    store: Arc<dyn SessionStore>,
    max_idle: chrono::Duration,
    every: Duration,
) {
    let mut ticker = tokio::time::interval(every);

    loop {
        ticker.tick().await;

        let expired = store.expire_idle(Utc::now() - max_idle);
        if expired > 0 {
            tracing::info!(expired, "idle sessions dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Question;

    fn session(user_id: &str, message_id: &str, count: usize) -> GameSession {
        let questions = (1..=count)
            .map(|n| {
                Arc::new(Question {
                    question: format!("Question {n}"),
                    wrong_answer1: "a".to_string(),
                    wrong_answer2: "b".to_string(),
                    wrong_answer3: "c".to_string(),
                    right_answer: "d".to_string(),
                    image: None,
                })
            })
            .collect();
        GameSession::new(user_id.to_string(), message_id.to_string(), questions)
    }

    fn answer(question: usize) -> AnswerSubmission {
        AnswerSubmission {
            question,
            text: "d".to_string(),
        }
    }

    #[test]
    fn advance_without_session_fails() {
        let store = InMemorySessionStore::new();

        assert!(matches!(
            store.advance("nobody", None),
            Err(AppError::SessionNotFound)
        ));
    }

    #[test]
    fn second_start_supersedes_first() {
        let store = InMemorySessionStore::new();

        assert!(store.start(session("u1", "m1", 3)).is_none());
        let replaced = store.start(session("u1", "m2", 5)).unwrap();

        assert_eq!(replaced.message_id, "m1");
        let active = store.lookup("u1").unwrap();
        assert_eq!(active.message_id, "m2");
        assert_eq!(active.total, 5);
        assert_eq!(store.sessions.len(), 1);
    }

    #[test]
    fn finished_game_is_inactive_but_repeats_statistics() {
        let store = InMemorySessionStore::new();
        store.start(session("u1", "m1", 1));

        assert!(matches!(store.advance("u1", None), Ok(NextStep::Question(_))));
        let step = store.advance("u1", Some(&answer(1))).unwrap();

        let NextStep::Statistics(stats) = step else {
            panic!("expected statistics");
        };
        assert_eq!(stats.score, 1);
        assert!(store.lookup("u1").is_none());

        let Ok(NextStep::Statistics(again)) = store.advance("u1", Some(&answer(1))) else {
            panic!("expected repeated statistics");
        };
        assert_eq!(again.score, 1);
        assert_eq!(again.results.len(), 1);
    }

    #[test]
    fn abandoned_game_is_gone() {
        let store = InMemorySessionStore::new();
        store.start(session("u1", "m1", 3));
        store.advance("u1", None).unwrap();

        let abandoned = store.abandon("u1").unwrap();

        assert_eq!(abandoned.message_id, "m1");
        assert!(store.lookup("u1").is_none());
        assert!(store.abandon("u1").is_none());
        assert!(matches!(
            store.advance("u1", None),
            Err(AppError::SessionNotFound)
        ));
    }

    #[test]
    fn abandoning_finished_game_reports_nothing_active() {
        let store = InMemorySessionStore::new();
        store.start(session("u1", "m1", 1));
        store.advance("u1", None).unwrap();
        store.advance("u1", Some(&answer(1))).unwrap();

        assert!(store.abandon("u1").is_none());
        assert!(store.sessions.is_empty());
    }

    #[test]
    fn idle_sessions_expire() {
        let store = InMemorySessionStore::new();
        store.start(session("u1", "m1", 2));
        store.start(session("u2", "m2", 2));

        assert_eq!(store.expire_idle(Utc::now() - chrono::Duration::hours(1)), 0);
        assert!(store.lookup("u1").is_some());

        let expired = store.expire_idle(Utc::now() + chrono::Duration::seconds(1));

        assert_eq!(expired, 2);
        assert!(store.lookup("u1").is_none());
        assert!(store.lookup("u2").is_none());
        assert!(matches!(
            store.advance("u1", None),
            Err(AppError::SessionNotFound)
        ));
    }

    #[test]
    fn sessions_are_isolated_per_user() {
        let store = InMemorySessionStore::new();
        store.start(session("u1", "m1", 2));
        store.start(session("u2", "m2", 2));

        store.advance("u1", None).unwrap();
        store.advance("u1", Some(&answer(1))).unwrap();

        assert_eq!(store.lookup("u1").unwrap().answered, 1);
        assert_eq!(store.lookup("u2").unwrap().answered, 0);
    }

    #[tokio::test]
    async fn sweeper_drops_idle_sessions() {
        let store = Arc::new(InMemorySessionStore::new());
        store.start(session("u1", "m1", 2));

        // Negative idle limit: everything counts as idle
        let sweeper = tokio::spawn(sweep_idle_sessions(
            store.clone(),
            chrono::Duration::seconds(-1),
            Duration::from_millis(10),
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        sweeper.abort();

        assert!(store.lookup("u1").is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_answers_grade_once() {
        let store = Arc::new(InMemorySessionStore::new());
        store.start(session("u1", "m1", 5));
        store.advance("u1", None).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.advance("u1", Some(&answer(1))).unwrap() })
            })
            .collect();

        for handle in handles {
            let NextStep::Question(payload) = handle.await.unwrap() else {
                panic!("expected question");
            };
            assert_eq!(payload.number, 2);
        }

        let snapshot = store.lookup("u1").unwrap();
        assert_eq!(snapshot.answered, 1);
        assert_eq!(snapshot.outstanding, Some(2));
    }
}
