//! Per-user game session state.
//!
//! This module defines:
//! - `GameSession`: A game in progress and the state machine that drives it
//! - `NextStep`: What `/getNext` answers with (a question or the final statistics)
//! - `SessionSnapshot`: Read-only view of a session

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    game::AnswerSubmission,
    question::{Question, QuestionPayload},
};

/// A game in progress for one user.
///
/// # Lifecycle
///
/// Created by a valid start request with its questions already drawn. Each
/// `advance` call either re-serves the outstanding question, grades an answer
/// and serves the next one, or reports the final statistics once every
/// question has been answered. A finished session keeps answering with its
/// statistics, so a retried final answer still gets them; the store stops
/// reporting it as active and drops it when it goes idle or is replaced.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub user_id: String,
    pub message_id: String,
    questions: Vec<Arc<Question>>,

    /// Number of questions answered so far
    index: usize,

    /// Whether the question at `index` has been served and awaits an answer
    outstanding: bool,

    results: Vec<QuestionResult>,
    pub started_at: DateTime<Utc>,

    /// Time of the last `advance` call (or of creation)
    pub last_activity: DateTime<Utc>,
}

impl GameSession {
    pub fn new(user_id: String, message_id: String, questions: Vec<Arc<Question>>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            message_id,
            questions,
            index: 0,
            outstanding: false,
            results: Vec::new(),
            started_at: now,
            last_activity: now,
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.results.iter().filter(|result| result.correct).count()
    }

    /// Move the game forward by one interaction.
    ///
    /// An answer is only graded when a question is outstanding and the
    /// answer's question number is that question's number. Any other request
    /// re-serves the outstanding question (or, once finished, the statistics),
    /// so a retried or duplicated request never skips or double-grades a question.
    pub fn advance(&mut self, answer: Option<&AnswerSubmission>) -> NextStep {
        self.last_activity = Utc::now();

        if self.outstanding {
            let expected = self.index + 1;
            let answer = answer.filter(|answer| answer.question == expected);

            if let (Some(answer), Some(question)) = (answer, self.questions.get(self.index)) {
                self.results.push(QuestionResult {
                    number: expected,
                    question: question.question.clone(),
                    given: answer.text.clone(),
                    right_answer: question.right_answer.clone(),
                    correct: question.is_right(&answer.text),
                });
                self.index += 1;
                self.outstanding = false;
            }
        }

        match self.questions.get(self.index) {
            Some(question) => {
                self.outstanding = true;
                NextStep::Question(QuestionPayload::new(question, self.index + 1, self.total()))
            }
            None => NextStep::Statistics(self.statistics()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.total()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            user_id: self.user_id.clone(),
            message_id: self.message_id.clone(),
            score: self.score(),
            total: self.total(),
            started_at: self.started_at,
            results: self.results.clone(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user_id: self.user_id.clone(),
            message_id: self.message_id.clone(),
            total: self.total(),
            answered: self.index,
            score: self.score(),
            outstanding: self.outstanding.then_some(self.index + 1),
            started_at: self.started_at,
        }
    }
}

/// Outcome of a single answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestionResult {
    pub number: usize,
    pub question: String,
    pub given: String,
    pub right_answer: String,
    pub correct: bool,
}

/// Final statistics returned when a game ends.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statistics {
    #[serde(rename = "UserID")]
    pub user_id: String,

    #[serde(rename = "MessageID")]
    pub message_id: String,

    pub score: usize,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub results: Vec<QuestionResult>,
}

/// Response of `/getNext`.
///
/// # JSON Example
///
/// ```json
/// { "Kind": "Question", "Number": 1, "Total": 5, "Question": "...", "Answers": ["..."], "RightAnswer": "...", "Image": null }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "Kind")]
pub enum NextStep {
    Question(QuestionPayload),
    Statistics(Statistics),
}

/// Read-only view of a session, safe to hand out while the store keeps the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub user_id: String,
    pub message_id: String,
    pub total: usize,
    pub answered: usize,
    pub score: usize,

    /// Number of the question served but not yet answered
    pub outstanding: Option<usize>,

    pub started_at: DateTime<Utc>,
}
