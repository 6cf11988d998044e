//! Question bank - the pool games draw their questions from.
//!
//! The bank is loaded once at startup from a JSON array of questions and is
//! read-only afterwards, so handlers share it without locking.

use std::{io, path::Path, sync::Arc};

use rand::seq::SliceRandom;

use crate::models::question::Question;

/// Errors that can occur while loading the question bank.
#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("cannot read question bank {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("malformed question bank {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default)]
pub struct QuestionBank {
    questions: Vec<Arc<Question>>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into_iter().map(Arc::new).collect(),
        }
    }

    /// Load the bank from a JSON file.
    ///
    /// A missing file yields an empty bank (games cannot be started until
    /// questions are provided). Any other read error, or content that is
    /// not an array of questions, is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuestionBankError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "question bank not found, starting with no questions");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(QuestionBankError::Read {
                    path: display,
                    source,
                });
            }
        };

        let questions: Vec<Question> =
            serde_json::from_str(&raw).map_err(|source| QuestionBankError::Parse {
                path: display,
                source,
            })?;

        Ok(Self::new(questions))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Draw `count` questions at random.
    ///
    /// No question repeats until every question in the bank has been used;
    /// larger games continue with fresh shuffles of the whole bank.
    /// Returns an empty list when the bank is empty.
    pub fn draw(&self, count: usize) -> Vec<Arc<Question>> {
        if self.questions.is_empty() {
            return Vec::new();
        }

        let mut rng = rand::rng();
        let mut drawn = Vec::with_capacity(count);

        while drawn.len() < count {
            let mut round = self.questions.clone();
            round.shuffle(&mut rng);
            round.truncate(count - drawn.len());
            drawn.extend(round);
        }

        drawn
    }
}
