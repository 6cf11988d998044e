//! Trivia question models.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A question as stored in the question bank file.
///
/// # JSON Example
///
/// ```json
/// {
///   "Question": "What is the capital of France?",
///   "WrongAnswer1": "Berlin",
///   "WrongAnswer2": "Madrid",
///   "WrongAnswer3": "Rome",
///   "RightAnswer": "Paris",
///   "Image": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Question {
    pub question: String,
    pub wrong_answer1: String,
    pub wrong_answer2: String,
    pub wrong_answer3: String,
    pub right_answer: String,

    /// Optional image reference (URL or bot-side asset name)
    #[serde(default)]
    pub image: Option<String>,
}

impl Question {
    /// Whether `given` is the right answer, ignoring surrounding whitespace and ASCII case.
    pub fn is_right(&self, given: &str) -> bool {
        self.right_answer.trim().eq_ignore_ascii_case(given.trim())
    }

    /// All four options in random order.
    pub fn shuffled_answers(&self) -> Vec<String> {
        let mut answers = vec![
            self.right_answer.clone(),
            self.wrong_answer1.clone(),
            self.wrong_answer2.clone(),
            self.wrong_answer3.clone(),
        ];
        answers.shuffle(&mut rand::rng());
        answers
    }
}

/// A question as served to the bot by `/getNext`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestionPayload {
    /// 1-based position of this question in the game
    pub number: usize,

    /// Number of questions in the game
    pub total: usize,

    pub question: String,

    /// Right answer and the three wrong ones, shuffled
    pub answers: Vec<String>,

    pub right_answer: String,

    pub image: Option<String>,
}

impl QuestionPayload {
    pub fn new(question: &Question, number: usize, total: usize) -> Self {
        Self {
            number,
            total,
            question: question.question.clone(),
            answers: question.shuffled_answers(),
            right_answer: question.right_answer.clone(),
            image: question.image.clone(),
        }
    }
}
