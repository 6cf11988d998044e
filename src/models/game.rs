//! Typed game requests built from decoded JSON payloads.
//!
//! This module defines:
//! - `StartGameRequest`: Validated body of `POST /startGame`
//! - `NextRequest`: Validated body of `/getNext`
//!
//! Both are constructed from a `JsonObject` with `TryFrom`, so field
//! presence, types and ranges are checked in exactly one place.

use serde_json::Value;

use crate::{
    error::{AppError, MISSING_FIELDS_MESSAGE},
    payload::JsonObject,
};

/// Largest number of questions a single game may have.
pub const MAX_QUESTION_COUNT: u8 = 30;

/// Validated request for starting a new game.
///
/// # JSON Example
///
/// ```json
/// {
///   "UserID": "u1",
///   "MessageID": "m1",
///   "QuestionCount": 5
/// }
/// ```
///
/// # Validation
///
/// - `UserID`: Required, non-empty string
/// - `MessageID`: Required, non-empty string
/// - `QuestionCount`: Required number, truncated to an integer, 1 to 30 inclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartGameRequest {
    pub user_id: String,
    pub message_id: String,
    pub question_count: u8,
}

impl TryFrom<&JsonObject> for StartGameRequest {
    type Error = AppError;

    fn try_from(object: &JsonObject) -> Result<Self, Self::Error> {
        let missing = || AppError::InvalidRequest(MISSING_FIELDS_MESSAGE.to_string());

        let user_id = non_empty_string(object, "UserID").ok_or_else(missing)?;
        let message_id = non_empty_string(object, "MessageID").ok_or_else(missing)?;
        let count = object
            .get("QuestionCount")
            .and_then(Value::as_f64)
            .ok_or_else(missing)?;

        // Fractional counts are truncated toward zero
        let count = count.trunc();
        if !(1.0..=f64::from(MAX_QUESTION_COUNT)).contains(&count) {
            return Err(AppError::InvalidRequest(format!(
                "Invalid question count! Please give a value from 1 to {MAX_QUESTION_COUNT}"
            )));
        }

        Ok(Self {
            user_id,
            message_id,
            question_count: count as u8,
        })
    }
}

/// Validated request for the next step of a game.
///
/// # JSON Example
///
/// ```json
/// {
///   "UserID": "u1",
///   "Question": 2,
///   "Answer": "Paris"
/// }
/// ```
///
/// `Answer` is optional; without it the request only asks for the
/// outstanding (or first) question. An `Answer` must always name the
/// `Question` it answers, so a replayed answer can be recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextRequest {
    pub user_id: String,
    pub answer: Option<AnswerSubmission>,
}

/// An answer to a specific question of the game, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSubmission {
    pub question: usize,
    pub text: String,
}

impl TryFrom<&JsonObject> for NextRequest {
    type Error = AppError;

    fn try_from(object: &JsonObject) -> Result<Self, Self::Error> {
        let user_id = non_empty_string(object, "UserID").ok_or_else(|| {
            AppError::InvalidRequest(
                "Please specify UserID(string) and optionally Answer(string) and Question(int) in the JSON!"
                    .to_string(),
            )
        })?;

        let answer = match object.get("Answer") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(AnswerSubmission {
                question: question_number(object)?,
                text: text.clone(),
            }),
            Some(_) => {
                return Err(AppError::InvalidRequest(
                    "Answer must be a string!".to_string(),
                ));
            }
        };

        Ok(Self { user_id, answer })
    }
}

/// Validated request for abandoning the game in progress.
///
/// ```json
/// { "UserID": "u1" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbandonGameRequest {
    pub user_id: String,
}

impl TryFrom<&JsonObject> for AbandonGameRequest {
    type Error = AppError;

    fn try_from(object: &JsonObject) -> Result<Self, Self::Error> {
        let user_id = non_empty_string(object, "UserID").ok_or_else(|| {
            AppError::InvalidRequest("Please specify UserID(string) in the JSON!".to_string())
        })?;

        Ok(Self { user_id })
    }
}

fn non_empty_string(object: &JsonObject, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn question_number(object: &JsonObject) -> Result<usize, AppError> {
    object
        .get("Question")
        .and_then(Value::as_u64)
        .filter(|number| *number >= 1)
        .and_then(|number| usize::try_from(number).ok())
        .ok_or_else(|| {
            AppError::InvalidRequest(
                "Question(int) must name the question being answered!".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(object) => object,
            other => panic!("expected object, got {other}"),
        }
    }

    fn start(value: Value) -> Result<StartGameRequest, AppError> {
        StartGameRequest::try_from(&object(value))
    }

    fn assert_missing_fields(result: Result<StartGameRequest, AppError>) {
        match result {
            Err(AppError::InvalidRequest(message)) => {
                assert!(message.contains("UserID(string)"));
                assert!(message.contains("MessageID(string)"));
                assert!(message.contains("QuestionCount(int)"));
            }
            other => panic!("expected missing fields error, got {other:?}"),
        }
    }

    #[test]
    fn valid_start_request() {
        let request = start(json!({"UserID": "u1", "MessageID": "m1", "QuestionCount": 5})).unwrap();

        assert_eq!(
            request,
            StartGameRequest {
                user_id: "u1".to_string(),
                message_id: "m1".to_string(),
                question_count: 5,
            }
        );
    }

    #[test]
    fn question_count_boundaries() {
        let with_count = |count: Value| {
            start(json!({"UserID": "u1", "MessageID": "m1", "QuestionCount": count}))
        };

        assert!(matches!(with_count(json!(0)), Err(AppError::InvalidRequest(_))));
        assert_eq!(with_count(json!(1)).unwrap().question_count, 1);
        assert_eq!(with_count(json!(30)).unwrap().question_count, 30);
        assert!(matches!(with_count(json!(31)), Err(AppError::InvalidRequest(_))));
        assert!(matches!(with_count(json!(-3)), Err(AppError::InvalidRequest(_))));
        assert!(matches!(with_count(json!(300)), Err(AppError::InvalidRequest(_))));
        assert_eq!(with_count(json!(4.9)).unwrap().question_count, 4);
        assert!(matches!(with_count(json!(0.5)), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn out_of_range_message_names_the_bounds() {
        let err = start(json!({"UserID": "u1", "MessageID": "m1", "QuestionCount": 0})).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid question count! Please give a value from 1 to 30"
        );
    }

    #[test]
    fn non_numeric_count_is_rejected() {
        assert_missing_fields(start(json!({"UserID": "u1", "MessageID": "m1", "QuestionCount": "5"})));
    }

    #[test]
    fn each_missing_field_is_rejected() {
        assert_missing_fields(start(json!({"MessageID": "m1", "QuestionCount": 5})));
        assert_missing_fields(start(json!({"UserID": "u1", "QuestionCount": 5})));
        assert_missing_fields(start(json!({"UserID": "u1", "MessageID": "m1"})));
        assert_missing_fields(start(json!({})));
    }

    #[test]
    fn mistyped_or_empty_identifiers_are_rejected() {
        assert_missing_fields(start(json!({"UserID": 1, "MessageID": "m1", "QuestionCount": 5})));
        assert_missing_fields(start(json!({"UserID": "u1", "MessageID": null, "QuestionCount": 5})));
        assert_missing_fields(start(json!({"UserID": "", "MessageID": "m1", "QuestionCount": 5})));
    }

    #[test]
    fn next_request_without_answer() {
        let request = NextRequest::try_from(&object(json!({"UserID": "u1"}))).unwrap();

        assert_eq!(request.user_id, "u1");
        assert!(request.answer.is_none());
    }

    #[test]
    fn next_request_with_numbered_answer() {
        let request = NextRequest::try_from(&object(
            json!({"UserID": "u1", "Answer": "Paris", "Question": 2}),
        ))
        .unwrap();

        assert_eq!(
            request.answer,
            Some(AnswerSubmission {
                question: 2,
                text: "Paris".to_string(),
            })
        );
    }

    #[test]
    fn abandon_request_needs_user_id() {
        let request = AbandonGameRequest::try_from(&object(json!({"UserID": "u1"}))).unwrap();

        assert_eq!(request.user_id, "u1");
        assert!(matches!(
            AbandonGameRequest::try_from(&object(json!({"UserID": 7}))),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn unnumbered_answer_is_rejected() {
        let err = NextRequest::try_from(&object(json!({"UserID": "u1", "Answer": "Paris"})))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Question(int) must name the question being answered!"
        );
    }

    #[test]
    fn next_request_rejects_bad_fields() {
        for value in [
            json!({}),
            json!({"UserID": ""}),
            json!({"UserID": "u1", "Answer": 3}),
            json!({"UserID": "u1", "Answer": "x", "Question": 0}),
            json!({"UserID": "u1", "Answer": "x", "Question": "1"}),
            json!({"UserID": "u1", "Answer": "x"}),
            json!({"UserID": "u1", "Answer": "x", "Question": null}),
        ] {
            assert!(matches!(
                NextRequest::try_from(&object(value)),
                Err(AppError::InvalidRequest(_))
            ));
        }
    }
}
