//! Game HTTP handlers.
//!
//! This module implements the bot-facing game endpoints:
//! - POST /startGame - Start (or restart) a game for a user
//! - GET|POST /getNext - Serve the next question or the final statistics
//! - POST /abandonGame - Drop the game in progress
//!
//! Authentication and request validation have already run as middleware
//! by the time these handlers are called.

use axum::{
    Json,
    extract::{Request, State},
    http::Method,
};

use crate::{
    error::AppError,
    models::{
        game::{AbandonGameRequest, NextRequest, StartGameRequest},
        session::{GameSession, NextStep},
    },
    payload,
    state::AppState,
};

/// Start a new game.
///
/// # Endpoint
///
/// `POST /startGame`
///
/// # Request Body
///
/// ```json
/// {
///   "UserID": "u1",
///   "MessageID": "m1",
///   "QuestionCount": 5
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `User: u1, Game: m1, Questions: 5`
/// - **Error (400)**: Wrong method, missing/mistyped fields, count outside 1..=30
/// - **Error (413)**: Body too large
/// - **Error (500)**: Body is not a JSON object
/// - **Error (503)**: Question bank is empty
///
/// A user who already has a game in progress gets a fresh one; the old game is discarded.
pub async fn start_game(
    State(state): State<AppState>,
    method: Method,
    request: Request,
) -> Result<String, AppError> {
    // Checked before the body is touched
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let object = payload::read_object(request.into_body(), state.max_body_bytes).await?;
    let request = StartGameRequest::try_from(&object)?;

    let questions = state.questions.draw(usize::from(request.question_count));
    if questions.is_empty() {
        return Err(AppError::QuestionBankEmpty);
    }

    let session = GameSession::new(
        request.user_id.clone(),
        request.message_id.clone(),
        questions,
    );
    if let Some(replaced) = state.sessions.start(session) {
        tracing::info!(
            user_id = %request.user_id,
            replaced_game = %replaced.message_id,
            "active game superseded"
        );
    }

    let confirmation = format!(
        "User: {}, Game: {}, Questions: {}",
        request.user_id, request.message_id, request.question_count
    );
    tracing::info!("{}", confirmation);

    Ok(format!("{confirmation}\n"))
}

/// Advance a game in progress.
///
/// # Endpoint
///
/// `GET /getNext` or `POST /getNext`
///
/// # Request Body
///
/// ```json
/// {
///   "UserID": "u1",
///   "Question": 1,
///   "Answer": "Paris"
/// }
/// ```
///
/// `Question` and `Answer` are left out on the first call of a game. An
/// `Answer` without `Question` is rejected. The answer is graded only when
/// `Question` names the outstanding question; otherwise the outstanding
/// question is sent again.
///
/// # Response
///
/// - **Success (200 OK)**: Next question (`"Kind": "Question"`) or final
///   statistics (`"Kind": "Statistics"`). Once finished, the game keeps
///   answering with its statistics, so a retried final answer is safe,
///   until the user starts a new game, abandons it, or it idles out
/// - **Error (400)**: Wrong method or missing/mistyped fields
/// - **Error (404)**: The user has no game (never started, abandoned or expired)
pub async fn get_next(
    State(state): State<AppState>,
    method: Method,
    request: Request,
) -> Result<Json<NextStep>, AppError> {
    if method != Method::GET && method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let object = payload::read_object(request.into_body(), state.max_body_bytes).await?;
    let request = NextRequest::try_from(&object)?;

    let step = state
        .sessions
        .advance(&request.user_id, request.answer.as_ref())?;

    match &step {
        NextStep::Question(question) => tracing::info!(
            user_id = %request.user_id,
            number = question.number,
            total = question.total,
            "serving question"
        ),
        NextStep::Statistics(stats) => tracing::info!(
            user_id = %request.user_id,
            score = stats.score,
            total = stats.total,
            "game complete"
        ),
    }

    Ok(Json(step))
}

/// Abandon the game in progress.
///
/// # Endpoint
///
/// `POST /abandonGame`
///
/// # Request Body
///
/// ```json
/// { "UserID": "u1" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `User: u1, Game: m1 abandoned`
/// - **Error (400)**: Wrong method or missing `UserID`
/// - **Error (404)**: The user has no active game
pub async fn abandon_game(
    State(state): State<AppState>,
    method: Method,
    request: Request,
) -> Result<String, AppError> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let object = payload::read_object(request.into_body(), state.max_body_bytes).await?;
    let request = AbandonGameRequest::try_from(&object)?;

    let abandoned = state
        .sessions
        .abandon(&request.user_id)
        .ok_or(AppError::SessionNotFound)?;

    tracing::info!(
        user_id = %request.user_id,
        game = %abandoned.message_id,
        answered = abandoned.answered,
        "game abandoned"
    );

    Ok(format!(
        "User: {}, Game: {} abandoned\n",
        request.user_id, abandoned.message_id
    ))
}
