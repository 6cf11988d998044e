//! HTTP router assembly.
//!
//! Every game route is wrapped, outermost first, in:
//! 1. Basic authentication against the credential store
//! 2. Path and client identity validation
//!
//! Paths without a route fall through to a plain 404.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{MethodRouter, any},
};
use tower_http::trace::TraceLayer;

use crate::{
    handlers,
    middleware::{
        auth::basic_auth,
        validator::{RequestValidator, validate_request},
    },
    state::AppState,
};

pub const START_GAME_PATH: &str = "/startGame";
pub const GET_NEXT_PATH: &str = "/getNext";
pub const ABANDON_GAME_PATH: &str = "/abandonGame";

/// Build the application router around the shared state.
pub fn build_router(state: AppState) -> Router {
    let start_game = validated(
        any(handlers::game::start_game),
        RequestValidator::new(START_GAME_PATH, state.client_user_agent.clone()),
    );
    let get_next = validated(
        any(handlers::game::get_next),
        RequestValidator::new(GET_NEXT_PATH, state.client_user_agent.clone()),
    );
    let abandon_game = validated(
        any(handlers::game::abandon_game),
        RequestValidator::new(ABANDON_GAME_PATH, state.client_user_agent.clone()),
    );

    Router::new()
        .route(START_GAME_PATH, start_game)
        .route(GET_NEXT_PATH, get_next)
        .route(ABANDON_GAME_PATH, abandon_game)
        // Applies to the routes above only, not to the fallback
        .route_layer(from_fn_with_state(state.credentials.clone(), basic_auth))
        .fallback(handlers::fallback::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn validated(
    route: MethodRouter<AppState>,
    validator: RequestValidator,
) -> MethodRouter<AppState> {
    route.layer(from_fn_with_state(validator, validate_request))
}
