//! HTTP surface for the game server.
//!
//! Every endpoint speaks JSON. Rule violations come back as structured
//! `{"success": false, "message": ...}` bodies with a 4xx status, so clients
//! and the balancer can treat any 2xx as an accepted action.

use crate::game::GameError;
use crate::registry::GameRegistry;
use crate::words::Dictionary;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::debug;
use serde::Deserialize;
use shared::{
    is_valid_game_id, CreateGameResponse, GameStatusResponse, MessageResponse, PlayerIdBody,
    SubmitFragmentRequest, SubmitResponse, SubmitTurnRequest,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Shared handler state: the game registry, the dictionary, and where the
/// browser client's static files live.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GameRegistry>,
    pub dictionary: Arc<Dictionary>,
    pub static_dir: PathBuf,
}

/// An error response: HTTP status plus the client-facing message.
#[derive(Debug, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn game_not_found(game_id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("Game '{}' not found", game_id),
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        let status = match err {
            GameError::NotYourTurn | GameError::NotHost | GameError::UnknownPlayer(_) => {
                StatusCode::FORBIDDEN
            }
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!("Rejecting request: {} {}", self.status, self.message);
        (self.status, Json(MessageResponse::error(self.message))).into_response()
    }
}

/// Unwraps an extracted JSON body, turning malformed payloads into a 400.
fn require_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::bad_request(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    }
}

/// Runs a game operation under the registry lock, mapping both a missing
/// game and a game-rule rejection onto [`ApiError`].
async fn with_game<T>(
    state: &AppState,
    game_id: &str,
    f: impl FnOnce(&mut crate::game::Game) -> Result<T, GameError>,
) -> Result<T, ApiError> {
    if !is_valid_game_id(game_id) {
        return Err(ApiError::game_not_found(game_id));
    }
    match state.registry.with_game(game_id, f).await {
        Some(result) => result.map_err(ApiError::from),
        None => Err(ApiError::game_not_found(game_id)),
    }
}

async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<PlayerIdBody>, JsonRejection>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let body = require_json(payload)?;
    let game_id = state.registry.create_game(&body.player_id).await;
    Ok(Json(CreateGameResponse {
        success: true,
        game_id,
    }))
}

async fn join_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    payload: Result<Json<PlayerIdBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = require_json(payload)?;
    with_game(&state, &game_id, |game| game.add_player(&body.player_id)).await?;
    Ok(Json(MessageResponse::ok(format!(
        "Player {} joined game {}",
        body.player_id, game_id
    ))))
}

async fn start_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    payload: Result<Json<PlayerIdBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = require_json(payload)?;
    let dictionary = Arc::clone(&state.dictionary);

    with_game(&state, &game_id, |game| {
        if game.host_id != body.player_id {
            return Err(GameError::NotHost);
        }
        game.start(&dictionary)
    })
    .await?;

    Ok(Json(MessageResponse::ok(format!(
        "Game {} started",
        game_id
    ))))
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    player_id: String,
}

async fn game_status(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<GameStatusResponse>, ApiError> {
    let view = with_game(&state, &game_id, |game| {
        if !game.players.contains_key(&query.player_id) {
            return Err(GameError::UnknownPlayer(query.player_id.clone()));
        }
        Ok(game.view_for(&query.player_id))
    })
    .await?;

    Ok(Json(GameStatusResponse {
        success: true,
        data: view,
    }))
}

fn submit_response(outcome: crate::game::MoveOutcome) -> Json<SubmitResponse> {
    let message = match &outcome.winner {
        Some(winner) => format!(
            "Formed '{}' for {} points. {} wins!",
            outcome.formed_word, outcome.score_earned, winner
        ),
        None => format!(
            "Formed '{}' for {} points",
            outcome.formed_word, outcome.score_earned
        ),
    };
    Json(SubmitResponse {
        success: true,
        message,
        score_earned: Some(outcome.score_earned),
        helper_used: outcome.helper_used,
        winner: outcome.winner,
    })
}

async fn submit_fragment(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    payload: Result<Json<SubmitFragmentRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let body = require_json(payload)?;
    let dictionary = Arc::clone(&state.dictionary);

    let outcome = with_game(&state, &game_id, |game| {
        game.submit_fragment(
            &body.player_id,
            &body.fragment,
            body.position,
            body.helper_card.as_deref(),
            &dictionary,
        )
    })
    .await?;

    Ok(submit_response(outcome))
}

async fn submit_turn(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    payload: Result<Json<SubmitTurnRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let body = require_json(payload)?;
    let dictionary = Arc::clone(&state.dictionary);

    let outcome = with_game(&state, &game_id, |game| {
        game.submit_turn(&body.player_id, &body.moves, &dictionary)
    })
    .await?;

    Ok(submit_response(outcome))
}

async fn check_turn(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    payload: Result<Json<PlayerIdBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = require_json(payload)?;
    with_game(&state, &game_id, |game| game.pass_turn(&body.player_id)).await?;
    Ok(Json(MessageResponse::ok(format!(
        "Player {} passed their turn",
        body.player_id
    ))))
}

/// Builds the full application router. Unmatched paths fall through to the
/// static file tree so the browser client is served from `/`.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.static_dir.clone());

    Router::new()
        .route("/create_game", post(create_game))
        .route("/join_game/:game_id", post(join_game))
        .route("/start_game/:game_id", post(start_game))
        .route("/game_status/:game_id", get(game_status))
        .route("/submit_fragment/:game_id", post(submit_fragment))
        .route("/submit_turn/:game_id", post(submit_turn))
        .route("/check_turn/:game_id", post(check_turn))
        .fallback_service(static_files)
        .with_state(state)
}
