//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; errors map to a status code + message body.

use std::sync::Arc;
use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::logic::{self, LogicError};
use crate::protocol::{ErrorOut, HealthOut, PlaceIn, StartRoundIn};
use crate::session::RoundError;
use crate::state::AppState;

fn error_response(e: LogicError) -> (StatusCode, Json<ErrorOut>) {
  let status = match &e {
    LogicError::UnknownGame(_) | LogicError::UnknownRound(_) => StatusCode::NOT_FOUND,
    LogicError::Round(RoundError::NotScoreable(_)) => StatusCode::UNPROCESSABLE_ENTITY,
    LogicError::Round(RoundError::BadConfig(_)) => StatusCode::UNPROCESSABLE_ENTITY,
    LogicError::Round(_) => StatusCode::BAD_REQUEST,
  };
  (status, Json(ErrorOut { message: e.to_string() }))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_list_games(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let games = logic::list_games(&state).await;
  info!(target: "game", count = games.len(), "HTTP games listed");
  Json(games)
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_game(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> impl IntoResponse {
  match logic::get_game(&state, &id).await {
    Ok(game) => Json(game).into_response(),
    Err(e) => error_response(e).into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.game_id))]
pub async fn http_start_round(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartRoundIn>,
) -> impl IntoResponse {
  match logic::start_round(&state, &body.game_id).await {
    Ok(round) => {
      info!(target: "round", game_id = %body.game_id, round_id = %round.round_id, "HTTP round started");
      Json(round).into_response()
    }
    Err(e) => error_response(e).into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_round_state(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> impl IntoResponse {
  match logic::round_state(&state, &id).await {
    Ok(round) => Json(round).into_response(),
    Err(e) => error_response(e).into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(%id))]
pub async fn http_place(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<PlaceIn>,
) -> impl IntoResponse {
  match logic::apply_placement(&state, &id, &body.placement).await {
    Ok(out) => {
      info!(
        target: "round",
        round_id = %id,
        outcome = ?out.report.outcome,
        attempts = out.report.attempts,
        "HTTP placement evaluated"
      );
      Json(out).into_response()
    }
    Err(e) => error_response(e).into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_reset_round(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> impl IntoResponse {
  match logic::reset_round(&state, &id).await {
    Ok(round) => Json(round).into_response(),
    Err(e) => error_response(e).into_response(),
  }
}
