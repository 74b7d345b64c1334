//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Listing and fetching games (registry-described)
//!   - Starting, inspecting and resetting rounds
//!   - Applying placements and reporting completion scores

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::protocol::{to_game_out, to_round_out, to_summary, GameOut, GameSummaryOut, PlacementOut, RoundOut};
use crate::session::{Placement, Round, RoundError};
use crate::state::AppState;

/// Operation-level failures reported to clients as protocol errors.
#[derive(Debug)]
pub enum LogicError {
  UnknownGame(String),
  UnknownRound(String),
  Round(RoundError),
}

impl std::fmt::Display for LogicError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      LogicError::UnknownGame(id) => write!(f, "Unknown gameId: {}", id),
      LogicError::UnknownRound(id) => write!(f, "Unknown roundId: {}", id),
      LogicError::Round(e) => write!(f, "{}", e),
    }
  }
}

impl std::error::Error for LogicError {}

impl From<RoundError> for LogicError {
  fn from(e: RoundError) -> Self {
    LogicError::Round(e)
  }
}

/// All stored games as summaries, with registry name/description attached.
#[instrument(level = "info", skip(state))]
pub async fn list_games(state: &AppState) -> Vec<GameSummaryOut> {
  let mut out: Vec<GameSummaryOut> = state
    .all_games()
    .await
    .iter()
    .map(|entry| {
      match state.descriptor(entry.config.game_type()) {
        Some(desc) => to_summary(entry, desc.name, desc.description),
        // Store entries always carry registered tags; keep listing robust anyway.
        None => to_summary(entry, entry.config.game_type(), ""),
      }
    })
    .collect();
  out.sort_by(|a, b| a.id.cmp(&b.id));
  out
}

#[instrument(level = "info", skip(state), fields(%game_id))]
pub async fn get_game(state: &AppState, game_id: &str) -> Result<GameOut, LogicError> {
  state
    .get_game(game_id)
    .await
    .map(|entry| to_game_out(&entry))
    .ok_or_else(|| LogicError::UnknownGame(game_id.to_string()))
}

/// Create a round for a game and start it playing (shuffle + clock).
#[instrument(level = "info", skip(state), fields(%game_id))]
pub async fn start_round(state: &AppState, game_id: &str) -> Result<RoundOut, LogicError> {
  let entry = state
    .get_game(game_id)
    .await
    .ok_or_else(|| LogicError::UnknownGame(game_id.to_string()))?;

  let round_id = Uuid::new_v4().to_string();
  let mut round = Round::from_entry(round_id.clone(), &entry).map_err(|e| {
    warn!(target: "round", %game_id, error = %e, "Round refused to start");
    LogicError::Round(e)
  })?;
  round.begin(&mut rand::thread_rng());

  let out = to_round_out(&round);
  state.insert_round(round_id.clone(), round).await;
  info!(target: "round", %game_id, %round_id, game_type = %out.game_type, "Round started");
  Ok(out)
}

/// Apply one placement to a live round.
#[instrument(level = "debug", skip(state, placement), fields(%round_id))]
pub async fn apply_placement(
  state: &AppState,
  round_id: &str,
  placement: &Placement,
) -> Result<PlacementOut, LogicError> {
  let mut rounds = state.rounds.write().await;
  let round = rounds
    .get_mut(round_id)
    .ok_or_else(|| LogicError::UnknownRound(round_id.to_string()))?;
  let report = round.place(placement)?;
  if let Some(result) = &report.result {
    info!(
      target: "round",
      %round_id,
      game_id = %round.game_id,
      score = result.score,
      attempts = report.attempts,
      "Round finished"
    );
  }
  Ok(PlacementOut { round_id: round_id.to_string(), report })
}

#[instrument(level = "debug", skip(state), fields(%round_id))]
pub async fn round_state(state: &AppState, round_id: &str) -> Result<RoundOut, LogicError> {
  let rounds = state.rounds.read().await;
  rounds
    .get(round_id)
    .map(to_round_out)
    .ok_or_else(|| LogicError::UnknownRound(round_id.to_string()))
}

/// Reset a round: back through idle into a fresh playing round
/// (new shuffle, zeroed attempts, restarted clock).
#[instrument(level = "info", skip(state), fields(%round_id))]
pub async fn reset_round(state: &AppState, round_id: &str) -> Result<RoundOut, LogicError> {
  let mut rounds = state.rounds.write().await;
  let round = rounds
    .get_mut(round_id)
    .ok_or_else(|| LogicError::UnknownRound(round_id.to_string()))?;
  round.reset();
  round.begin(&mut rand::thread_rng());
  info!(target: "round", %round_id, game_id = %round.game_id, "Round reset");
  Ok(to_round_out(round))
}
