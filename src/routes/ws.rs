//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::logic;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "portal_games", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "portal_games", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target = "portal_games", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "portal_games", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "portal_games", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::ListGames => {
      let games = logic::list_games(state).await;
      tracing::info!(target: "game", count = games.len(), "WS games listed");
      ServerWsMessage::Games { games }
    }

    ClientWsMessage::GetGame { game_id } => {
      match logic::get_game(state, &game_id).await {
        Ok(game) => ServerWsMessage::Game { game },
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::StartRound { game_id } => {
      match logic::start_round(state, &game_id).await {
        Ok(round) => {
          tracing::info!(target: "round", %game_id, round_id = %round.round_id, "WS round started");
          ServerWsMessage::Round { round }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::Place { round_id, placement } => {
      match logic::apply_placement(state, &round_id, &placement).await {
        Ok(out) => {
          tracing::info!(target: "round", %round_id, outcome = ?out.report.outcome, "WS placement evaluated");
          ServerWsMessage::Placement { round_id: out.round_id, report: out.report }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::RoundState { round_id } => {
      match logic::round_state(state, &round_id).await {
        Ok(round) => ServerWsMessage::Round { round },
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::ResetRound { round_id } => {
      match logic::reset_round(state, &round_id).await {
        Ok(round) => ServerWsMessage::Round { round },
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }
  }
}
