//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{GameEntry, GameSource};
use crate::session::{Placement, PlacementReport, Round, RoundPhase};
use crate::scoring::ScoreResult;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ListGames,
    GetGame {
        #[serde(rename = "gameId")]
        game_id: String,
    },
    StartRound {
        #[serde(rename = "gameId")]
        game_id: String,
    },
    Place {
        #[serde(rename = "roundId")]
        round_id: String,
        placement: Placement,
    },
    RoundState {
        #[serde(rename = "roundId")]
        round_id: String,
    },
    ResetRound {
        #[serde(rename = "roundId")]
        round_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Games {
        games: Vec<GameSummaryOut>,
    },
    Game {
        game: GameOut,
    },
    Round {
        round: RoundOut,
    },
    Placement {
        #[serde(rename = "roundId")]
        round_id: String,
        report: PlacementReport,
    },
    Error {
        message: String,
    },
}

/// Listing DTO: enough for a menu, without the full config payload.
#[derive(Debug, Serialize)]
pub struct GameSummaryOut {
    pub id: String,
    pub title: String,
    #[serde(rename = "gameType")]
    pub game_type: String,
    pub name: String,
    pub description: String,
    pub source: GameSource,
    pub scoreable: bool,
}

/// Full game DTO, config included (the client renders from it).
#[derive(Debug, Serialize)]
pub struct GameOut {
    pub id: String,
    pub title: String,
    #[serde(rename = "gameType")]
    pub game_type: String,
    pub source: GameSource,
    pub scoreable: bool,
    pub config: Value,
}

/// Round snapshot DTO shared by WS and HTTP.
#[derive(Debug, Serialize)]
pub struct RoundOut {
    #[serde(rename = "roundId")]
    pub round_id: String,
    #[serde(rename = "gameId")]
    pub game_id: String,
    #[serde(rename = "gameType")]
    pub game_type: String,
    pub phase: RoundPhase,
    pub attempts: u32,
    pub placed: usize,
    pub total: usize,
    #[serde(rename = "elapsedSecs")]
    pub elapsed_secs: u64,
    pub board: Value,
    pub result: Option<ScoreResult>,
}

/// Convert a stored game (internal) to the summary DTO.
pub fn to_summary(entry: &GameEntry, name: &str, description: &str) -> GameSummaryOut {
    GameSummaryOut {
        id: entry.id.clone(),
        title: entry.title.clone(),
        game_type: entry.config.game_type().to_string(),
        name: name.to_string(),
        description: description.to_string(),
        source: entry.source.clone(),
        scoreable: entry.config.scoreable(),
    }
}

/// Convert a stored game (internal) to the full DTO.
pub fn to_game_out(entry: &GameEntry) -> GameOut {
    GameOut {
        id: entry.id.clone(),
        title: entry.title.clone(),
        game_type: entry.config.game_type().to_string(),
        source: entry.source.clone(),
        scoreable: entry.config.scoreable(),
        config: serde_json::to_value(&entry.config).unwrap_or(Value::Null),
    }
}

/// Convert a live round to its snapshot DTO.
pub fn to_round_out(round: &Round) -> RoundOut {
    RoundOut {
        round_id: round.id.clone(),
        game_id: round.game_id.clone(),
        game_type: round.game_type.to_string(),
        phase: round.phase(),
        attempts: round.attempts(),
        placed: round.placed(),
        total: round.total(),
        elapsed_secs: round.elapsed_secs(),
        board: round.board_view(),
        result: round.result().cloned(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct StartRoundIn {
    #[serde(rename = "gameId")]
    pub game_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaceIn {
    pub placement: Placement,
}

#[derive(Serialize)]
pub struct PlacementOut {
    #[serde(rename = "roundId")]
    pub round_id: String,
    pub report: PlacementReport,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}
