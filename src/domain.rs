//! Domain models: the typed game configuration union, game entries, and the
//! normalized correctness types shared by the session engine and the scorer.
//!
//! Stored game content is loosely typed JSON with a `gameType` discriminator.
//! `GameConfig` is the strongly typed form produced at the boundary by
//! `content::decode_config`; all interaction and scoring logic runs on it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where did we get the game from?
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameSource {
  LocalBank,   // from user-provided TOML bank
  Seed,  // built-in seeds (last resort)
}

/// One playable game held in the in-memory store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEntry {
  pub id: String,
  pub title: String,
  pub source: GameSource,
  pub config: GameConfig,
}

/// A term/definition pair for the card matching game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pair {
  pub term: String,
  pub definition: String,
}

/// Correctness spec for matching games, in either historical shape:
/// index pairs or text pairs. Text pairs are resolved to indices by the
/// normalizer before any game logic runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchSpec {
  Index { left: usize, right: usize },
  Text { left: String, right: String },
}

/// Correctness spec for timeline games: either a plain position list
/// (`correctOrder[i]` is the target slot of event `i`) or labeled
/// `{text, order}` entries resolved against the event list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderSpec {
  Positions(Vec<usize>),
  Labeled(Vec<OrderEntry>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderEntry {
  pub text: String,
  pub order: usize,
}

/// Correctness spec for category games: item → category, by index or by name.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategorySpec {
  ByIndex { item: usize, category: usize },
  ByName { item: String, category: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryDef {
  pub name: String,
  #[serde(default)] pub color: String,
  #[serde(default)] pub icon: Option<String>,
}

/// One assignable type in the api-types game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiTypeDef {
  pub id: String,
  pub name: String,
  #[serde(default)] pub color: String,
  #[serde(default)] pub description: String,
}

/// One scenario the learner assigns an API type to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiScenario {
  pub id: i64,
  pub text: String,
  #[serde(rename = "correctType")] pub correct_type: String,
  #[serde(default)] pub explanation: String,
}

/// One recognizable JSON file kind in the json-file-types game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileTypeDef {
  pub id: String,
  pub name: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub icon: Option<String>,
  #[serde(default)] pub color: String,
}

/// One file excerpt the learner assigns a type to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileExample {
  pub id: i64,
  pub content: String,
  #[serde(rename = "correctType")] pub correct_type: String,
  #[serde(default)] pub explanation: String,
  #[serde(default)] pub context: Option<String>,
}

/// One quiz question. `kind` selects the answer comparison
/// ("mcq", "true-false", "json-valid", "fix-json-editor"); `answer` is a
/// string, boolean or option index depending on the kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizQuestion {
  #[serde(default)] pub id: String,
  #[serde(rename = "type", default = "default_question_kind")] pub kind: String,
  pub prompt: String,
  #[serde(default)] pub options: Vec<String>,
  pub answer: Value,
  #[serde(default)] pub explanation: String,
}

fn default_question_kind() -> String {
  "mcq".into()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizLevel {
  pub level: u32,
  #[serde(default)] pub name: String,
  #[serde(default)] pub description: Option<String>,
  pub questions: Vec<QuizQuestion>,
}

/// One mode block of the websocket-quiz game (qcm / vrai_faux / debug).
/// Question shapes differ per mode in the stored content; they are decoded
/// into the common `QuizQuestion` via `content::decode_config`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsQuizMode {
  #[serde(default)] pub name: String,
  pub questions: Vec<WsQuizQuestion>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsQuizQuestion {
  #[serde(default)] pub id: String,
  pub prompt: String,
  #[serde(default)] pub code: Option<String>,
  #[serde(default)] pub choices: Vec<String>,
  /// Option index for qcm/debug questions.
  #[serde(rename = "answerIndex", default)] pub answer_index: Option<usize>,
  /// Boolean answer for vrai_faux questions.
  #[serde(default)] pub answer: Option<bool>,
  #[serde(default)] pub explanation: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WsQuizModes {
  #[serde(default)] pub qcm: Option<WsQuizMode>,
  #[serde(default)] pub vrai_faux: Option<WsQuizMode>,
  #[serde(default)] pub debug: Option<WsQuizMode>,
}

/// Author-supplied game configuration, discriminated by `gameType`.
///
/// The scoreable families carry typed fields; the free-play games
/// (scenario, api-builder, graphql-query-builder, api-paradigms) keep their
/// author-defined payloads as loose maps since no server-side round is run
/// for them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "gameType")]
pub enum GameConfig {
  #[serde(rename = "matching")]
  Matching {
    pairs: Vec<Pair>,
  },
  #[serde(rename = "column-matching")]
  ColumnMatching {
    #[serde(rename = "leftColumn")] left_column: Vec<String>,
    #[serde(rename = "rightColumn")] right_column: Vec<String>,
    #[serde(rename = "correctMatches")] correct_matches: Vec<MatchSpec>,
  },
  #[serde(rename = "connection")]
  Connection {
    #[serde(rename = "leftColumn")] left_column: Vec<String>,
    #[serde(rename = "rightColumn")] right_column: Vec<String>,
    #[serde(rename = "correctMatches")] correct_matches: Vec<MatchSpec>,
  },
  #[serde(rename = "timeline")]
  Timeline {
    events: Vec<String>,
    #[serde(rename = "correctOrder")] correct_order: OrderSpec,
  },
  #[serde(rename = "category")]
  Category {
    categories: Vec<CategoryDef>,
    items: Vec<String>,
    #[serde(rename = "correctCategories")] correct_categories: Vec<CategorySpec>,
  },
  #[serde(rename = "api-types")]
  ApiTypes {
    #[serde(rename = "apiTypes")] api_types: Vec<ApiTypeDef>,
    scenarios: Vec<ApiScenario>,
  },
  #[serde(rename = "json-file-types")]
  JsonFileTypes {
    #[serde(rename = "fileTypes")] file_types: Vec<FileTypeDef>,
    examples: Vec<FileExample>,
  },
  #[serde(rename = "format-files")]
  FormatFiles {
    levels: Vec<QuizLevel>,
  },
  #[serde(rename = "quiz")]
  Quiz {
    levels: Vec<QuizLevel>,
  },
  #[serde(rename = "websocket-quiz")]
  WebsocketQuiz {
    modes: WsQuizModes,
  },
  #[serde(rename = "scenario")]
  Scenario {
    #[serde(flatten)] extra: serde_json::Map<String, Value>,
  },
  #[serde(rename = "api-builder")]
  ApiBuilder {
    #[serde(flatten)] extra: serde_json::Map<String, Value>,
  },
  #[serde(rename = "graphql-query-builder")]
  GraphqlQueryBuilder {
    #[serde(flatten)] extra: serde_json::Map<String, Value>,
  },
  #[serde(rename = "api-paradigms")]
  ApiParadigms {
    #[serde(flatten)] extra: serde_json::Map<String, Value>,
  },
}

impl GameConfig {
  /// The wire tag of this configuration (registry key).
  pub fn game_type(&self) -> &'static str {
    match self {
      GameConfig::Matching { .. } => "matching",
      GameConfig::ColumnMatching { .. } => "column-matching",
      GameConfig::Connection { .. } => "connection",
      GameConfig::Timeline { .. } => "timeline",
      GameConfig::Category { .. } => "category",
      GameConfig::ApiTypes { .. } => "api-types",
      GameConfig::JsonFileTypes { .. } => "json-file-types",
      GameConfig::FormatFiles { .. } => "format-files",
      GameConfig::Quiz { .. } => "quiz",
      GameConfig::WebsocketQuiz { .. } => "websocket-quiz",
      GameConfig::Scenario { .. } => "scenario",
      GameConfig::ApiBuilder { .. } => "api-builder",
      GameConfig::GraphqlQueryBuilder { .. } => "graphql-query-builder",
      GameConfig::ApiParadigms { .. } => "api-paradigms",
    }
  }

  /// Whether the server runs scored rounds for this game type. The free-play
  /// games are listed and validated but play out entirely on the client.
  pub fn scoreable(&self) -> bool {
    !matches!(
      self,
      GameConfig::Scenario { .. }
        | GameConfig::ApiBuilder { .. }
        | GameConfig::GraphqlQueryBuilder { .. }
        | GameConfig::ApiParadigms { .. }
    )
  }
}

/// A correctness pair resolved to zero-based indices into the two source
/// sequences. Both indices are guaranteed in-bounds by the normalizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMatch {
  pub left: usize,
  pub right: usize,
}

/// Badge tier awarded by the percentage scorer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
  Gold,
  Silver,
  Bronze,
}
