//! Extraction of stored game content into the typed configuration.
//!
//! Game content comes from untrusted storage columns that accumulated several
//! historical shapes: the whole blob may be a JSON-encoded string, the real
//! config may sit under a chapter-level `game_content` or an item-level
//! `content` wrapper, and array fields may have been serialized twice.
//! `extract_game_content` tolerates all of these and hands back the flat
//! object carrying the `gameType` discriminator; `decode_config` then turns
//! it into the strongly typed `GameConfig`.

use serde_json::Value;
use tracing::warn;

use crate::domain::GameConfig;
use crate::util::trunc_for_log;

/// Why stored content could not be turned into a game configuration.
#[derive(Debug)]
pub enum ContentError {
  /// The blob (or a nested field) was a string that is not valid JSON.
  BadJson(String),
  /// The blob is not a JSON object after unwrapping.
  NotAnObject,
  /// No `gameType` discriminator was found at any supported nesting level.
  MissingGameType,
  /// The object had a `gameType` but did not match the typed schema.
  BadSchema(String),
}

impl std::fmt::Display for ContentError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ContentError::BadJson(e) => write!(f, "content is not valid JSON: {}", e),
      ContentError::NotAnObject => write!(f, "content is not a JSON object"),
      ContentError::MissingGameType => write!(f, "content has no gameType field"),
      ContentError::BadSchema(e) => write!(f, "content does not match its gameType schema: {}", e),
    }
  }
}

impl std::error::Error for ContentError {}

// Array fields that were historically double-serialized by some authoring
// paths and may arrive as JSON-encoded strings.
const REPARSE_FIELDS: [&str; 3] = ["leftColumn", "rightColumn", "correctMatches"];

/// Unwrap stored game content down to the flat object with a `gameType`.
///
/// Handles, in order: JSON-encoded string blobs, chapter-level
/// `{game_content: ...}` wrapping, item-level `{content: {gameType: ...}}`
/// wrapping (where `content` may itself be a JSON string), and stringified
/// array fields. Recursion depth is bounded by the two wrapper levels the
/// stored data actually exhibits.
pub fn extract_game_content(raw: &Value) -> Result<Value, ContentError> {
  unwrap_level(raw, 0)
}

fn unwrap_level(raw: &Value, depth: u8) -> Result<Value, ContentError> {
  // A stringified blob is parsed and re-examined.
  let value = match raw {
    Value::String(s) => serde_json::from_str::<Value>(s)
      .map_err(|e| ContentError::BadJson(e.to_string()))?,
    other => other.clone(),
  };

  let obj = match value.as_object() {
    Some(o) => o,
    None => return Err(ContentError::NotAnObject),
  };

  if depth < 2 {
    // Chapter-level wrapper: { game_content: {...} } (or a JSON string).
    if let Some(inner) = obj.get("game_content") {
      if inner.is_object() || inner.is_string() {
        return unwrap_level(inner, depth + 1);
      }
    }
    // Item-level wrapper: { type: "game", content: { gameType: ... } }.
    if let Some(inner) = obj.get("content") {
      let inner = match inner {
        Value::String(s) => serde_json::from_str::<Value>(s)
          .map_err(|e| ContentError::BadJson(e.to_string()))?,
        other => other.clone(),
      };
      if inner.get("gameType").is_some() {
        return unwrap_level(&inner, depth + 1);
      }
    }
  }

  if obj.get("gameType").and_then(Value::as_str).is_none() {
    warn!(
      target: "game",
      keys = ?obj.keys().collect::<Vec<_>>(),
      sample = %trunc_for_log(&value.to_string(), 300),
      "gameType missing from extracted content"
    );
    return Err(ContentError::MissingGameType);
  }

  // Re-parse array fields that may still be JSON-encoded strings.
  let mut flat = obj.clone();
  for field in REPARSE_FIELDS {
    let reparsed = match flat.get(field) {
      Some(Value::String(s)) => Some(
        serde_json::from_str::<Value>(s)
          .map_err(|e| ContentError::BadJson(format!("{}: {}", field, e)))?,
      ),
      _ => None,
    };
    if let Some(parsed) = reparsed {
      flat.insert(field.to_string(), parsed);
    }
  }

  Ok(Value::Object(flat))
}

/// Decode extracted content into the typed configuration union.
pub fn decode_config(flat: Value) -> Result<GameConfig, ContentError> {
  serde_json::from_value(flat).map_err(|e| ContentError::BadSchema(e.to_string()))
}

/// One-shot helper: unwrap then decode.
pub fn parse_game_content(raw: &Value) -> Result<GameConfig, ContentError> {
  decode_config(extract_game_content(raw)?)
}
