//! The game registry: an immutable table from game-type tag to descriptor,
//! built once at startup and held in `AppState`.
//!
//! Each descriptor carries a shape validator run against the *extracted* raw
//! content before it is decoded and accepted into the store. Validators check
//! presence and non-emptiness of the arrays each game needs; the free-play
//! games accept any shape. Callers must validate explicitly — the registry
//! itself never rejects anything.

use std::collections::HashMap;

use serde_json::Value;

/// One registered game type.
#[derive(Clone, Copy)]
pub struct GameDescriptor {
  pub tag: &'static str,
  pub name: &'static str,
  pub description: &'static str,
  validate: fn(&Value) -> bool,
}

impl GameDescriptor {
  /// Shape check only; does not guarantee the config decodes.
  pub fn validate_config(&self, config: &Value) -> bool {
    (self.validate)(config)
  }
}

fn non_empty_array(config: &Value, key: &str) -> bool {
  config.get(key).and_then(Value::as_array).is_some_and(|a| !a.is_empty())
}

fn is_array(config: &Value, key: &str) -> bool {
  config.get(key).map(Value::is_array).unwrap_or(false)
}

fn validate_matching(c: &Value) -> bool {
  non_empty_array(c, "pairs")
}

fn validate_columns(c: &Value) -> bool {
  non_empty_array(c, "leftColumn") && non_empty_array(c, "rightColumn") && is_array(c, "correctMatches")
}

fn validate_timeline(c: &Value) -> bool {
  non_empty_array(c, "events")
    && c.get("correctOrder").map(|o| o.is_array() || o.is_object()).unwrap_or(false)
}

fn validate_category(c: &Value) -> bool {
  non_empty_array(c, "categories") && non_empty_array(c, "items") && is_array(c, "correctCategories")
}

fn validate_api_types(c: &Value) -> bool {
  non_empty_array(c, "apiTypes") && non_empty_array(c, "scenarios")
}

fn validate_levels(c: &Value) -> bool {
  non_empty_array(c, "levels")
}

fn validate_json_file_types(c: &Value) -> bool {
  non_empty_array(c, "fileTypes") && non_empty_array(c, "examples")
}

fn validate_any(_c: &Value) -> bool {
  true
}

fn validate_api_paradigms(c: &Value) -> bool {
  // All fields optional, but if present they must have the right shape.
  if c.get("paradigms").is_some_and(|v| !v.is_array()) { return false; }
  if c.get("useCases").is_some_and(|v| !v.is_array()) { return false; }
  if c.get("rankings").is_some_and(|v| !v.is_object()) { return false; }
  true
}

fn validate_websocket_quiz(c: &Value) -> bool {
  let modes = match c.get("modes").and_then(Value::as_object) {
    Some(m) => m,
    None => return false,
  };
  // At least one mode must carry a non-empty question list.
  ["qcm", "vrai_faux", "debug"].iter().any(|mode| {
    modes.get(*mode).is_some_and(|m| non_empty_array(m, "questions"))
  })
}

/// Build the full registry table. Called once from `AppState::new`.
pub fn game_registry() -> HashMap<&'static str, GameDescriptor> {
  let entries = [
    GameDescriptor {
      tag: "matching",
      name: "Card matching",
      description: "Flip cards and pair each term with its definition",
      validate: validate_matching,
    },
    GameDescriptor {
      tag: "column-matching",
      name: "Column matching",
      description: "Match the entries of two columns",
      validate: validate_columns,
    },
    GameDescriptor {
      tag: "connection",
      name: "Connection lines",
      description: "Connect the entries of two columns with animated lines",
      validate: validate_columns,
    },
    GameDescriptor {
      tag: "timeline",
      name: "Timeline",
      description: "Place the events in chronological order",
      validate: validate_timeline,
    },
    GameDescriptor {
      tag: "category",
      name: "Classification",
      description: "Sort the items into the right categories",
      validate: validate_category,
    },
    GameDescriptor {
      tag: "api-types",
      name: "Which API type?",
      description: "Pick the appropriate API type for each scenario",
      validate: validate_api_types,
    },
    GameDescriptor {
      tag: "format-files",
      name: "File formats",
      description: "Recognize and use the JSON, XML and Protobuf formats",
      validate: validate_levels,
    },
    GameDescriptor {
      tag: "json-file-types",
      name: "JSON file types",
      description: "Recognize common JSON files (package.json, tsconfig.json, ...)",
      validate: validate_json_file_types,
    },
    GameDescriptor {
      tag: "scenario",
      name: "Scenario",
      description: "Walk through an interactive scenario of decisions and consequences",
      validate: validate_any,
    },
    GameDescriptor {
      tag: "quiz",
      name: "Quiz",
      description: "Answer the questions to test your knowledge",
      validate: validate_levels,
    },
    GameDescriptor {
      tag: "api-builder",
      name: "API builder",
      description: "Build REST routes by dragging and dropping blocks",
      validate: validate_any,
    },
    GameDescriptor {
      tag: "graphql-query-builder",
      name: "GraphQL query builder",
      description: "Build GraphQL queries by dragging and dropping fields",
      validate: validate_any,
    },
    GameDescriptor {
      tag: "api-paradigms",
      name: "API paradigms",
      description: "Compare API paradigm performance and use cases",
      validate: validate_api_paradigms,
    },
    GameDescriptor {
      tag: "websocket-quiz",
      name: "WebSocket self-test",
      description: "WebSocket self-assessment with MCQ, true/false and debug modes",
      validate: validate_websocket_quiz,
    },
  ];
  entries.into_iter().map(|d| (d.tag, d)).collect()
}
