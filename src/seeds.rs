//! Seed data: built-in games that guarantee the server is useful even
//! without an external game bank.

use serde_json::json;

use crate::domain::{GameConfig, GameEntry, GameSource};
use crate::content::parse_game_content;

/// Minimal set of built-in games covering the three scoring modes
/// (time+attempts, accuracy+time, percentage/badge). Content is kept in the
/// stored-JSON shape and run through the same parsing path as bank entries.
pub fn seed_games() -> Vec<GameEntry> {
  let raw = [
    (
      "seed-http-verbs",
      "HTTP verbs and CRUD actions",
      json!({
        "gameType": "column-matching",
        "leftColumn": ["GET", "POST", "PUT", "DELETE"],
        "rightColumn": ["Read a resource", "Create a resource", "Replace a resource", "Remove a resource"],
        "correctMatches": [
          {"left": 0, "right": 0},
          {"left": 1, "right": 1},
          {"left": 2, "right": 2},
          {"left": 3, "right": 3},
        ],
      }),
    ),
    (
      "seed-web-timeline",
      "Web platform milestones",
      json!({
        "gameType": "timeline",
        "events": ["HTTP/1.1 standardized", "AJAX popularized", "WebSocket standardized", "HTTP/2 standardized"],
        "correctOrder": [0, 1, 2, 3],
      }),
    ),
    (
      "seed-json-quiz",
      "JSON basics quiz",
      json!({
        "gameType": "quiz",
        "levels": [{
          "level": 1,
          "name": "Basics",
          "questions": [
            {
              "id": "q1",
              "type": "mcq",
              "prompt": "Which is a valid JSON scalar?",
              "options": ["undefined", "null", "NaN"],
              "answer": "null",
              "explanation": "JSON has null but neither undefined nor NaN.",
            },
            {
              "id": "q2",
              "type": "json-valid",
              "prompt": "Is {\"a\": 1,} valid JSON?",
              "answer": false,
              "explanation": "Trailing commas are not allowed.",
            },
          ],
        }],
      }),
    ),
  ];

  raw
    .into_iter()
    .filter_map(|(id, title, content)| {
      // Seeds are authored here; parse failures can only come from edits to
      // this file and surface in tests below.
      let config: GameConfig = parse_game_content(&content).ok()?;
      Some(GameEntry {
        id: id.to_string(),
        title: title.to_string(),
        source: GameSource::Seed,
        config,
      })
    })
    .collect()
}
