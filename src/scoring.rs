//! Point formulas and answer validation shared by every game family.
//!
//! Two point formulas recur across the placement games, plus a percentage /
//! badge scorer for the quiz-style games. All three are pure; the session
//! engine captures elapsed seconds exactly once at completion and feeds them
//! in, so a finished round's score never drifts with wall-clock time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Badge;
use crate::util::{collapse_ws, loose_text};

/// Final score of a round together with its per-mode component breakdown.
/// The breakdown is handed back to the caller as completion metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
  pub score: u32,
  pub breakdown: Breakdown,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Breakdown {
  /// Accuracy + time: category, timeline, api-types, json-file-types.
  #[serde(rename_all = "camelCase")]
  AccuracyTime {
    accuracy_score: u32,
    time_score: u32,
    correct: usize,
    total: usize,
    secs: u64,
  },
  /// Time + excess attempts: matching, column-matching, connection.
  #[serde(rename_all = "camelCase")]
  TimeAttempts {
    time_score: u32,
    attempt_score: u32,
    attempts: u32,
    excess_attempts: u32,
    total_matches: usize,
    secs: u64,
  },
  /// Percentage + badge: quiz, format-files, websocket-quiz.
  #[serde(rename_all = "camelCase")]
  Percentage {
    correct: usize,
    total: usize,
    percentage: u32,
    badge: Option<Badge>,
  },
}

fn time_points(secs: u64, per_second: u32) -> u32 {
  1000u64.saturating_sub(secs.saturating_mul(per_second as u64)) as u32
}

/// `floor(correct/total * 1000) + max(0, 1000 - secs*5)`, capped at 2000 by
/// construction, never negative.
pub fn accuracy_time_score(correct: usize, total: usize, secs: u64) -> ScoreResult {
  let accuracy_score = if total == 0 { 0 } else { (correct * 1000 / total) as u32 };
  let time_score = time_points(secs, 5);
  ScoreResult {
    score: accuracy_score + time_score,
    breakdown: Breakdown::AccuracyTime { accuracy_score, time_score, correct, total, secs },
  }
}

/// `max(0, 1000 - secs*per_second) + max(0, 1000 - excess*penalty)` where
/// excess counts attempts beyond the minimum possible (one per match).
pub fn time_attempts_score(
  secs: u64,
  per_second: u32,
  attempts: u32,
  total_matches: usize,
  penalty: u32,
) -> ScoreResult {
  let time_score = time_points(secs, per_second);
  let excess_attempts = attempts.saturating_sub(total_matches as u32);
  let attempt_score = 1000u32.saturating_sub(excess_attempts.saturating_mul(penalty));
  ScoreResult {
    score: time_score + attempt_score,
    breakdown: Breakdown::TimeAttempts {
      time_score,
      attempt_score,
      attempts,
      excess_attempts,
      total_matches,
      secs,
    },
  }
}

/// Percentage of correct answers mapped to a badge tier:
/// ≥90% Gold, ≥75% Silver, ≥60% Bronze, else none. Pure and idempotent.
/// The reported score is the raw correct count; percentage and badge travel
/// in the breakdown.
pub fn percentage_score(correct: usize, total: usize) -> ScoreResult {
  if total == 0 {
    return ScoreResult {
      score: 0,
      breakdown: Breakdown::Percentage { correct: 0, total: 0, percentage: 0, badge: None },
    };
  }
  let percentage = ((correct as f64 / total as f64) * 100.0).round() as u32;
  let badge = match percentage {
    p if p >= 90 => Some(Badge::Gold),
    p if p >= 75 => Some(Badge::Silver),
    p if p >= 60 => Some(Badge::Bronze),
    _ => None,
  };
  ScoreResult {
    score: correct as u32,
    breakdown: Breakdown::Percentage { correct, total, percentage, badge },
  }
}

/// Compare a submitted answer against the expected one, per question kind.
///
/// - `json-valid`: boolean equality;
/// - `fix-json-editor`: the submission must parse as JSON and equal the
///   expected text after whitespace collapsing;
/// - anything else (`mcq`, `true-false`): booleans and option indices compare
///   directly, strings compare case-insensitively after trimming.
pub fn validate_answer(user: &Value, correct: &Value, kind: &str) -> bool {
  match kind {
    "json-valid" => user.as_bool().is_some() && user.as_bool() == correct.as_bool(),
    "fix-json-editor" => {
      let submitted = value_text(user);
      is_valid_json(&submitted) && collapse_ws(&submitted) == collapse_ws(&value_text(correct))
    }
    _ => match (user, correct) {
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Number(a), Value::Number(b)) => a == b,
      _ => loose_text(&value_text(user)) == loose_text(&value_text(correct)),
    },
  }
}

/// True if the string parses as JSON.
pub fn is_valid_json(s: &str) -> bool {
  serde_json::from_str::<Value>(s).is_ok()
}

fn value_text(v: &Value) -> String {
  match v {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}
