//! The interaction state machine: one round engine shared by every scoreable
//! game family instead of one hand-rolled copy per game.
//!
//! A round moves `Idle → Playing → Finished`. Entering `Playing` shuffles the
//! presentation order, zeroes the attempt counter and captures the start
//! instant. Every placement while playing counts as an attempt, including
//! rejected ones. After each placement the engine checks whether every
//! placeable item has a final placement; if so it captures the elapsed
//! seconds once, computes the score once, and the round becomes terminal.
//! `reset` is the only exit: back to `Idle` with a fresh board.
//!
//! Board families:
//! - `Pairs`   — matching / column-matching / connection (index-pair checks)
//! - `Slots`   — timeline (fill slots, accuracy counted at completion)
//! - `Buckets` — category / api-types / json-file-types (re-assignable)
//! - `Quiz`    — quiz / format-files / websocket-quiz (sequential questions)

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::{GameConfig, GameEntry, NormalizedMatch, QuizQuestion};
use crate::normalize::{normalize_categories, normalize_matches, normalize_order, NormalizeError};
use crate::scoring::{accuracy_time_score, percentage_score, time_attempts_score, validate_answer, ScoreResult};

#[derive(Debug)]
pub enum RoundError {
    /// The game type has no server-scored round (free-play games).
    NotScoreable(String),
    /// The configuration cannot produce a playable board.
    BadConfig(String),
    /// Placement received before the round was started.
    NotStarted,
    /// Placement kind does not fit the board family.
    WrongPlacement { expected: &'static str },
    /// Placement indices point outside the board.
    OutOfRange(&'static str),
}

impl std::fmt::Display for RoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundError::NotScoreable(tag) => write!(f, "game type \"{}\" has no scored rounds", tag),
            RoundError::BadConfig(e) => write!(f, "configuration incomplete: {}", e),
            RoundError::NotStarted => write!(f, "round has not been started"),
            RoundError::WrongPlacement { expected } => {
                write!(f, "placement does not fit this board (expected {})", expected)
            }
            RoundError::OutOfRange(what) => write!(f, "{} index out of range", what),
        }
    }
}

impl std::error::Error for RoundError {}

impl From<NormalizeError> for RoundError {
    fn from(e: NormalizeError) -> Self {
        RoundError::BadConfig(e.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Idle,
    Playing,
    Finished,
}

/// A placement submitted by the learner.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Pair two indices (card flip pair or column match).
    Match { left: usize, right: usize },
    /// Put an event into a timeline slot.
    Slot { event: usize, slot: usize },
    /// Drop an item into a category/type bucket.
    Bucket { item: usize, bucket: usize },
    /// Answer the current quiz question.
    Answer { answer: Value },
}

/// What a single placement did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// The placement matched the correctness spec (pairs and quiz boards).
    Correct,
    /// The placement was wrong; both slots re-open (the 1.0-1.5s visual hold
    /// of the original UI is presentation-only and not modeled here).
    Incorrect,
    /// Recorded without revealing correctness (slots and buckets boards,
    /// where accuracy is counted at completion).
    Accepted,
    /// No state change: target already matched/occupied, or the round is
    /// already finished. Still counts as an attempt while playing.
    Rejected,
}

/// Per-placement report back to the caller. `result` is set exactly once, on
/// the placement that completes the round.
#[derive(Clone, Debug, Serialize)]
pub struct PlacementReport {
    pub outcome: PlacementOutcome,
    pub phase: RoundPhase,
    pub placed: usize,
    pub total: usize,
    pub attempts: u32,
    pub result: Option<ScoreResult>,
}

#[derive(Debug)]
enum Board {
    Pairs {
        matches: Vec<NormalizedMatch>,
        matched: Vec<bool>,
        left_len: usize,
        right_len: usize,
        left_order: Vec<usize>,
        right_order: Vec<usize>,
    },
    Slots {
        /// Correct slot of each event.
        positions: Vec<usize>,
        /// Event currently occupying each slot.
        slots: Vec<Option<usize>>,
        event_order: Vec<usize>,
    },
    Buckets {
        /// Correct bucket of each item.
        key: Vec<usize>,
        assigned: Vec<Option<usize>>,
        bucket_count: usize,
        item_order: Vec<usize>,
    },
    Quiz {
        questions: Vec<QuizQuestion>,
        next: usize,
        correct: usize,
    },
}

impl Board {
    fn total(&self) -> usize {
        match self {
            Board::Pairs { matches, .. } => matches.len(),
            Board::Slots { slots, .. } => slots.len(),
            Board::Buckets { key, .. } => key.len(),
            Board::Quiz { questions, .. } => questions.len(),
        }
    }

    fn placed(&self) -> usize {
        match self {
            Board::Pairs { matched, .. } => matched.iter().filter(|m| **m).count(),
            Board::Slots { slots, .. } => slots.iter().filter(|s| s.is_some()).count(),
            Board::Buckets { assigned, .. } => assigned.iter().filter(|a| a.is_some()).count(),
            Board::Quiz { next, .. } => *next,
        }
    }

    fn complete(&self) -> bool {
        self.placed() == self.total()
    }

    /// Correct placements, counted against the normalized spec.
    fn correct(&self) -> usize {
        match self {
            Board::Pairs { matched, .. } => matched.iter().filter(|m| **m).count(),
            Board::Slots { positions, slots, .. } => slots
                .iter()
                .enumerate()
                .filter(|(slot, event)| event.map(|e| positions[e] == *slot).unwrap_or(false))
                .count(),
            Board::Buckets { key, assigned, .. } => assigned
                .iter()
                .enumerate()
                .filter(|(item, bucket)| **bucket == Some(key[*item]))
                .count(),
            Board::Quiz { correct, .. } => *correct,
        }
    }

    fn shuffle(&mut self, rng: &mut impl Rng) {
        match self {
            Board::Pairs { left_order, right_order, left_len, right_len, .. } => {
                *left_order = (0..*left_len).collect();
                *right_order = (0..*right_len).collect();
                left_order.shuffle(rng);
                right_order.shuffle(rng);
            }
            Board::Slots { positions, event_order, .. } => {
                *event_order = (0..positions.len()).collect();
                event_order.shuffle(rng);
            }
            Board::Buckets { key, item_order, .. } => {
                *item_order = (0..key.len()).collect();
                item_order.shuffle(rng);
            }
            // Question order is authored (levels are sequential).
            Board::Quiz { .. } => {}
        }
    }

    fn clear(&mut self) {
        match self {
            Board::Pairs { matched, .. } => matched.iter_mut().for_each(|m| *m = false),
            Board::Slots { slots, .. } => slots.iter_mut().for_each(|s| *s = None),
            Board::Buckets { assigned, .. } => assigned.iter_mut().for_each(|a| *a = None),
            Board::Quiz { next, correct, .. } => {
                *next = 0;
                *correct = 0;
            }
        }
    }

    fn apply(&mut self, placement: &Placement) -> Result<PlacementOutcome, RoundError> {
        match (self, placement) {
            (Board::Pairs { matches, matched, left_len, right_len, .. }, Placement::Match { left, right }) => {
                if *left >= *left_len {
                    return Err(RoundError::OutOfRange("left"));
                }
                if *right >= *right_len {
                    return Err(RoundError::OutOfRange("right"));
                }
                // A side that already belongs to a found match is out of play.
                let in_play_taken = matches.iter().zip(matched.iter()).any(|(m, done)| {
                    *done && (m.left == *left || m.right == *right)
                });
                if in_play_taken {
                    return Ok(PlacementOutcome::Rejected);
                }
                let hit = matches
                    .iter()
                    .enumerate()
                    .find(|(_, m)| m.left == *left && m.right == *right)
                    .map(|(i, _)| i);
                match hit {
                    Some(i) => {
                        matched[i] = true;
                        Ok(PlacementOutcome::Correct)
                    }
                    None => Ok(PlacementOutcome::Incorrect),
                }
            }
            (Board::Slots { positions, slots, .. }, Placement::Slot { event, slot }) => {
                if *event >= positions.len() {
                    return Err(RoundError::OutOfRange("event"));
                }
                if *slot >= slots.len() {
                    return Err(RoundError::OutOfRange("slot"));
                }
                let already_placed = slots.iter().any(|s| *s == Some(*event));
                if already_placed || slots[*slot].is_some() {
                    return Ok(PlacementOutcome::Rejected);
                }
                slots[*slot] = Some(*event);
                Ok(PlacementOutcome::Accepted)
            }
            (Board::Buckets { key, assigned, bucket_count, .. }, Placement::Bucket { item, bucket }) => {
                if *item >= key.len() {
                    return Err(RoundError::OutOfRange("item"));
                }
                if *bucket >= *bucket_count {
                    return Err(RoundError::OutOfRange("bucket"));
                }
                // Re-assignment is allowed until the round completes.
                assigned[*item] = Some(*bucket);
                Ok(PlacementOutcome::Accepted)
            }
            (Board::Quiz { questions, next, correct }, Placement::Answer { answer }) => {
                let question = match questions.get(*next) {
                    Some(q) => q,
                    None => return Ok(PlacementOutcome::Rejected),
                };
                let ok = validate_answer(answer, &question.answer, &question.kind);
                *next += 1;
                if ok {
                    *correct += 1;
                    Ok(PlacementOutcome::Correct)
                } else {
                    Ok(PlacementOutcome::Incorrect)
                }
            }
            (board, _) => Err(RoundError::WrongPlacement { expected: board.kind_name() }),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Board::Pairs { .. } => "match",
            Board::Slots { .. } => "slot",
            Board::Buckets { .. } => "bucket",
            Board::Quiz { .. } => "answer",
        }
    }

    /// Client-facing view of the board (presentation order + open state).
    fn view(&self) -> Value {
        match self {
            Board::Pairs { matches, matched, left_order, right_order, .. } => json!({
                "board": "pairs",
                "leftOrder": left_order,
                "rightOrder": right_order,
                "matched": matches
                    .iter()
                    .zip(matched.iter())
                    .filter(|(_, done)| **done)
                    .map(|(m, _)| m)
                    .collect::<Vec<_>>(),
            }),
            Board::Slots { slots, event_order, .. } => json!({
                "board": "slots",
                "eventOrder": event_order,
                "slots": slots,
            }),
            Board::Buckets { assigned, item_order, .. } => json!({
                "board": "buckets",
                "itemOrder": item_order,
                "assigned": assigned,
            }),
            Board::Quiz { questions, next, .. } => json!({
                "board": "quiz",
                "next": next,
                "total": questions.len(),
            }),
        }
    }
}

#[derive(Debug)]
enum Formula {
    AccuracyTime,
    TimeAttempts { per_second: u32, penalty: u32 },
    Percentage,
}

/// One live round of a game.
#[derive(Debug)]
pub struct Round {
    pub id: String,
    pub game_id: String,
    pub game_type: &'static str,
    phase: RoundPhase,
    board: Board,
    formula: Formula,
    attempts: u32,
    started_at: Option<Instant>,
    final_secs: Option<u64>,
    result: Option<ScoreResult>,
}

impl Round {
    /// Build an idle round from a stored game entry. Fails for free-play
    /// game types and for configurations that do not normalize.
    pub fn from_entry(id: String, entry: &GameEntry) -> Result<Self, RoundError> {
        let game_type = entry.config.game_type();
        let (board, formula) = build_board(&entry.config)?;
        if board.total() == 0 {
            return Err(RoundError::BadConfig("nothing placeable".into()));
        }
        Ok(Self {
            id,
            game_id: entry.id.clone(),
            game_type,
            phase: RoundPhase::Idle,
            board,
            formula,
            attempts: 0,
            started_at: None,
            final_secs: None,
            result: None,
        })
    }

    /// Idle → Playing: shuffle presentation, zero counters, start the clock.
    pub fn begin(&mut self, rng: &mut impl Rng) {
        self.board.clear();
        self.board.shuffle(rng);
        self.attempts = 0;
        self.final_secs = None;
        self.result = None;
        self.started_at = Some(Instant::now());
        self.phase = RoundPhase::Playing;
    }

    /// Back to Idle with a cleared board. The only exit from any phase.
    pub fn reset(&mut self) {
        self.board.clear();
        self.attempts = 0;
        self.started_at = None;
        self.final_secs = None;
        self.result = None;
        self.phase = RoundPhase::Idle;
    }

    /// Apply one placement. Attempts count unconditionally while playing;
    /// completion is checked after every placement and scores exactly once.
    /// Placements on a finished round are no-ops reporting the final state.
    pub fn place(&mut self, placement: &Placement) -> Result<PlacementReport, RoundError> {
        match self.phase {
            RoundPhase::Idle => return Err(RoundError::NotStarted),
            RoundPhase::Finished => {
                return Ok(self.report(PlacementOutcome::Rejected));
            }
            RoundPhase::Playing => {}
        }
        self.attempts += 1;
        let outcome = self.board.apply(placement)?;
        if self.board.complete() {
            self.finish();
        }
        Ok(self.report(outcome))
    }

    /// Capture elapsed time once and compute the final score once.
    fn finish(&mut self) {
        let secs = self.started_at.map(|t| t.elapsed().as_secs()).unwrap_or(0);
        self.final_secs = Some(secs);
        let correct = self.board.correct();
        let total = self.board.total();
        self.result = Some(match self.formula {
            Formula::AccuracyTime => accuracy_time_score(correct, total, secs),
            Formula::TimeAttempts { per_second, penalty } => {
                time_attempts_score(secs, per_second, self.attempts, total, penalty)
            }
            Formula::Percentage => percentage_score(correct, total),
        });
        self.phase = RoundPhase::Finished;
    }

    fn report(&self, outcome: PlacementOutcome) -> PlacementReport {
        PlacementReport {
            outcome,
            phase: self.phase,
            placed: self.board.placed(),
            total: self.board.total(),
            attempts: self.attempts,
            result: if self.phase == RoundPhase::Finished { self.result.clone() } else { None },
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn placed(&self) -> usize {
        self.board.placed()
    }

    pub fn total(&self) -> usize {
        self.board.total()
    }

    /// Seconds since round start; frozen at the value captured on completion.
    pub fn elapsed_secs(&self) -> u64 {
        match (self.final_secs, self.started_at) {
            (Some(secs), _) => secs,
            (None, Some(t)) => t.elapsed().as_secs(),
            (None, None) => 0,
        }
    }

    pub fn result(&self) -> Option<&ScoreResult> {
        self.result.as_ref()
    }

    pub fn board_view(&self) -> Value {
        self.board.view()
    }

    /// Test hook: pretend the round started `secs` seconds earlier.
    #[cfg(test)]
    pub fn backdate(&mut self, secs: u64) {
        if let Some(t) = self.started_at {
            self.started_at = t.checked_sub(std::time::Duration::from_secs(secs));
        }
    }
}

fn build_board(config: &GameConfig) -> Result<(Board, Formula), RoundError> {
    match config {
        GameConfig::Matching { pairs } => {
            if pairs.is_empty() {
                return Err(RoundError::BadConfig("no pairs".into()));
            }
            // Each term matches the definition authored beside it.
            let matches: Vec<NormalizedMatch> = (0..pairs.len())
                .map(|i| NormalizedMatch { left: i, right: i })
                .collect();
            let matched = vec![false; matches.len()];
            Ok((
                Board::Pairs {
                    left_len: pairs.len(),
                    right_len: pairs.len(),
                    matches,
                    matched,
                    left_order: Vec::new(),
                    right_order: Vec::new(),
                },
                Formula::TimeAttempts { per_second: 10, penalty: 50 },
            ))
        }
        GameConfig::ColumnMatching { left_column, right_column, correct_matches }
        | GameConfig::Connection { left_column, right_column, correct_matches } => {
            let matches = normalize_matches(correct_matches, left_column, right_column)?;
            let matched = vec![false; matches.len()];
            Ok((
                Board::Pairs {
                    left_len: left_column.len(),
                    right_len: right_column.len(),
                    matches,
                    matched,
                    left_order: Vec::new(),
                    right_order: Vec::new(),
                },
                Formula::TimeAttempts { per_second: 5, penalty: 100 },
            ))
        }
        GameConfig::Timeline { events, correct_order } => {
            if events.is_empty() {
                return Err(RoundError::BadConfig("no events".into()));
            }
            let positions = normalize_order(correct_order, events)?;
            Ok((
                Board::Slots {
                    slots: vec![None; positions.len()],
                    positions,
                    event_order: Vec::new(),
                },
                Formula::AccuracyTime,
            ))
        }
        GameConfig::Category { categories, items, correct_categories } => {
            let names: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();
            let key = normalize_categories(correct_categories, items, &names)?;
            Ok((
                Board::Buckets {
                    assigned: vec![None; key.len()],
                    bucket_count: categories.len(),
                    key,
                    item_order: Vec::new(),
                },
                Formula::AccuracyTime,
            ))
        }
        GameConfig::ApiTypes { api_types, scenarios } => {
            let key = scenarios
                .iter()
                .map(|s| {
                    api_types
                        .iter()
                        .position(|t| t.id == s.correct_type)
                        .ok_or_else(|| RoundError::BadConfig(format!(
                            "scenario {} references unknown type \"{}\"",
                            s.id, s.correct_type
                        )))
                })
                .collect::<Result<Vec<_>, _>>()?;
            if key.is_empty() {
                return Err(RoundError::BadConfig("no scenarios".into()));
            }
            Ok((
                Board::Buckets {
                    assigned: vec![None; key.len()],
                    bucket_count: api_types.len(),
                    key,
                    item_order: Vec::new(),
                },
                Formula::AccuracyTime,
            ))
        }
        GameConfig::JsonFileTypes { file_types, examples } => {
            let key = examples
                .iter()
                .map(|e| {
                    file_types
                        .iter()
                        .position(|t| t.id == e.correct_type)
                        .ok_or_else(|| RoundError::BadConfig(format!(
                            "example {} references unknown type \"{}\"",
                            e.id, e.correct_type
                        )))
                })
                .collect::<Result<Vec<_>, _>>()?;
            if key.is_empty() {
                return Err(RoundError::BadConfig("no examples".into()));
            }
            Ok((
                Board::Buckets {
                    assigned: vec![None; key.len()],
                    bucket_count: file_types.len(),
                    key,
                    item_order: Vec::new(),
                },
                Formula::AccuracyTime,
            ))
        }
        GameConfig::Quiz { levels } | GameConfig::FormatFiles { levels } => {
            let questions: Vec<QuizQuestion> =
                levels.iter().flat_map(|l| l.questions.iter().cloned()).collect();
            if questions.is_empty() {
                return Err(RoundError::BadConfig("no questions".into()));
            }
            Ok((Board::Quiz { questions, next: 0, correct: 0 }, Formula::Percentage))
        }
        GameConfig::WebsocketQuiz { modes } => {
            let mut questions = Vec::new();
            // A question without its answer could never be answered
            // correctly; refuse the configuration instead.
            for mode in [&modes.qcm, &modes.debug] {
                if let Some(block) = mode {
                    for q in &block.questions {
                        let answer_index = q.answer_index.ok_or_else(|| {
                            RoundError::BadConfig(format!("question {} has no answerIndex", q.id))
                        })?;
                        questions.push(QuizQuestion {
                            id: q.id.clone(),
                            kind: "mcq".into(),
                            prompt: q.prompt.clone(),
                            options: q.choices.clone(),
                            answer: json!(answer_index),
                            explanation: q.explanation.clone(),
                        });
                    }
                }
            }
            if let Some(block) = &modes.vrai_faux {
                for q in &block.questions {
                    let answer = q.answer.ok_or_else(|| {
                        RoundError::BadConfig(format!("question {} has no answer", q.id))
                    })?;
                    questions.push(QuizQuestion {
                        id: q.id.clone(),
                        kind: "true-false".into(),
                        prompt: q.prompt.clone(),
                        options: Vec::new(),
                        answer: json!(answer),
                        explanation: q.explanation.clone(),
                    });
                }
            }
            if questions.is_empty() {
                return Err(RoundError::BadConfig("no questions in any mode".into()));
            }
            Ok((Board::Quiz { questions, next: 0, correct: 0 }, Formula::Percentage))
        }
        GameConfig::Scenario { .. }
        | GameConfig::ApiBuilder { .. }
        | GameConfig::GraphqlQueryBuilder { .. }
        | GameConfig::ApiParadigms { .. } => {
            Err(RoundError::NotScoreable(config.game_type().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GameSource, MatchSpec, OrderSpec, Pair};
    use crate::scoring::Breakdown;
    use rand::rngs::mock::StepRng;

    fn entry(config: GameConfig) -> GameEntry {
        GameEntry {
            id: "g1".into(),
            title: "test game".into(),
            source: GameSource::Seed,
            config,
        }
    }

    fn started(config: GameConfig) -> Round {
        let mut round = Round::from_entry("r1".into(), &entry(config)).unwrap();
        round.begin(&mut StepRng::new(0, 1));
        round
    }

    fn card_pairs() -> GameConfig {
        GameConfig::Matching {
            pairs: vec![
                Pair { term: "A".into(), definition: "1".into() },
                Pair { term: "B".into(), definition: "2".into() },
            ],
        }
    }

    #[test]
    fn card_matching_end_to_end() {
        // Spec scenario: two clean matches in 5s → 950 + 1000.
        let mut round = started(card_pairs());
        assert_eq!(round.phase(), RoundPhase::Playing);

        let r = round.place(&Placement::Match { left: 0, right: 0 }).unwrap();
        assert_eq!(r.outcome, PlacementOutcome::Correct);
        assert_eq!(r.phase, RoundPhase::Playing);
        assert!(r.result.is_none());

        round.backdate(5);
        let r = round.place(&Placement::Match { left: 1, right: 1 }).unwrap();
        assert_eq!(r.outcome, PlacementOutcome::Correct);
        assert_eq!(r.phase, RoundPhase::Finished);
        let result = r.result.expect("score on completing placement");
        assert_eq!(result.score, 1950);
        match result.breakdown {
            Breakdown::TimeAttempts { time_score, attempt_score, .. } => {
                assert_eq!(time_score, 950);
                assert_eq!(attempt_score, 1000);
            }
            other => panic!("unexpected breakdown: {:?}", other),
        }
    }

    #[test]
    fn mismatches_cost_attempts_not_state() {
        let mut round = started(card_pairs());
        let r = round.place(&Placement::Match { left: 0, right: 1 }).unwrap();
        assert_eq!(r.outcome, PlacementOutcome::Incorrect);
        assert_eq!(r.placed, 0);
        assert_eq!(r.attempts, 1);
        // The wrongly-tried cards stay in play.
        let r = round.place(&Placement::Match { left: 0, right: 0 }).unwrap();
        assert_eq!(r.outcome, PlacementOutcome::Correct);
        assert_eq!(r.attempts, 2);
    }

    #[test]
    fn matched_cards_leave_play_but_attempts_still_count() {
        let mut round = started(card_pairs());
        round.place(&Placement::Match { left: 0, right: 0 }).unwrap();
        let r = round.place(&Placement::Match { left: 0, right: 1 }).unwrap();
        assert_eq!(r.outcome, PlacementOutcome::Rejected);
        assert_eq!(r.attempts, 2);
    }

    #[test]
    fn finished_round_never_rescores() {
        let mut round = started(card_pairs());
        round.place(&Placement::Match { left: 0, right: 0 }).unwrap();
        round.backdate(5);
        let first = round.place(&Placement::Match { left: 1, right: 1 }).unwrap();
        let score = first.result.unwrap().score;

        round.backdate(100);
        let after = round.place(&Placement::Match { left: 0, right: 0 }).unwrap();
        assert_eq!(after.outcome, PlacementOutcome::Rejected);
        assert_eq!(after.phase, RoundPhase::Finished);
        assert_eq!(after.result.unwrap().score, score);
        assert_eq!(round.attempts(), 2);
    }

    #[test]
    fn column_matching_uses_normalized_text_specs() {
        let config = GameConfig::ColumnMatching {
            left_column: vec!["GET".into(), "POST".into()],
            right_column: vec!["read".into(), "create".into()],
            correct_matches: vec![
                MatchSpec::Text { left: "GET".into(), right: "read".into() },
                MatchSpec::Index { left: 1, right: 1 },
            ],
        };
        let mut round = started(config);
        assert_eq!(
            round.place(&Placement::Match { left: 0, right: 0 }).unwrap().outcome,
            PlacementOutcome::Correct
        );
        let r = round.place(&Placement::Match { left: 1, right: 1 }).unwrap();
        assert_eq!(r.phase, RoundPhase::Finished);
    }

    #[test]
    fn timeline_end_to_end() {
        // Spec scenario: X,Y,Z in order, 3 attempts, 10s → 1000 + 950.
        let config = GameConfig::Timeline {
            events: vec!["X".into(), "Y".into(), "Z".into()],
            correct_order: OrderSpec::Positions(vec![0, 1, 2]),
        };
        let mut round = started(config);
        for i in 0..2 {
            let r = round.place(&Placement::Slot { event: i, slot: i }).unwrap();
            assert_eq!(r.outcome, PlacementOutcome::Accepted);
        }
        round.backdate(10);
        let r = round.place(&Placement::Slot { event: 2, slot: 2 }).unwrap();
        assert_eq!(r.phase, RoundPhase::Finished);
        assert_eq!(r.attempts, 3);
        let result = r.result.unwrap();
        assert_eq!(result.score, 1950);
    }

    #[test]
    fn timeline_wrong_placements_stand_and_cost_accuracy() {
        let config = GameConfig::Timeline {
            events: vec!["X".into(), "Y".into()],
            correct_order: OrderSpec::Positions(vec![0, 1]),
        };
        let mut round = started(config);
        round.place(&Placement::Slot { event: 1, slot: 0 }).unwrap();
        round.backdate(10);
        let r = round.place(&Placement::Slot { event: 0, slot: 1 }).unwrap();
        assert_eq!(r.phase, RoundPhase::Finished);
        match r.result.unwrap().breakdown {
            Breakdown::AccuracyTime { correct, total, .. } => {
                assert_eq!((correct, total), (0, 2));
            }
            other => panic!("unexpected breakdown: {:?}", other),
        }
    }

    #[test]
    fn occupied_slot_is_rejected() {
        let config = GameConfig::Timeline {
            events: vec!["X".into(), "Y".into()],
            correct_order: OrderSpec::Positions(vec![0, 1]),
        };
        let mut round = started(config);
        round.place(&Placement::Slot { event: 0, slot: 0 }).unwrap();
        let r = round.place(&Placement::Slot { event: 1, slot: 0 }).unwrap();
        assert_eq!(r.outcome, PlacementOutcome::Rejected);
        assert_eq!(r.attempts, 2);
    }

    #[test]
    fn category_end_to_end_half_right() {
        // Spec scenario: 4 items, 2 correct, 20s → 500 + 900.
        let config = GameConfig::Category {
            categories: vec![
                crate::domain::CategoryDef { name: "SQL".into(), color: String::new(), icon: None },
                crate::domain::CategoryDef { name: "NoSQL".into(), color: String::new(), icon: None },
            ],
            items: vec!["Postgres".into(), "Redis".into(), "MySQL".into(), "Mongo".into()],
            correct_categories: vec![
                crate::domain::CategorySpec::ByIndex { item: 0, category: 0 },
                crate::domain::CategorySpec::ByIndex { item: 1, category: 1 },
                crate::domain::CategorySpec::ByIndex { item: 2, category: 0 },
                crate::domain::CategorySpec::ByIndex { item: 3, category: 1 },
            ],
        };
        let mut round = started(config);
        round.place(&Placement::Bucket { item: 0, bucket: 0 }).unwrap();
        round.place(&Placement::Bucket { item: 1, bucket: 1 }).unwrap();
        round.place(&Placement::Bucket { item: 2, bucket: 1 }).unwrap();
        round.backdate(20);
        let r = round.place(&Placement::Bucket { item: 3, bucket: 0 }).unwrap();
        assert_eq!(r.phase, RoundPhase::Finished);
        assert_eq!(r.result.unwrap().score, 1400);
    }

    #[test]
    fn bucket_reassignment_is_allowed_until_complete() {
        let config = GameConfig::Category {
            categories: vec![
                crate::domain::CategoryDef { name: "A".into(), color: String::new(), icon: None },
                crate::domain::CategoryDef { name: "B".into(), color: String::new(), icon: None },
            ],
            items: vec!["x".into(), "y".into()],
            correct_categories: vec![
                crate::domain::CategorySpec::ByName { item: "x".into(), category: "A".into() },
                crate::domain::CategorySpec::ByName { item: "y".into(), category: "B".into() },
            ],
        };
        let mut round = started(config);
        round.place(&Placement::Bucket { item: 0, bucket: 1 }).unwrap();
        // Move it to the right bucket before finishing.
        round.place(&Placement::Bucket { item: 0, bucket: 0 }).unwrap();
        let r = round.place(&Placement::Bucket { item: 1, bucket: 1 }).unwrap();
        assert_eq!(r.phase, RoundPhase::Finished);
        assert_eq!(r.attempts, 3);
        match r.result.unwrap().breakdown {
            Breakdown::AccuracyTime { correct, .. } => assert_eq!(correct, 2),
            other => panic!("unexpected breakdown: {:?}", other),
        }
    }

    #[test]
    fn quiz_round_reports_badge() {
        let q = |prompt: &str, answer: &str| QuizQuestion {
            id: String::new(),
            kind: "mcq".into(),
            prompt: prompt.into(),
            options: vec![],
            answer: json!(answer),
            explanation: String::new(),
        };
        let config = GameConfig::Quiz {
            levels: vec![crate::domain::QuizLevel {
                level: 1,
                name: "basics".into(),
                description: None,
                questions: vec![q("a?", "1"), q("b?", "2"), q("c?", "3"), q("d?", "4")],
            }],
        };
        let mut round = started(config);
        round.place(&Placement::Answer { answer: json!("1") }).unwrap();
        round.place(&Placement::Answer { answer: json!("2") }).unwrap();
        round.place(&Placement::Answer { answer: json!("wrong") }).unwrap();
        let r = round.place(&Placement::Answer { answer: json!("4") }).unwrap();
        assert_eq!(r.phase, RoundPhase::Finished);
        match r.result.unwrap().breakdown {
            Breakdown::Percentage { percentage, badge, .. } => {
                assert_eq!(percentage, 75);
                assert_eq!(badge, Some(crate::domain::Badge::Silver));
            }
            other => panic!("unexpected breakdown: {:?}", other),
        }
    }

    #[test]
    fn websocket_quiz_flattens_modes() {
        let config = GameConfig::WebsocketQuiz {
            modes: crate::domain::WsQuizModes {
                qcm: Some(crate::domain::WsQuizMode {
                    name: "QCM".into(),
                    questions: vec![crate::domain::WsQuizQuestion {
                        id: "q1".into(),
                        prompt: "?".into(),
                        code: None,
                        choices: vec!["a".into(), "b".into()],
                        answer_index: Some(1),
                        answer: None,
                        explanation: String::new(),
                    }],
                }),
                vrai_faux: Some(crate::domain::WsQuizMode {
                    name: "T/F".into(),
                    questions: vec![crate::domain::WsQuizQuestion {
                        id: "q2".into(),
                        prompt: "?".into(),
                        code: None,
                        choices: vec![],
                        answer_index: None,
                        answer: Some(true),
                        explanation: String::new(),
                    }],
                }),
                debug: None,
            },
        };
        let mut round = started(config);
        assert_eq!(round.total(), 2);
        assert_eq!(
            round.place(&Placement::Answer { answer: json!(1) }).unwrap().outcome,
            PlacementOutcome::Correct
        );
        let r = round.place(&Placement::Answer { answer: json!(true) }).unwrap();
        assert_eq!(r.phase, RoundPhase::Finished);
    }

    #[test]
    fn websocket_quiz_question_without_answer_is_rejected() {
        let config = GameConfig::WebsocketQuiz {
            modes: crate::domain::WsQuizModes {
                qcm: Some(crate::domain::WsQuizMode {
                    name: "QCM".into(),
                    questions: vec![crate::domain::WsQuizQuestion {
                        id: "q1".into(),
                        prompt: "?".into(),
                        code: None,
                        choices: vec!["a".into(), "b".into()],
                        answer_index: None,
                        answer: None,
                        explanation: String::new(),
                    }],
                }),
                vrai_faux: None,
                debug: None,
            },
        };
        assert!(matches!(
            Round::from_entry("r1".into(), &entry(config)),
            Err(RoundError::BadConfig(_))
        ));
    }

    #[test]
    fn wrong_placement_kind_is_an_error() {
        let mut round = started(card_pairs());
        let err = round.place(&Placement::Answer { answer: json!("x") }).unwrap_err();
        assert!(matches!(err, RoundError::WrongPlacement { expected: "match" }));
    }

    #[test]
    fn out_of_range_placement_is_an_error() {
        let mut round = started(card_pairs());
        let err = round.place(&Placement::Match { left: 9, right: 0 }).unwrap_err();
        assert!(matches!(err, RoundError::OutOfRange("left")));
    }

    #[test]
    fn idle_round_refuses_placements() {
        let mut round = Round::from_entry("r1".into(), &entry(card_pairs())).unwrap();
        assert_eq!(round.phase(), RoundPhase::Idle);
        assert!(matches!(
            round.place(&Placement::Match { left: 0, right: 0 }),
            Err(RoundError::NotStarted)
        ));
    }

    #[test]
    fn reset_returns_to_idle_and_clears_state() {
        let mut round = started(card_pairs());
        round.place(&Placement::Match { left: 0, right: 0 }).unwrap();
        round.reset();
        assert_eq!(round.phase(), RoundPhase::Idle);
        assert_eq!(round.attempts(), 0);
        assert_eq!(round.placed(), 0);
        assert!(round.result().is_none());
        // A fresh begin is a full new round.
        round.begin(&mut StepRng::new(0, 1));
        assert_eq!(round.phase(), RoundPhase::Playing);
    }

    #[test]
    fn free_play_games_are_not_scoreable() {
        let config = GameConfig::Scenario { extra: serde_json::Map::new() };
        let err = Round::from_entry("r1".into(), &entry(config)).unwrap_err();
        assert!(matches!(err, RoundError::NotScoreable(_)));
    }

    #[test]
    fn unresolvable_config_refuses_to_start() {
        let config = GameConfig::ColumnMatching {
            left_column: vec!["a".into()],
            right_column: vec!["b".into()],
            correct_matches: vec![MatchSpec::Index { left: 7, right: 0 }],
        };
        assert!(matches!(
            Round::from_entry("r1".into(), &entry(config)),
            Err(RoundError::BadConfig(_))
        ));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut round = started(card_pairs());
        round.begin(&mut StepRng::new(7, 13));
        let view = round.board_view();
        let mut left: Vec<usize> = view["leftOrder"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_u64().unwrap() as usize)
            .collect();
        left.sort_unstable();
        assert_eq!(left, vec![0, 1]);
    }
}
