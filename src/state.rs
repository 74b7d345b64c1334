//! Application state: in-memory stores, the game registry, and store access.
//!
//! This module owns:
//!   - the game store (by id) seeded from the TOML bank and built-in seeds
//!   - the live round store (by id)
//!   - the immutable game registry table built at startup
//!
//! Games never change after startup. Rounds are created by clients and
//! mutated by placements; the round store is capped, and reaching the cap
//! evicts finished rounds first, then arbitrary stale ones.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use serde_json::Value;
use uuid::Uuid;

use crate::config::load_game_bank_from_env;
use crate::content::{decode_config, extract_game_content};
use crate::domain::{GameEntry, GameSource};
use crate::registry::{game_registry, GameDescriptor};
use crate::seeds::seed_games;
use crate::session::{Round, RoundPhase};

/// Upper bound on concurrently stored rounds. Unauthenticated clients can
/// start rounds freely; the store must not grow without limit.
const MAX_LIVE_ROUNDS: usize = 4096;

#[derive(Clone)]
pub struct AppState {
    pub games: Arc<RwLock<HashMap<String, GameEntry>>>,
    pub rounds: Arc<RwLock<HashMap<String, Round>>>,
    pub registry: HashMap<&'static str, GameDescriptor>,
}

impl AppState {
    /// Build state from env: load the bank, validate and decode entries,
    /// insert built-in seeds, build the registry table.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let registry = game_registry();
        let mut game_map = HashMap::<String, GameEntry>::new();

        // Insert bank games (if any). Invalid entries are skipped, not fatal.
        if let Some(bank) = load_game_bank_from_env() {
            for gc in &bank.games {
                let id = gc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
                let raw: Value = Value::String(gc.content.clone());
                let flat = match extract_game_content(&raw) {
                    Ok(flat) => flat,
                    Err(e) => {
                        error!(target: "game", %id, error = %e, "Skipping bank game: content extraction failed");
                        continue;
                    }
                };
                let tag = flat.get("gameType").and_then(Value::as_str).unwrap_or_default().to_string();
                match registry.get(tag.as_str()) {
                    Some(desc) if desc.validate_config(&flat) => {}
                    Some(_) => {
                        error!(target: "game", %id, %tag, "Skipping bank game: failed registry validation");
                        continue;
                    }
                    None => {
                        error!(target: "game", %id, %tag, "Skipping bank game: unknown game type");
                        continue;
                    }
                }
                let config = match decode_config(flat) {
                    Ok(config) => config,
                    Err(e) => {
                        error!(target: "game", %id, %tag, error = %e, "Skipping bank game: schema decode failed");
                        continue;
                    }
                };
                game_map.insert(id.clone(), GameEntry {
                    id,
                    title: gc.title.clone(),
                    source: GameSource::LocalBank,
                    config,
                });
            }
        }

        // Always insert built-in seeds, but don't overwrite existing ids.
        for entry in seed_games() {
            game_map.entry(entry.id.clone()).or_insert(entry);
        }

        // Inventory summary by type/source.
        let mut count_by_type: HashMap<&'static str, (usize, usize)> = HashMap::new();
        for entry in game_map.values() {
            let slot = count_by_type.entry(entry.config.game_type()).or_insert((0, 0));
            match entry.source {
                GameSource::LocalBank => slot.0 += 1,
                GameSource::Seed => slot.1 += 1,
            }
        }
        for (tag, (bank, seed)) in count_by_type {
            info!(target: "game", %tag, local_bank = bank, seed = seed, "Startup game inventory");
        }
        if game_map.is_empty() {
            warn!(target: "game", "No games available at startup");
        }

        Self {
            games: Arc::new(RwLock::new(game_map)),
            rounds: Arc::new(RwLock::new(HashMap::new())),
            registry,
        }
    }

    /// Store a newly started round. At capacity, finished rounds are evicted
    /// first; if every stored round is still live, arbitrary ones go.
    pub async fn insert_round(&self, id: String, round: Round) {
        self.insert_round_capped(id, round, MAX_LIVE_ROUNDS).await
    }

    async fn insert_round_capped(&self, id: String, round: Round, cap: usize) {
        let mut rounds = self.rounds.write().await;
        if rounds.len() >= cap {
            rounds.retain(|_, r| r.phase() != RoundPhase::Finished);
        }
        while rounds.len() >= cap {
            let stale = match rounds.keys().next() {
                Some(key) => key.clone(),
                None => break,
            };
            warn!(target: "round", round_id = %stale, "Round store full, evicting live round");
            rounds.remove(&stale);
        }
        rounds.insert(id, round);
    }

    /// Read-only access to a game by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_game(&self, id: &str) -> Option<GameEntry> {
        let games = self.games.read().await;
        games.get(id).cloned()
    }

    /// All games, in unspecified order.
    pub async fn all_games(&self) -> Vec<GameEntry> {
        let games = self.games.read().await;
        games.values().cloned().collect()
    }

    /// Look up the registry descriptor of a game-type tag.
    pub fn descriptor(&self, tag: &str) -> Option<&GameDescriptor> {
        self.registry.get(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Placement;

    fn seed_round(id: &str) -> Round {
        let entry = seed_games()
            .into_iter()
            .find(|g| g.id == "seed-http-verbs")
            .unwrap();
        let mut round = Round::from_entry(id.to_string(), &entry).unwrap();
        round.begin(&mut rand::thread_rng());
        round
    }

    fn finished_round(id: &str) -> Round {
        let mut round = seed_round(id);
        for i in 0..4 {
            round.place(&Placement::Match { left: i, right: i }).unwrap();
        }
        assert_eq!(round.phase(), RoundPhase::Finished);
        round
    }

    #[tokio::test]
    async fn round_store_evicts_finished_rounds_at_capacity() {
        let state = AppState::new();
        state.insert_round_capped("r1".into(), seed_round("r1"), 2).await;
        state.insert_round_capped("r2".into(), finished_round("r2"), 2).await;
        state.insert_round_capped("r3".into(), seed_round("r3"), 2).await;

        let rounds = state.rounds.read().await;
        assert_eq!(rounds.len(), 2);
        assert!(rounds.contains_key("r1"));
        assert!(!rounds.contains_key("r2"));
        assert!(rounds.contains_key("r3"));
    }

    #[tokio::test]
    async fn round_store_never_exceeds_its_cap() {
        let state = AppState::new();
        for i in 0..5 {
            let id = format!("r{}", i);
            state.insert_round_capped(id.clone(), seed_round(&id), 3).await;
            assert!(state.rounds.read().await.len() <= 3);
        }
    }
}
