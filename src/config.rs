//! Loading the game bank (optional TOML file) from GAME_CONFIG_PATH.
//!
//! Each `[[games]]` entry carries its stored content as a JSON string, the
//! same loosely-typed blob the admin console writes to the database; entries
//! go through content extraction and registry validation before they are
//! accepted into the store.

use serde::Deserialize;
use tracing::{info, error};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameBankConfig {
  #[serde(default)]
  pub games: Vec<GameCfg>,
}

/// Game entry accepted in TOML configuration.
/// `content` is the raw game JSON (with its `gameType` discriminator),
/// possibly still carrying the historical nesting/stringification quirks.
#[derive(Clone, Debug, Deserialize)]
pub struct GameCfg {
  #[serde(default)] pub id: Option<String>,
  pub title: String,
  pub content: String,
}

/// Attempt to load `GameBankConfig` from GAME_CONFIG_PATH. On any parsing/IO
/// error, returns None.
pub fn load_game_bank_from_env() -> Option<GameBankConfig> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<GameBankConfig>(&s) {
      Ok(cfg) => {
        info!(target: "portal_games", %path, "Loaded game bank (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "portal_games", %path, error = %e, "Failed to parse TOML game bank");
        None
      }
    },
    Err(e) => {
      error!(target: "portal_games", %path, error = %e, "Failed to read TOML game bank file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bank_toml_parses() {
    let toml_src = r#"
      [[games]]
      title = "HTTP verbs"
      content = '{"gameType":"column-matching","leftColumn":["GET"],"rightColumn":["read"],"correctMatches":[{"left":0,"right":0}]}'

      [[games]]
      id = "g-timeline"
      title = "Web history"
      content = '{"gameType":"timeline","events":["HTTP/1.1","HTTP/2"],"correctOrder":[0,1]}'
    "#;
    let cfg: GameBankConfig = toml::from_str(toml_src).unwrap();
    assert_eq!(cfg.games.len(), 2);
    assert_eq!(cfg.games[1].id.as_deref(), Some("g-timeline"));
  }
}
