use crate::turn::{GameCode, TurnKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters of one world build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Game to build.
    pub game: GameCode,
    /// Turn to build.
    #[serde(default)]
    pub turn: TurnKey,
    /// Whether to run the repair pass before linking (default: true).
    #[serde(default = "default_repair")]
    pub repair: bool,
}

fn default_repair() -> bool {
    true
}

/// Invalid build configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("quarter {0} is out of range [0, 4]")]
    InvalidQuarter(i32),
    #[error("year {0} is negative")]
    NegativeYear(i32),
    #[error("quarter 0 is only valid for the genesis turn, got {0}")]
    NotGenesis(TurnKey),
}

impl BuildConfig {
    pub fn new(game: GameCode, turn: TurnKey) -> Self {
        Self {
            game,
            turn,
            repair: true,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn.year < 0 {
            return Err(ConfigError::NegativeYear(self.turn.year));
        }
        if !(0..=4).contains(&self.turn.quarter) {
            return Err(ConfigError::InvalidQuarter(self.turn.quarter));
        }
        if self.turn.quarter == 0 && !self.turn.is_genesis() {
            return Err(ConfigError::NotGenesis(self.turn));
        }
        Ok(())
    }
}
