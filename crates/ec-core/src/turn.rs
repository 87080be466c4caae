use serde::{Deserialize, Serialize};
use std::fmt;

/// Short code naming a game, e.g. "EC-2041".
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCode(pub String);

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// A discrete simulation step. Quarters run 1..=4; year 0 quarter 0 is the
/// genesis turn, the state before any orders were processed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TurnKey {
    pub year: i32,
    pub quarter: i32,
}

impl TurnKey {
    /// The genesis turn, (0, 0).
    pub const GENESIS: TurnKey = TurnKey {
        year: 0,
        quarter: 0,
    };

    pub fn new(year: i32, quarter: i32) -> Self {
        Self { year, quarter }
    }

    pub fn is_genesis(&self) -> bool {
        *self == Self::GENESIS
    }
}

impl fmt::Display for TurnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.quarter)
    }
}
