//! The record source seam: raw, effective-dated rows before joining.

use crate::ids::{CorsId, NationId, PlanetId, PlayerId};
use crate::records::{
    CorsKind, DepositRecord, FactoryGroupRecord, FarmGroupRecord, InventoryRecord,
    MineGroupRecord, NationRecord, PayRates, PlanetRecord, PlayerRecord, Population, StarRecord,
    SystemRecord, UnitRecord,
};
use crate::turn::{GameCode, TurnKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors reported by a record source.
#[derive(Debug, Error, PartialEq)]
pub enum SourceError {
    /// The source holds no data for the requested game.
    #[error("unknown game: {0}")]
    UnknownGame(GameCode),
    /// The source could not produce rows for the turn.
    #[error("records for game {game} turn {turn} unavailable: {reason}")]
    Unavailable {
        game: GameCode,
        turn: TurnKey,
        reason: String,
    },
}

/// Base row of a colony-or-ship. Population, pay, rations and location come
/// from separate sub-rows keyed by the same id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorsRow {
    pub id: CorsId,
    pub kind: CorsKind,
    pub msn: i32,
    #[serde(default)]
    pub builder: Option<NationId>,
    #[serde(default)]
    pub player: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorsPopulationRow {
    pub cors: CorsId,
    pub population: Population,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorsPayRow {
    pub cors: CorsId,
    pub rates: PayRates,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorsRationRow {
    pub cors: CorsId,
    pub ration_pct: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorsLocationRow {
    pub cors: CorsId,
    pub planet: PlanetId,
}

/// Where an inventory line is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bay {
    Hull,
    Cargo,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub cors: CorsId,
    pub bay: Bay,
    pub line: InventoryRecord,
}

/// Rows for one (game, turn), one collection per entity type, references
/// still unresolved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRows {
    pub units: Vec<UnitRecord>,
    pub systems: Vec<SystemRecord>,
    pub stars: Vec<StarRecord>,
    pub planets: Vec<PlanetRecord>,
    pub deposits: Vec<DepositRecord>,
    pub nations: Vec<NationRecord>,
    pub players: Vec<PlayerRecord>,
    pub cors: Vec<CorsRow>,
    pub populations: Vec<CorsPopulationRow>,
    pub pay: Vec<CorsPayRow>,
    pub rations: Vec<CorsRationRow>,
    pub locations: Vec<CorsLocationRow>,
    pub inventory: Vec<InventoryRow>,
    pub factory_groups: Vec<FactoryGroupRecord>,
    pub farm_groups: Vec<FarmGroupRecord>,
    pub mine_groups: Vec<MineGroupRecord>,
}

impl SourceRows {
    /// Append every row of `other`.
    pub fn extend(&mut self, other: SourceRows) {
        self.units.extend(other.units);
        self.systems.extend(other.systems);
        self.stars.extend(other.stars);
        self.planets.extend(other.planets);
        self.deposits.extend(other.deposits);
        self.nations.extend(other.nations);
        self.players.extend(other.players);
        self.cors.extend(other.cors);
        self.populations.extend(other.populations);
        self.pay.extend(other.pay);
        self.rations.extend(other.rations);
        self.locations.extend(other.locations);
        self.inventory.extend(other.inventory);
        self.factory_groups.extend(other.factory_groups);
        self.farm_groups.extend(other.farm_groups);
        self.mine_groups.extend(other.mine_groups);
    }
}

/// Supplies the rows valid at a turn.
///
/// Implementations filter to rows whose effective window encloses `turn` and
/// are responsible for their own concurrency safety.
pub trait RecordSource {
    fn fetch(&self, game: &GameCode, turn: TurnKey) -> Result<SourceRows, SourceError>;
}

/// A value valid from `from` (inclusive) until `until` (exclusive, open-ended
/// when absent).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dated<T> {
    pub from: TurnKey,
    #[serde(default)]
    pub until: Option<TurnKey>,
    pub rows: T,
}

impl<T> Dated<T> {
    pub fn covers(&self, turn: TurnKey) -> bool {
        self.from <= turn && self.until.map_or(true, |until| turn < until)
    }
}

/// In-memory effective-dated source for a single game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySource {
    pub game: GameCode,
    #[serde(default)]
    pub chunks: Vec<Dated<SourceRows>>,
}

impl MemorySource {
    pub fn new(game: GameCode) -> Self {
        Self {
            game,
            chunks: Vec::new(),
        }
    }

    /// Add rows valid from `from` onwards.
    pub fn insert(&mut self, from: TurnKey, rows: SourceRows) {
        self.insert_window(from, None, rows);
    }

    /// Add rows valid in `[from, until)`.
    pub fn insert_window(&mut self, from: TurnKey, until: Option<TurnKey>, rows: SourceRows) {
        self.chunks.push(Dated { from, until, rows });
    }
}

impl RecordSource for MemorySource {
    fn fetch(&self, game: &GameCode, turn: TurnKey) -> Result<SourceRows, SourceError> {
        if *game != self.game {
            return Err(SourceError::UnknownGame(game.clone()));
        }
        let mut rows = SourceRows::default();
        let mut used = 0usize;
        for chunk in self.chunks.iter().filter(|c| c.covers(turn)) {
            rows.extend(chunk.rows.clone());
            used += 1;
        }
        debug!(%game, %turn, chunks = used, "memory source fetched rows");
        Ok(rows)
    }
}
