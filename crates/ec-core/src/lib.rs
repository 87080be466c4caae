#![deny(warnings)]

//! Core record types for the Empyrean turn engine.
//!
//! This crate defines the normalized, serializable form of one turn of a game:
//! typed ids, the turn key, the per-entity records that make up a [`Snapshot`],
//! and the [`RecordSource`] seam through which raw rows enter the pipeline.

mod config;
mod ids;
mod records;
mod source;
mod turn;

pub use config::{BuildConfig, ConfigError};
pub use ids::{
    CorsId, DepositId, EntityId, GroupKey, NationId, PlanetId, PlayerId, StarId, SystemId,
    UnitId,
};
pub use records::{
    CorsKind, CorsRecord, DepositRecord, FactoryGroupRecord, FarmGroupRecord, GroupUnitRecord,
    InventoryRecord, MineGroupRecord, NationRecord, PayRates, PlanetRecord, PlayerRecord,
    Population, Snapshot, StarRecord, SystemRecord, UnitRecord,
};
pub use source::{
    Bay, CorsLocationRow, CorsPayRow, CorsPopulationRow, CorsRationRow, CorsRow, Dated,
    InventoryRow, MemorySource, RecordSource, SourceError, SourceRows,
};
pub use turn::{GameCode, TurnKey};
