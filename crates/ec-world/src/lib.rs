#![deny(warnings)]

//! Turn materialization: builds the linked world graph for one (game, turn)
//! and flattens it back to normalized records.
//!
//! The pipeline is synchronous and all-or-nothing:
//! - [`extract`] pulls rows from a [`RecordSource`] and joins them
//! - [`repair`] fills known data gaps with deterministic defaults
//! - [`link`] resolves references into a [`World`]
//! - [`flatten`] reduces a [`World`] back to a [`Snapshot`]
//!
//! [`RecordSource`]: ec_core::RecordSource
//! [`Snapshot`]: ec_core::Snapshot

mod error;
mod extract;
mod flatten;
mod graph;
mod link;
mod repair;
#[cfg(test)]
mod testkit;

pub use error::{BuildError, EntityKind, RecordKey};
pub use extract::{extract, extract_rows, Exclusion, ExtractReport};
pub use flatten::flatten;
pub use graph::{
    Coords, Cors, Deposit, FactoryGroup, FarmGroup, MineGroup, Nation, Planet, Player, Star,
    System, Unit, World, WorldSummary,
};
pub use link::link;
pub use repair::{consumer_goods_needed, life_support_needed, repair, RepairReport};

use ec_core::{BuildConfig, RecordSource};
use tracing::info;

/// A built world with what extraction and repair did along the way.
#[derive(Clone, Debug)]
pub struct Build {
    pub world: World,
    pub extract: ExtractReport,
    pub repair: RepairReport,
}

/// Extract, optionally repair, and link the world described by `config`.
pub fn build_world<S: RecordSource + ?Sized>(
    source: &S,
    config: &BuildConfig,
) -> Result<Build, BuildError> {
    config.validate()?;
    let (snapshot, extract_report) = extract(source, &config.game, config.turn)?;
    let (snapshot, repair_report) = if config.repair {
        repair(snapshot)
    } else {
        (snapshot, RepairReport::default())
    };
    let world = link(&snapshot)?;
    info!(game = %config.game, turn = %config.turn, "world built");
    Ok(Build {
        world,
        extract: extract_report,
        repair: repair_report,
    })
}
