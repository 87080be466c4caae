//! Snapshot extraction: pulls one (game, turn) from a [`RecordSource`],
//! joins colony-or-ship sub-rows and sorts every table by id.

use crate::error::{BuildError, EntityKind, RecordKey};
use crate::link::unit_economics;
use ec_core::{
    Bay, CorsId, CorsKind, CorsRecord, GameCode, GroupKey, InventoryRecord, PayRates, PlanetId,
    Population, RecordSource, Snapshot, SourceRows, TurnKey,
};
use rust_decimal::Decimal;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// A colony or ship dropped because one of its sub-rows is missing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exclusion {
    pub cors: CorsId,
    pub kind: CorsKind,
    /// First missing sub-row: "population", "pay", "ration" or "location".
    pub missing: &'static str,
}

/// What extraction left out. None of this is an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub excluded: Vec<Exclusion>,
    /// Groups dropped along with their excluded owner.
    pub dropped_groups: Vec<GroupKey>,
    /// Inventory lines dropped because their owner was excluded or unknown.
    pub dropped_inventory: usize,
}

/// Fetch and extract the snapshot for `game` at `turn`.
pub fn extract<S: RecordSource + ?Sized>(
    source: &S,
    game: &GameCode,
    turn: TurnKey,
) -> Result<(Snapshot, ExtractReport), BuildError> {
    let rows = source.fetch(game, turn)?;
    extract_rows(rows, game.clone(), turn)
}

/// Extract a snapshot from rows already fetched for `game` at `turn`.
pub fn extract_rows(
    rows: SourceRows,
    game: GameCode,
    turn: TurnKey,
) -> Result<(Snapshot, ExtractReport), BuildError> {
    let mut report = ExtractReport::default();
    let mut snap = Snapshot::new(game, turn);

    // Catalog first: an unknown kind fails the whole extraction.
    snap.units = rows.units;
    snap.units.sort_by_key(|u| u.id);
    for unit in &snap.units {
        unit_economics(unit)?;
    }

    snap.systems = rows.systems;
    snap.stars = rows.stars;
    snap.planets = rows.planets;
    snap.deposits = rows.deposits;
    snap.nations = rows.nations;
    snap.players = rows.players;

    let populations = index_sub_rows(rows.populations, |r| (r.cors, r.population))?;
    let pay = index_sub_rows(rows.pay, |r| (r.cors, r.rates))?;
    let rations = index_sub_rows(rows.rations, |r| (r.cors, r.ration_pct))?;
    let locations = index_sub_rows(rows.locations, |r| (r.cors, r.planet))?;

    let mut base = rows.cors;
    base.sort_by_key(|r| r.id);
    let known: BTreeSet<CorsId> = base.iter().map(|r| r.id).collect();

    let mut inventory: BTreeMap<CorsId, (Vec<InventoryRecord>, Vec<InventoryRecord>)> =
        BTreeMap::new();
    for row in rows.inventory {
        if !known.contains(&row.cors) {
            report.dropped_inventory += 1;
            continue;
        }
        let (hull, cargo) = inventory.entry(row.cors).or_default();
        match row.bay {
            Bay::Hull => hull.push(row.line),
            Bay::Cargo => cargo.push(row.line),
        }
    }

    let mut excluded: BTreeSet<CorsId> = BTreeSet::new();
    for row in base {
        let joined = join(
            populations.get(&row.id),
            pay.get(&row.id),
            rations.get(&row.id),
            locations.get(&row.id),
        );
        let (population, rates, ration_pct, planet) = match joined {
            Ok(parts) => parts,
            Err(missing) => {
                debug!(cors = row.id.0, kind = ?row.kind, missing, "incomplete join; excluding");
                if let Some((hull, cargo)) = inventory.remove(&row.id) {
                    report.dropped_inventory += hull.len() + cargo.len();
                }
                excluded.insert(row.id);
                report.excluded.push(Exclusion {
                    cors: row.id,
                    kind: row.kind,
                    missing,
                });
                continue;
            }
        };
        let (hull, cargo) = inventory.remove(&row.id).unwrap_or_default();
        snap.cors_table_mut(row.kind).push(CorsRecord {
            id: row.id,
            msn: row.msn,
            builder: row.builder,
            player: row.player,
            planet,
            population,
            pay: rates,
            ration_pct,
            hull,
            cargo,
        });
    }

    snap.factory_groups = rows.factory_groups;
    snap.farm_groups = rows.farm_groups;
    snap.mine_groups = rows.mine_groups;
    snap.factory_groups
        .retain(|g| keep_group(&excluded, g.key(), &mut report.dropped_groups));
    snap.farm_groups
        .retain(|g| keep_group(&excluded, g.key(), &mut report.dropped_groups));
    snap.mine_groups
        .retain(|g| keep_group(&excluded, g.key(), &mut report.dropped_groups));
    report.dropped_groups.sort_unstable();

    snap.normalize();
    let colonies = snap.cors().filter(|(kind, _)| kind.is_colony()).count();
    info!(
        game = %snap.game,
        turn = %snap.turn,
        units = snap.units.len(),
        planets = snap.planets.len(),
        colonies,
        ships = snap.ships.len(),
        excluded = report.excluded.len(),
        "snapshot extracted"
    );
    Ok((snap, report))
}

fn index_sub_rows<R, V>(
    rows: Vec<R>,
    split: impl Fn(R) -> (CorsId, V),
) -> Result<BTreeMap<CorsId, V>, BuildError> {
    let mut index = BTreeMap::new();
    for row in rows {
        let (cors, value) = split(row);
        match index.entry(cors) {
            Entry::Occupied(_) => {
                return Err(BuildError::duplicate(EntityKind::Cors, RecordKey::id(cors)));
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
    Ok(index)
}

fn join(
    population: Option<&Population>,
    pay: Option<&PayRates>,
    ration: Option<&Decimal>,
    location: Option<&PlanetId>,
) -> Result<(Population, PayRates, Decimal, PlanetId), &'static str> {
    Ok((
        *population.ok_or("population")?,
        *pay.ok_or("pay")?,
        *ration.ok_or("ration")?,
        *location.ok_or("location")?,
    ))
}

fn keep_group(excluded: &BTreeSet<CorsId>, key: GroupKey, dropped: &mut Vec<GroupKey>) -> bool {
    if excluded.contains(&key.cors) {
        dropped.push(key);
        false
    } else {
        true
    }
}
