//! Repair pass: deterministic defaults for known gaps in snapshot data.
//!
//! Repairs are best effort and never fail. Running the pass on an already
//! repaired snapshot changes nothing.

use ec_core::{
    CorsId, CorsKind, InventoryRecord, NationId, PlanetId, PlayerId, Snapshot, UnitId,
};
use ec_econ::UnitKind;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Defaults applied by one repair pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Nations given the planet of their first surface colony.
    pub home_planets: Vec<(NationId, PlanetId)>,
    /// Genesis colonies given their controlling player's nation as builder.
    pub builders: Vec<(CorsId, NationId)>,
    /// Orbital colonies whose life support was raised, with the new quantity.
    pub life_support: Vec<(CorsId, i64)>,
    /// Orbital colonies whose consumer goods were raised, with the new quantity.
    pub consumer_goods: Vec<(CorsId, i64)>,
}

impl RepairReport {
    pub fn is_empty(&self) -> bool {
        self.home_planets.is_empty()
            && self.builders.is_empty()
            && self.life_support.is_empty()
            && self.consumer_goods.is_empty()
    }
}

/// Apply every repair rule that fits the snapshot's turn.
pub fn repair(mut snapshot: Snapshot) -> (Snapshot, RepairReport) {
    let mut report = RepairReport::default();
    repair_home_planets(&mut snapshot, &mut report);
    if snapshot.turn.is_genesis() {
        repair_builders(&mut snapshot, &mut report);
        repair_orbital_supplies(&mut snapshot, &mut report);
    }
    info!(
        turn = %snapshot.turn,
        home_planets = report.home_planets.len(),
        builders = report.builders.len(),
        life_support = report.life_support.len(),
        consumer_goods = report.consumer_goods.len(),
        "repair pass complete"
    );
    (snapshot, report)
}

fn repair_home_planets(snap: &mut Snapshot, report: &mut RepairReport) {
    for nation in snap.nations.iter_mut().filter(|n| n.home_planet.is_none()) {
        let members: BTreeSet<PlayerId> = snap
            .players
            .iter()
            .filter(|p| p.nation == nation.id)
            .map(|p| p.id)
            .collect();
        let first = snap
            .surface_colonies
            .iter()
            .filter(|c| c.player.map_or(false, |p| members.contains(&p)))
            .min_by_key(|c| c.id);
        if let Some(colony) = first {
            debug!(
                nation = nation.id.0,
                planet = colony.planet.0,
                colony = colony.id.0,
                "home planet defaulted"
            );
            nation.home_planet = Some(colony.planet);
            report.home_planets.push((nation.id, colony.planet));
        }
    }
}

fn repair_builders(snap: &mut Snapshot, report: &mut RepairReport) {
    let mut players: Vec<(PlayerId, NationId)> =
        snap.players.iter().map(|p| (p.id, p.nation)).collect();
    players.sort_unstable_by_key(|(id, _)| *id);
    let nation_of = |player: PlayerId| {
        players
            .iter()
            .find(|(id, _)| *id == player)
            .map(|(_, nation)| *nation)
    };

    for kind in [
        CorsKind::SurfaceColony,
        CorsKind::EnclosedColony,
        CorsKind::OrbitalColony,
    ] {
        for colony in snap.cors_table_mut(kind).iter_mut() {
            if colony.builder.is_some() {
                continue;
            }
            if let Some(nation) = colony.player.and_then(nation_of) {
                debug!(colony = colony.id.0, nation = nation.0, "builder defaulted");
                colony.builder = Some(nation);
                report.builders.push((colony.id, nation));
            }
        }
    }
    report.builders.sort_unstable();
}

/// Life support needed for a population: one unit per head plus a
/// sixteenth in reserve. Saturates at `i64::MAX`.
pub fn life_support_needed(population: i64) -> i64 {
    population.saturating_add(population / 16)
}

/// Consumer goods stock for four turns of demand plus a sixteenth.
/// Saturates at the `i64` bounds.
pub fn consumer_goods_needed(professional: i64, soldier: i64, unskilled: i64) -> i64 {
    let demand = (375 * i128::from(professional)
        + 250 * i128::from(soldier)
        + 125 * i128::from(unskilled))
        / 1000;
    let stock = 4 * (demand + demand / 16);
    i64::try_from(stock).unwrap_or(if stock < 0 { i64::MIN } else { i64::MAX })
}

fn first_line_of_kind<'a>(
    lines: &'a mut [InventoryRecord],
    kinds: &BTreeMap<UnitId, UnitKind>,
    kind: UnitKind,
) -> Option<&'a mut InventoryRecord> {
    lines
        .iter_mut()
        .filter(|l| kinds.get(&l.unit) == Some(&kind))
        .min_by_key(|l| l.unit)
}

fn repair_orbital_supplies(snap: &mut Snapshot, report: &mut RepairReport) {
    let kinds: BTreeMap<UnitId, UnitKind> = snap
        .units
        .iter()
        .filter_map(|u| u.kind.parse().ok().map(|k| (u.id, k)))
        .collect();

    for colony in &mut snap.orbital_colonies {
        let pop = colony.population;

        let needed = life_support_needed(pop.total());
        match first_line_of_kind(&mut colony.hull, &kinds, UnitKind::LifeSupport) {
            Some(line) if line.operational < needed => {
                debug!(
                    colony = colony.id.0,
                    from = line.operational,
                    to = needed,
                    "life support raised"
                );
                line.operational = needed;
                report.life_support.push((colony.id, needed));
            }
            Some(_) => {}
            None => warn!(colony = colony.id.0, needed, "no life support in hull; left short"),
        }

        let needed = consumer_goods_needed(pop.professional, pop.soldier, pop.unskilled);
        match first_line_of_kind(&mut colony.cargo, &kinds, UnitKind::ConsumerGoods) {
            Some(line) if line.total() < needed => {
                debug!(
                    colony = colony.id.0,
                    from = line.total(),
                    to = needed,
                    "consumer goods raised"
                );
                line.operational = 0;
                line.stowed = needed;
                report.consumer_goods.push((colony.id, needed));
            }
            Some(_) => {}
            None => warn!(colony = colony.id.0, needed, "no consumer goods in cargo; left short"),
        }
    }
}
