//! Graph flattener: reduces a [`World`] back to normalized records.

use crate::graph::World;
use ec_core::{
    CorsRecord, DepositRecord, FactoryGroupRecord, FarmGroupRecord, MineGroupRecord,
    NationRecord, PlanetRecord, PlayerRecord, Snapshot, StarRecord, SystemRecord, UnitRecord,
};
use tracing::debug;

/// Flatten `world` into a normalized snapshot: scalar fields plus raw
/// references, every table sorted. Inverse lists, hull ids and unit
/// economics are derived data and are dropped; linking recomputes them.
pub fn flatten(world: &World) -> Snapshot {
    let mut snap = Snapshot::new(world.game.clone(), world.turn);

    snap.units = world
        .units()
        .map(|u| UnitRecord {
            id: u.id,
            kind: u.kind.name().to_string(),
            code: u.code.clone(),
            tech_level: u.tech_level,
            mass: u.mass,
            volume: u.volume,
        })
        .collect();
    snap.systems = world
        .systems()
        .map(|s| SystemRecord {
            id: s.id,
            x: s.coords.x,
            y: s.coords.y,
            z: s.coords.z,
        })
        .collect();
    snap.stars = world
        .stars()
        .map(|s| StarRecord {
            id: s.id,
            system: s.system,
            sequence: s.sequence.clone(),
            kind: s.kind.clone(),
        })
        .collect();
    snap.planets = world
        .planets()
        .map(|p| PlanetRecord {
            id: p.id,
            star: p.star,
            system: p.system,
            orbit: p.orbit,
            kind: p.kind.clone(),
            habitability: p.habitability,
        })
        .collect();
    snap.deposits = world
        .deposits()
        .map(|d| DepositRecord {
            id: d.id,
            planet: d.planet,
            unit: d.unit,
            initial_qty: d.initial_qty,
            remaining_qty: d.remaining_qty,
            yield_pct: d.yield_pct,
            controlled_by: d.controlled_by,
        })
        .collect();
    snap.nations = world
        .nations()
        .map(|n| NationRecord {
            id: n.id,
            name: n.name.clone(),
            home_planet: n.home_planet,
            player: n.player,
            speciality: n.speciality.clone(),
            tech_level: n.tech_level,
            research_points: n.research_points,
        })
        .collect();
    snap.players = world
        .players()
        .map(|p| PlayerRecord {
            id: p.id,
            name: p.name.clone(),
            nation: p.nation,
            reports_to: p.reports_to,
        })
        .collect();

    for c in world.all_cors() {
        snap.cors_table_mut(c.kind).push(CorsRecord {
            id: c.id,
            msn: c.msn,
            builder: c.builder,
            player: c.player,
            planet: c.planet,
            population: c.population,
            pay: c.pay,
            ration_pct: c.ration_pct,
            hull: c.hull.clone(),
            cargo: c.cargo.clone(),
        });
    }

    snap.factory_groups = world
        .factory_groups()
        .map(|g| FactoryGroupRecord {
            cors: g.owner,
            group_no: g.group_no,
            units: g.units.clone(),
            stages: g.stages,
        })
        .collect();
    snap.farm_groups = world
        .farm_groups()
        .map(|g| FarmGroupRecord {
            cors: g.owner,
            group_no: g.group_no,
            units: g.units.clone(),
            stages: g.stages,
        })
        .collect();
    snap.mine_groups = world
        .mine_groups()
        .map(|g| MineGroupRecord {
            cors: g.owner,
            group_no: g.group_no,
            deposit: g.deposit,
            stages: g.stages,
        })
        .collect();

    snap.normalize();
    debug!(game = %snap.game, turn = %snap.turn, "world flattened");
    snap
}
