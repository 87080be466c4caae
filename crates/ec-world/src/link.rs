//! Graph linker: resolves the raw references of a [`Snapshot`] into a
//! [`World`].
//!
//! Linking runs as a fixed sequence of phases. Each phase reads the tables
//! finished by earlier phases from the [`LinkContext`] and hands back the
//! table it builds:
//!
//! 1. units
//! 2. players, then their reports-to references
//! 3. systems, stars, planets, deposits
//! 4. nations (and each player's nation)
//! 5. factory, farm and mine groups, keyed by their raw owner id
//! 6. colonies and ships
//! 7. group owners and deposit controllers, now that colonies and ships exist
//! 8. inverse relations
//! 9. sorting of every child list

use crate::error::{BuildError, EntityKind, RecordKey};
use crate::graph::{
    Coords, Cors, Deposit, FactoryGroup, FarmGroup, MineGroup, Nation, Planet, Player, Star,
    System, Unit, World,
};
use ec_core::{
    CorsId, DepositId, EntityId, GroupKey, GroupUnitRecord, InventoryRecord, NationId,
    PlanetId, PlayerId, Snapshot, StarId, SystemId, UnitId, UnitRecord,
};
use ec_econ::{EconError, UnitEconomics, UnitKind};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// The record holding a reference, for error reporting.
#[derive(Clone, Copy, Debug)]
struct Referrer {
    entity: EntityKind,
    key: RecordKey,
}

impl Referrer {
    fn new(entity: EntityKind, key: RecordKey) -> Self {
        Self { entity, key }
    }

    /// A miss is a structural defect and aborts the build.
    fn require<K: EntityId, V>(
        &self,
        table: &BTreeMap<K, V>,
        field: &'static str,
        target: EntityKind,
        id: K,
    ) -> Result<K, BuildError> {
        if table.contains_key(&id) {
            Ok(id)
        } else {
            Err(BuildError::DanglingReference {
                entity: self.entity,
                key: self.key,
                field,
                target,
                target_id: id.raw(),
            })
        }
    }

    /// A miss resolves to an absent relation.
    fn optional<K: EntityId, V>(
        &self,
        table: &BTreeMap<K, V>,
        field: &'static str,
        target: EntityKind,
        id: Option<K>,
    ) -> Option<K> {
        let id = id?;
        if table.contains_key(&id) {
            return Some(id);
        }
        warn!(
            entity = %self.entity,
            key = %self.key,
            field,
            points_to = %target,
            target_id = id.raw(),
            "optional reference does not resolve; leaving it absent"
        );
        None
    }
}

fn insert_unique<K: Ord, V>(
    table: &mut BTreeMap<K, V>,
    id: K,
    value: V,
    entity: EntityKind,
    key: RecordKey,
) -> Result<(), BuildError> {
    match table.entry(id) {
        Entry::Occupied(_) => Err(BuildError::duplicate(entity, key)),
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
    }
}

/// Parse a catalog unit's kind and compute its cost profile.
pub(crate) fn unit_economics(record: &UnitRecord) -> Result<(UnitKind, UnitEconomics), BuildError> {
    let to_build_error = |err: EconError| match err {
        EconError::UnknownUnitKind(kind) => BuildError::UnknownUnitKind {
            unit: record.id,
            kind,
        },
        EconError::InvalidTechLevel { tech_level, .. } => BuildError::InvalidTechLevel {
            unit: record.id,
            tech_level,
        },
    };
    let kind: UnitKind = record.kind.parse().map_err(to_build_error)?;
    let economics = kind.economics(record.tech_level).map_err(to_build_error)?;
    Ok((kind, economics))
}

/// Tables finished so far, threaded through the phases.
#[derive(Default)]
struct LinkContext {
    units: BTreeMap<UnitId, Unit>,
    players: BTreeMap<PlayerId, Player>,
    systems: BTreeMap<SystemId, System>,
    stars: BTreeMap<StarId, Star>,
    planets: BTreeMap<PlanetId, Planet>,
    deposits: BTreeMap<DepositId, Deposit>,
    nations: BTreeMap<NationId, Nation>,
    factory_groups: BTreeMap<GroupKey, FactoryGroup>,
    farm_groups: BTreeMap<GroupKey, FarmGroup>,
    mine_groups: BTreeMap<GroupKey, MineGroup>,
    cors: BTreeMap<CorsId, Cors>,
    hulls: BTreeMap<String, CorsId>,
}

/// Resolve every reference in `snapshot` and build the world graph.
///
/// Fails on the first dangling required reference, duplicate key, duplicate
/// hull id or planet/star system mismatch. Optional references that do not
/// resolve are left absent.
pub fn link(snapshot: &Snapshot) -> Result<World, BuildError> {
    let mut ctx = LinkContext::default();

    ctx.units = link_units(&snapshot.units)?;
    ctx.players = link_players(snapshot)?;
    ctx.systems = link_systems(snapshot)?;
    ctx.stars = link_stars(snapshot, &ctx)?;
    ctx.planets = link_planets(snapshot, &ctx)?;
    ctx.deposits = link_deposits(snapshot, &ctx)?;
    ctx.nations = link_nations(snapshot, &ctx)?;
    check_player_nations(&ctx)?;
    ctx.factory_groups = link_factory_groups(snapshot, &ctx)?;
    ctx.farm_groups = link_farm_groups(snapshot, &ctx)?;
    ctx.mine_groups = link_mine_groups(snapshot, &ctx)?;
    let (cors, hulls) = link_cors(snapshot, &ctx)?;
    ctx.cors = cors;
    ctx.hulls = hulls;
    attach_group_owners(&ctx)?;
    ctx.deposits = resolve_deposit_controllers(std::mem::take(&mut ctx.deposits), &ctx.cors);
    build_inverse_relations(&mut ctx);
    sort_children(&mut ctx);

    let world = World {
        game: snapshot.game.clone(),
        turn: snapshot.turn,
        units: ctx.units,
        systems: ctx.systems,
        stars: ctx.stars,
        planets: ctx.planets,
        deposits: ctx.deposits,
        nations: ctx.nations,
        players: ctx.players,
        cors: ctx.cors,
        factory_groups: ctx.factory_groups,
        farm_groups: ctx.farm_groups,
        mine_groups: ctx.mine_groups,
        hulls: ctx.hulls,
    };
    info!(game = %world.game, turn = %world.turn, summary = ?world.summary(), "world linked");
    Ok(world)
}

fn link_units(records: &[UnitRecord]) -> Result<BTreeMap<UnitId, Unit>, BuildError> {
    let mut units = BTreeMap::new();
    for r in records {
        let (kind, economics) = unit_economics(r)?;
        let unit = Unit {
            id: r.id,
            kind,
            code: r.code.clone(),
            tech_level: r.tech_level,
            mass: r.mass,
            volume: r.volume,
            economics,
        };
        insert_unique(&mut units, r.id, unit, EntityKind::Unit, RecordKey::id(r.id))?;
    }
    Ok(units)
}

fn link_players(snapshot: &Snapshot) -> Result<BTreeMap<PlayerId, Player>, BuildError> {
    // Every player must exist before any reports-to reference is followed.
    let mut players = BTreeMap::new();
    for r in &snapshot.players {
        let player = Player {
            id: r.id,
            name: r.name.clone(),
            nation: r.nation,
            reports_to: None,
            subordinates: Vec::new(),
            colonies: Vec::new(),
            ships: Vec::new(),
        };
        insert_unique(&mut players, r.id, player, EntityKind::Player, RecordKey::id(r.id))?;
    }

    let bosses: Vec<(PlayerId, Option<PlayerId>)> = snapshot
        .players
        .iter()
        .map(|r| {
            let from = Referrer::new(EntityKind::Player, RecordKey::id(r.id));
            let boss = from.optional(&players, "reports_to", EntityKind::Player, r.reports_to);
            (r.id, boss)
        })
        .collect();
    for (id, boss) in bosses {
        if let Some(player) = players.get_mut(&id) {
            player.reports_to = boss;
        }
    }
    Ok(players)
}

fn link_systems(snapshot: &Snapshot) -> Result<BTreeMap<SystemId, System>, BuildError> {
    let mut systems = BTreeMap::new();
    for r in &snapshot.systems {
        let system = System {
            id: r.id,
            coords: Coords {
                x: r.x,
                y: r.y,
                z: r.z,
            },
            stars: Vec::new(),
        };
        insert_unique(&mut systems, r.id, system, EntityKind::System, RecordKey::id(r.id))?;
    }
    Ok(systems)
}

fn link_stars(
    snapshot: &Snapshot,
    ctx: &LinkContext,
) -> Result<BTreeMap<StarId, Star>, BuildError> {
    let mut stars = BTreeMap::new();
    for r in &snapshot.stars {
        let from = Referrer::new(EntityKind::Star, RecordKey::id(r.id));
        let star = Star {
            id: r.id,
            system: from.require(&ctx.systems, "system", EntityKind::System, r.system)?,
            sequence: r.sequence.clone(),
            kind: r.kind.clone(),
            planets: Vec::new(),
        };
        insert_unique(&mut stars, r.id, star, EntityKind::Star, RecordKey::id(r.id))?;
    }
    Ok(stars)
}

fn link_planets(
    snapshot: &Snapshot,
    ctx: &LinkContext,
) -> Result<BTreeMap<PlanetId, Planet>, BuildError> {
    let mut planets = BTreeMap::new();
    for r in &snapshot.planets {
        let from = Referrer::new(EntityKind::Planet, RecordKey::id(r.id));
        let star = from.require(&ctx.stars, "star", EntityKind::Star, r.star)?;
        let system = from.require(&ctx.systems, "system", EntityKind::System, r.system)?;
        let star_system = ctx.stars.get(&star).map(|s| s.system);
        if star_system != Some(system) {
            return Err(BuildError::InconsistentPlanet {
                planet: r.id,
                star,
                star_system: star_system.unwrap_or_default(),
                planet_system: system,
            });
        }
        let planet = Planet {
            id: r.id,
            star,
            system,
            orbit: r.orbit,
            kind: r.kind.clone(),
            habitability: r.habitability,
            deposits: Vec::new(),
            colonies: Vec::new(),
            ships: Vec::new(),
        };
        insert_unique(&mut planets, r.id, planet, EntityKind::Planet, RecordKey::id(r.id))?;
    }
    Ok(planets)
}

fn link_deposits(
    snapshot: &Snapshot,
    ctx: &LinkContext,
) -> Result<BTreeMap<DepositId, Deposit>, BuildError> {
    let mut deposits = BTreeMap::new();
    for r in &snapshot.deposits {
        let from = Referrer::new(EntityKind::Deposit, RecordKey::id(r.id));
        let deposit = Deposit {
            id: r.id,
            planet: from.require(&ctx.planets, "planet", EntityKind::Planet, r.planet)?,
            unit: from.require(&ctx.units, "unit", EntityKind::Unit, r.unit)?,
            initial_qty: r.initial_qty,
            remaining_qty: r.remaining_qty,
            yield_pct: r.yield_pct,
            // Resolved once colonies and ships exist.
            controlled_by: r.controlled_by,
            mine_groups: Vec::new(),
        };
        insert_unique(&mut deposits, r.id, deposit, EntityKind::Deposit, RecordKey::id(r.id))?;
    }
    Ok(deposits)
}

fn link_nations(
    snapshot: &Snapshot,
    ctx: &LinkContext,
) -> Result<BTreeMap<NationId, Nation>, BuildError> {
    let mut nations = BTreeMap::new();
    for r in &snapshot.nations {
        let from = Referrer::new(EntityKind::Nation, RecordKey::id(r.id));
        let nation = Nation {
            id: r.id,
            name: r.name.clone(),
            home_planet: from.optional(
                &ctx.planets,
                "home_planet",
                EntityKind::Planet,
                r.home_planet,
            ),
            player: from.optional(&ctx.players, "player", EntityKind::Player, r.player),
            speciality: r.speciality.clone(),
            tech_level: r.tech_level,
            research_points: r.research_points,
            players: Vec::new(),
        };
        insert_unique(&mut nations, r.id, nation, EntityKind::Nation, RecordKey::id(r.id))?;
    }
    Ok(nations)
}

fn check_player_nations(ctx: &LinkContext) -> Result<(), BuildError> {
    for player in ctx.players.values() {
        Referrer::new(EntityKind::Player, RecordKey::id(player.id)).require(
            &ctx.nations,
            "nation",
            EntityKind::Nation,
            player.nation,
        )?;
    }
    Ok(())
}

fn link_group_units(
    from: Referrer,
    units: &[GroupUnitRecord],
    ctx: &LinkContext,
) -> Result<Vec<GroupUnitRecord>, BuildError> {
    let mut linked = Vec::with_capacity(units.len());
    for line in units {
        from.require(&ctx.units, "units", EntityKind::Unit, line.unit)?;
        linked.push(*line);
    }
    Ok(linked)
}

fn link_factory_groups(
    snapshot: &Snapshot,
    ctx: &LinkContext,
) -> Result<BTreeMap<GroupKey, FactoryGroup>, BuildError> {
    let mut groups = BTreeMap::new();
    for r in &snapshot.factory_groups {
        let from = Referrer::new(EntityKind::FactoryGroup, r.key().into());
        let group = FactoryGroup {
            owner: r.cors,
            group_no: r.group_no,
            units: link_group_units(from, &r.units, ctx)?,
            stages: r.stages,
        };
        insert_unique(&mut groups, r.key(), group, from.entity, from.key)?;
    }
    Ok(groups)
}

fn link_farm_groups(
    snapshot: &Snapshot,
    ctx: &LinkContext,
) -> Result<BTreeMap<GroupKey, FarmGroup>, BuildError> {
    let mut groups = BTreeMap::new();
    for r in &snapshot.farm_groups {
        let from = Referrer::new(EntityKind::FarmGroup, r.key().into());
        let group = FarmGroup {
            owner: r.cors,
            group_no: r.group_no,
            units: link_group_units(from, &r.units, ctx)?,
            stages: r.stages,
        };
        insert_unique(&mut groups, r.key(), group, from.entity, from.key)?;
    }
    Ok(groups)
}

fn link_mine_groups(
    snapshot: &Snapshot,
    ctx: &LinkContext,
) -> Result<BTreeMap<GroupKey, MineGroup>, BuildError> {
    let mut groups = BTreeMap::new();
    for r in &snapshot.mine_groups {
        let from = Referrer::new(EntityKind::MineGroup, r.key().into());
        let group = MineGroup {
            owner: r.cors,
            group_no: r.group_no,
            deposit: from.require(&ctx.deposits, "deposit", EntityKind::Deposit, r.deposit)?,
            stages: r.stages,
        };
        insert_unique(&mut groups, r.key(), group, from.entity, from.key)?;
    }
    Ok(groups)
}

fn group_keys<V>(groups: &BTreeMap<GroupKey, V>, owner: CorsId) -> Vec<GroupKey> {
    groups
        .range(GroupKey::new(owner, i32::MIN)..=GroupKey::new(owner, i32::MAX))
        .map(|(key, _)| *key)
        .collect()
}

fn link_inventory(
    from: Referrer,
    field: &'static str,
    lines: &[InventoryRecord],
    ctx: &LinkContext,
) -> Result<Vec<InventoryRecord>, BuildError> {
    let mut linked = Vec::with_capacity(lines.len());
    for line in lines {
        from.require(&ctx.units, field, EntityKind::Unit, line.unit)?;
        linked.push(*line);
    }
    Ok(linked)
}

type CorsTables = (BTreeMap<CorsId, Cors>, BTreeMap<String, CorsId>);

fn link_cors(snapshot: &Snapshot, ctx: &LinkContext) -> Result<CorsTables, BuildError> {
    let mut cors = BTreeMap::new();
    let mut hulls: BTreeMap<String, CorsId> = BTreeMap::new();
    for (kind, r) in snapshot.cors() {
        let from = Referrer::new(kind.into(), RecordKey::id(r.id));
        let hull_id = kind.hull_id(r.msn);
        if let Some(&other) = hulls.get(&hull_id) {
            return Err(BuildError::DuplicateHullId {
                hull: hull_id,
                first: other.min(r.id),
                second: other.max(r.id),
            });
        }
        let entry = Cors {
            id: r.id,
            kind,
            msn: r.msn,
            hull_id: hull_id.clone(),
            builder: from.optional(&ctx.nations, "builder", EntityKind::Nation, r.builder),
            player: from.optional(&ctx.players, "player", EntityKind::Player, r.player),
            planet: from.require(&ctx.planets, "planet", EntityKind::Planet, r.planet)?,
            population: r.population,
            pay: r.pay,
            ration_pct: r.ration_pct,
            hull: link_inventory(from, "hull", &r.hull, ctx)?,
            cargo: link_inventory(from, "cargo", &r.cargo, ctx)?,
            factory_groups: group_keys(&ctx.factory_groups, r.id),
            farm_groups: group_keys(&ctx.farm_groups, r.id),
            mine_groups: group_keys(&ctx.mine_groups, r.id),
        };
        insert_unique(&mut cors, r.id, entry, EntityKind::Cors, RecordKey::id(r.id))?;
        hulls.insert(hull_id, r.id);
    }
    Ok((cors, hulls))
}

fn attach_group_owners(ctx: &LinkContext) -> Result<(), BuildError> {
    let owners = ctx
        .factory_groups
        .values()
        .map(|g| (EntityKind::FactoryGroup, g.key()))
        .chain(ctx.farm_groups.values().map(|g| (EntityKind::FarmGroup, g.key())))
        .chain(ctx.mine_groups.values().map(|g| (EntityKind::MineGroup, g.key())));
    for (entity, key) in owners {
        Referrer::new(entity, key.into()).require(&ctx.cors, "owner", EntityKind::Cors, key.cors)?;
    }
    Ok(())
}

fn resolve_deposit_controllers(
    mut deposits: BTreeMap<DepositId, Deposit>,
    cors: &BTreeMap<CorsId, Cors>,
) -> BTreeMap<DepositId, Deposit> {
    for deposit in deposits.values_mut() {
        let from = Referrer::new(EntityKind::Deposit, RecordKey::id(deposit.id));
        deposit.controlled_by =
            from.optional(cors, "controlled_by", EntityKind::Cors, deposit.controlled_by);
    }
    deposits
}

fn build_inverse_relations(ctx: &mut LinkContext) {
    for star in ctx.stars.values() {
        if let Some(system) = ctx.systems.get_mut(&star.system) {
            system.stars.push(star.id);
        }
    }
    for planet in ctx.planets.values() {
        if let Some(star) = ctx.stars.get_mut(&planet.star) {
            star.planets.push(planet.id);
        }
    }
    for deposit in ctx.deposits.values() {
        if let Some(planet) = ctx.planets.get_mut(&deposit.planet) {
            planet.deposits.push(deposit.id);
        }
    }
    for c in ctx.cors.values() {
        let is_colony = c.kind.is_colony();
        if let Some(planet) = ctx.planets.get_mut(&c.planet) {
            if is_colony {
                planet.colonies.push(c.id);
            } else {
                planet.ships.push(c.id);
            }
        }
        if let Some(player) = c.player.and_then(|p| ctx.players.get_mut(&p)) {
            if is_colony {
                player.colonies.push(c.id);
            } else {
                player.ships.push(c.id);
            }
        }
    }
    let memberships: Vec<(PlayerId, NationId, Option<PlayerId>)> = ctx
        .players
        .values()
        .map(|p| (p.id, p.nation, p.reports_to))
        .collect();
    for (id, nation, boss) in memberships {
        if let Some(nation) = ctx.nations.get_mut(&nation) {
            nation.players.push(id);
        }
        if let Some(boss) = boss.and_then(|b| ctx.players.get_mut(&b)) {
            boss.subordinates.push(id);
        }
    }
    for group in ctx.mine_groups.values() {
        if let Some(deposit) = ctx.deposits.get_mut(&group.deposit) {
            deposit.mine_groups.push(group.key());
        }
    }
    debug!("inverse relations built");
}

fn sort_children(ctx: &mut LinkContext) {
    for system in ctx.systems.values_mut() {
        system.stars.sort_unstable();
    }
    for star in ctx.stars.values_mut() {
        star.planets.sort_unstable();
    }
    for planet in ctx.planets.values_mut() {
        planet.deposits.sort_unstable();
        planet.colonies.sort_unstable();
        planet.ships.sort_unstable();
    }
    for deposit in ctx.deposits.values_mut() {
        deposit.mine_groups.sort_unstable();
    }
    for nation in ctx.nations.values_mut() {
        nation.players.sort_unstable();
    }
    for player in ctx.players.values_mut() {
        player.subordinates.sort_unstable();
        player.colonies.sort_unstable();
        player.ships.sort_unstable();
    }
    for c in ctx.cors.values_mut() {
        c.hull.sort_unstable_by_key(|l| (l.unit, l.operational, l.stowed));
        c.cargo.sort_unstable_by_key(|l| (l.unit, l.operational, l.stowed));
        c.factory_groups.sort_unstable();
        c.farm_groups.sort_unstable();
        c.mine_groups.sort_unstable();
    }
    for group in ctx.factory_groups.values_mut() {
        group.units.sort_unstable_by_key(|u| (u.unit, u.qty));
    }
    for group in ctx.farm_groups.values_mut() {
        group.units.sort_unstable_by_key(|u| (u.unit, u.qty));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::*;

    #[test]
    fn sibling_colonies_sort_by_id() {
        let mut snap = tiny_snapshot();
        snap.surface_colonies = vec![colony(5, 105, 1), colony(3, 103, 1)];
        let world = link(&snap).unwrap();
        let planet = world.planet(PlanetId(1)).unwrap();
        assert_eq!(planet.colonies, vec![CorsId(3), CorsId(5)]);
    }

    #[test]
    fn planet_star_and_system_agree() {
        let world = link(&tiny_snapshot()).unwrap();
        for planet in world.planets() {
            let star = world.star_of(planet).unwrap();
            assert_eq!(star.system, planet.system);
        }
    }

    #[test]
    fn mismatched_planet_system_fails() {
        let mut snap = tiny_snapshot();
        snap.systems.push(system(2));
        snap.planets[0].system = SystemId(2);
        let err = link(&snap).unwrap_err();
        assert_eq!(
            err,
            BuildError::InconsistentPlanet {
                planet: PlanetId(1),
                star: StarId(1),
                star_system: SystemId(1),
                planet_system: SystemId(2),
            }
        );
    }

    #[test]
    fn deposit_on_missing_planet_fails_with_entity_and_id() {
        let mut snap = tiny_snapshot();
        snap.deposits.push(deposit(8, 99, 1));
        let err = link(&snap).unwrap_err();
        assert_eq!(
            err,
            BuildError::DanglingReference {
                entity: EntityKind::Deposit,
                key: RecordKey::Id(8),
                field: "planet",
                target: EntityKind::Planet,
                target_id: 99,
            }
        );
    }

    fn dangling(
        entity: EntityKind,
        key: RecordKey,
        field: &'static str,
        target: EntityKind,
        target_id: i32,
    ) -> BuildError {
        BuildError::DanglingReference {
            entity,
            key,
            field,
            target,
            target_id,
        }
    }

    #[test]
    fn star_outside_any_system_fails() {
        let mut snap = tiny_snapshot();
        snap.stars.push(star(2, 9));
        assert_eq!(
            link(&snap).unwrap_err(),
            dangling(EntityKind::Star, RecordKey::Id(2), "system", EntityKind::System, 9)
        );
    }

    #[test]
    fn planet_needs_its_star_and_system() {
        let mut snap = tiny_snapshot();
        snap.planets.push(planet(2, 9, 1));
        assert_eq!(
            link(&snap).unwrap_err(),
            dangling(EntityKind::Planet, RecordKey::Id(2), "star", EntityKind::Star, 9)
        );

        let mut snap = tiny_snapshot();
        snap.planets.push(planet(2, 1, 9));
        assert_eq!(
            link(&snap).unwrap_err(),
            dangling(EntityKind::Planet, RecordKey::Id(2), "system", EntityKind::System, 9)
        );
    }

    #[test]
    fn deposit_of_unknown_unit_fails() {
        let mut snap = tiny_snapshot();
        snap.deposits.push(deposit(2, 1, 99));
        assert_eq!(
            link(&snap).unwrap_err(),
            dangling(EntityKind::Deposit, RecordKey::Id(2), "unit", EntityKind::Unit, 99)
        );
    }

    #[test]
    fn colony_on_missing_planet_fails() {
        let mut snap = tiny_snapshot();
        snap.surface_colonies.push(colony(4, 104, 99));
        assert_eq!(
            link(&snap).unwrap_err(),
            dangling(EntityKind::SurfaceColony, RecordKey::Id(4), "planet", EntityKind::Planet, 99)
        );
    }

    #[test]
    fn inventory_lines_need_catalog_units() {
        let mut snap = tiny_snapshot();
        let mut c = colony(4, 104, 1);
        c.hull = vec![line(99, 1, 0)];
        snap.orbital_colonies.push(c);
        assert_eq!(
            link(&snap).unwrap_err(),
            dangling(EntityKind::OrbitalColony, RecordKey::Id(4), "hull", EntityKind::Unit, 99)
        );

        let mut snap = tiny_snapshot();
        let mut c = colony(5, 105, 1);
        c.cargo = vec![line(1, 1, 0), line(98, 0, 3)];
        snap.ships.push(c);
        assert_eq!(
            link(&snap).unwrap_err(),
            dangling(EntityKind::Ship, RecordKey::Id(5), "cargo", EntityKind::Unit, 98)
        );
    }

    #[test]
    fn group_unit_lines_need_catalog_units() {
        let mut snap = tiny_snapshot();
        snap.surface_colonies.push(colony(3, 103, 1));
        snap.factory_groups.push(factory_group(3, 1, 99));
        assert_eq!(
            link(&snap).unwrap_err(),
            dangling(
                EntityKind::FactoryGroup,
                RecordKey::Group(GroupKey::new(CorsId(3), 1)),
                "units",
                EntityKind::Unit,
                99
            )
        );
    }

    #[test]
    fn mine_group_on_missing_deposit_fails() {
        let mut snap = tiny_snapshot();
        snap.surface_colonies.push(colony(3, 103, 1));
        snap.mine_groups.push(mine_group(3, 2, 99));
        assert_eq!(
            link(&snap).unwrap_err(),
            dangling(
                EntityKind::MineGroup,
                RecordKey::Group(GroupKey::new(CorsId(3), 2)),
                "deposit",
                EntityKind::Deposit,
                99
            )
        );
    }

    #[test]
    fn optional_references_resolve_to_absent() {
        let mut snap = tiny_snapshot();
        let mut c = colony(4, 104, 1);
        c.builder = Some(NationId(77));
        c.player = Some(PlayerId(77));
        snap.orbital_colonies.push(c);
        let mut d = deposit(2, 1, 1);
        d.controlled_by = Some(CorsId(55));
        snap.deposits.push(d);
        snap.players[0].reports_to = Some(PlayerId(42));

        let world = link(&snap).unwrap();
        let c = world.cors(CorsId(4)).unwrap();
        assert_eq!(c.builder, None);
        assert_eq!(c.player, None);
        assert_eq!(world.deposit(DepositId(2)).unwrap().controlled_by, None);
        assert_eq!(world.player(PlayerId(1)).unwrap().reports_to, None);
    }

    #[test]
    fn player_without_nation_fails() {
        let mut snap = tiny_snapshot();
        snap.players[0].nation = NationId(9);
        let err = link(&snap).unwrap_err();
        assert!(matches!(
            err,
            BuildError::DanglingReference {
                entity: EntityKind::Player,
                field: "nation",
                target_id: 9,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_hull_ids_fail() {
        let mut snap = tiny_snapshot();
        snap.ships.push(colony(6, 11, 1));
        snap.ships.push(colony(2, 11, 1));
        let err = link(&snap).unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateHullId {
                hull: "SH-11".to_string(),
                first: CorsId(2),
                second: CorsId(6),
            }
        );
    }

    #[test]
    fn same_serial_in_different_placements_is_allowed() {
        let mut snap = tiny_snapshot();
        snap.ships.push(colony(6, 11, 1));
        snap.surface_colonies.push(colony(2, 11, 1));
        let world = link(&snap).unwrap();
        assert_eq!(world.cors_by_hull("SH-11").unwrap().id, CorsId(6));
        assert_eq!(world.cors_by_hull("SC-11").unwrap().id, CorsId(2));
        assert_eq!(world.planet(PlanetId(1)).unwrap().ships, vec![CorsId(6)]);
    }

    #[test]
    fn duplicate_ids_across_placements_fail() {
        let mut snap = tiny_snapshot();
        snap.ships.push(colony(6, 11, 1));
        snap.surface_colonies.push(colony(6, 12, 1));
        let err = link(&snap).unwrap_err();
        assert_eq!(err, BuildError::duplicate(EntityKind::Cors, RecordKey::Id(6)));
    }

    #[test]
    fn groups_attach_to_owner_and_deposit() {
        let mut snap = tiny_snapshot();
        snap.surface_colonies.push(colony(3, 103, 1));
        snap.deposits.push(deposit(2, 1, 1));
        snap.mine_groups.push(mine_group(3, 2, 2));
        snap.mine_groups.push(mine_group(3, 1, 2));
        snap.factory_groups.push(factory_group(3, 1, 1));
        let world = link(&snap).unwrap();
        let c = world.cors(CorsId(3)).unwrap();
        assert_eq!(
            c.mine_groups,
            vec![GroupKey::new(CorsId(3), 1), GroupKey::new(CorsId(3), 2)]
        );
        assert_eq!(c.factory_groups, vec![GroupKey::new(CorsId(3), 1)]);
        assert_eq!(world.deposit(DepositId(2)).unwrap().mine_groups.len(), 2);
    }

    #[test]
    fn group_without_owner_fails() {
        let mut snap = tiny_snapshot();
        snap.factory_groups.push(factory_group(40, 1, 1));
        let err = link(&snap).unwrap_err();
        assert_eq!(
            err,
            BuildError::DanglingReference {
                entity: EntityKind::FactoryGroup,
                key: RecordKey::Group(GroupKey::new(CorsId(40), 1)),
                field: "owner",
                target: EntityKind::Cors,
                target_id: 40,
            }
        );
    }

    #[test]
    fn reports_to_chain_builds_subordinates() {
        let mut snap = tiny_snapshot();
        snap.players.push(player(2, 1, Some(1)));
        snap.players.push(player(3, 1, Some(2)));
        let world = link(&snap).unwrap();
        assert_eq!(world.player(PlayerId(1)).unwrap().subordinates, vec![PlayerId(2)]);
        assert_eq!(
            world.chain_of_command(PlayerId(3)),
            vec![PlayerId(3), PlayerId(2), PlayerId(1)]
        );
        assert_eq!(
            world.nation(NationId(1)).unwrap().players,
            vec![PlayerId(1), PlayerId(2), PlayerId(3)]
        );
    }

    #[test]
    fn cyclic_reports_to_chain_terminates() {
        let mut snap = tiny_snapshot();
        snap.players[0].reports_to = Some(PlayerId(2));
        snap.players.push(player(2, 1, Some(1)));
        let world = link(&snap).unwrap();
        assert_eq!(world.chain_of_command(PlayerId(1)), vec![PlayerId(1), PlayerId(2)]);
    }

    #[test]
    fn unknown_unit_kind_is_reported_with_unit_id() {
        let mut snap = tiny_snapshot();
        snap.units.push(unit(12, "warp-core", 1));
        let err = link(&snap).unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownUnitKind {
                unit: UnitId(12),
                kind: "warp-core".to_string(),
            }
        );
    }

    #[test]
    fn tech_level_below_one_is_reported_with_unit_id() {
        let mut snap = tiny_snapshot();
        snap.units.push(unit(12, "factory", 0));
        assert_eq!(
            link(&snap).unwrap_err(),
            BuildError::InvalidTechLevel {
                unit: UnitId(12),
                tech_level: 0,
            }
        );
    }

    #[test]
    fn unit_economics_are_derived() {
        let world = link(&tiny_snapshot()).unwrap();
        let u = world.unit(UnitId(1)).unwrap();
        assert_eq!(u.kind, UnitKind::Metallics);
        assert_eq!(u.economics, ec_econ::economics("metallics", 1).unwrap());
    }
}
