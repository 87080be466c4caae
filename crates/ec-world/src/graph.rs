//! The linked world graph.
//!
//! Entities live in per-type arenas keyed by id. Relations are stored as ids
//! that are guaranteed to resolve in the same [`World`]; inverse lists are
//! derived once during linking and sorted ascending.

use ec_core::{
    CorsId, CorsKind, DepositId, GameCode, GroupKey, GroupUnitRecord, InventoryRecord, NationId,
    PayRates, PlanetId, PlayerId, Population, StarId, SystemId, TurnKey, UnitId,
};
use ec_econ::{UnitEconomics, UnitKind};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Catalog unit with its derived cost profile.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub code: String,
    pub tech_level: i32,
    pub mass: Decimal,
    pub volume: Decimal,
    /// Recomputed from `kind` and `tech_level` on every link.
    pub economics: UnitEconomics,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct System {
    pub id: SystemId,
    pub coords: Coords,
    pub stars: Vec<StarId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub id: StarId,
    pub system: SystemId,
    pub sequence: String,
    pub kind: String,
    pub planets: Vec<PlanetId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Planet {
    pub id: PlanetId,
    pub star: StarId,
    /// Always equal to the star's system.
    pub system: SystemId,
    pub orbit: i32,
    pub kind: String,
    pub habitability: i32,
    pub deposits: Vec<DepositId>,
    /// Colonies of every placement located here.
    pub colonies: Vec<CorsId>,
    pub ships: Vec<CorsId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Deposit {
    pub id: DepositId,
    pub planet: PlanetId,
    pub unit: UnitId,
    pub initial_qty: i64,
    pub remaining_qty: i64,
    pub yield_pct: Decimal,
    pub controlled_by: Option<CorsId>,
    /// Mine groups working this deposit.
    pub mine_groups: Vec<GroupKey>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Nation {
    pub id: NationId,
    pub name: String,
    pub home_planet: Option<PlanetId>,
    pub player: Option<PlayerId>,
    pub speciality: String,
    pub tech_level: i32,
    pub research_points: i64,
    /// Players belonging to the nation.
    pub players: Vec<PlayerId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub nation: NationId,
    pub reports_to: Option<PlayerId>,
    /// Players reporting directly to this one.
    pub subordinates: Vec<PlayerId>,
    pub colonies: Vec<CorsId>,
    pub ships: Vec<CorsId>,
}

/// A colony or ship.
#[derive(Clone, Debug, PartialEq)]
pub struct Cors {
    pub id: CorsId,
    pub kind: CorsKind,
    pub msn: i32,
    /// Type prefix plus serial number, unique across the world.
    pub hull_id: String,
    pub builder: Option<NationId>,
    pub player: Option<PlayerId>,
    pub planet: PlanetId,
    pub population: Population,
    pub pay: PayRates,
    pub ration_pct: Decimal,
    pub hull: Vec<InventoryRecord>,
    pub cargo: Vec<InventoryRecord>,
    pub factory_groups: Vec<GroupKey>,
    pub farm_groups: Vec<GroupKey>,
    pub mine_groups: Vec<GroupKey>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FactoryGroup {
    pub owner: CorsId,
    pub group_no: i32,
    pub units: Vec<GroupUnitRecord>,
    pub stages: [i64; 4],
}

#[derive(Clone, Debug, PartialEq)]
pub struct FarmGroup {
    pub owner: CorsId,
    pub group_no: i32,
    pub units: Vec<GroupUnitRecord>,
    pub stages: [i64; 4],
}

#[derive(Clone, Debug, PartialEq)]
pub struct MineGroup {
    pub owner: CorsId,
    pub group_no: i32,
    pub deposit: DepositId,
    pub stages: [i64; 4],
}

impl FactoryGroup {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.owner, self.group_no)
    }
}

impl FarmGroup {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.owner, self.group_no)
    }
}

impl MineGroup {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.owner, self.group_no)
    }
}

/// Entity counts, for logging.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldSummary {
    pub units: usize,
    pub systems: usize,
    pub stars: usize,
    pub planets: usize,
    pub deposits: usize,
    pub nations: usize,
    pub players: usize,
    pub colonies: usize,
    pub ships: usize,
    pub factory_groups: usize,
    pub farm_groups: usize,
    pub mine_groups: usize,
}

/// A fully linked game state for one turn. Built by [`crate::link`]; never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub(crate) game: GameCode,
    pub(crate) turn: TurnKey,
    pub(crate) units: BTreeMap<UnitId, Unit>,
    pub(crate) systems: BTreeMap<SystemId, System>,
    pub(crate) stars: BTreeMap<StarId, Star>,
    pub(crate) planets: BTreeMap<PlanetId, Planet>,
    pub(crate) deposits: BTreeMap<DepositId, Deposit>,
    pub(crate) nations: BTreeMap<NationId, Nation>,
    pub(crate) players: BTreeMap<PlayerId, Player>,
    pub(crate) cors: BTreeMap<CorsId, Cors>,
    pub(crate) factory_groups: BTreeMap<GroupKey, FactoryGroup>,
    pub(crate) farm_groups: BTreeMap<GroupKey, FarmGroup>,
    pub(crate) mine_groups: BTreeMap<GroupKey, MineGroup>,
    pub(crate) hulls: BTreeMap<String, CorsId>,
}

impl World {
    pub fn game(&self) -> &GameCode {
        &self.game
    }

    pub fn turn(&self) -> TurnKey {
        self.turn
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn system(&self, id: SystemId) -> Option<&System> {
        self.systems.get(&id)
    }

    pub fn star(&self, id: StarId) -> Option<&Star> {
        self.stars.get(&id)
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(&id)
    }

    pub fn deposit(&self, id: DepositId) -> Option<&Deposit> {
        self.deposits.get(&id)
    }

    pub fn nation(&self, id: NationId) -> Option<&Nation> {
        self.nations.get(&id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn cors(&self, id: CorsId) -> Option<&Cors> {
        self.cors.get(&id)
    }

    pub fn factory_group(&self, key: GroupKey) -> Option<&FactoryGroup> {
        self.factory_groups.get(&key)
    }

    pub fn farm_group(&self, key: GroupKey) -> Option<&FarmGroup> {
        self.farm_groups.get(&key)
    }

    pub fn mine_group(&self, key: GroupKey) -> Option<&MineGroup> {
        self.mine_groups.get(&key)
    }

    /// Look up a colony or ship by hull identifier, e.g. "OC-17".
    pub fn cors_by_hull(&self, hull_id: &str) -> Option<&Cors> {
        self.hulls.get(hull_id).and_then(|id| self.cors.get(id))
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn systems(&self) -> impl Iterator<Item = &System> {
        self.systems.values()
    }

    pub fn stars(&self) -> impl Iterator<Item = &Star> {
        self.stars.values()
    }

    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.values()
    }

    pub fn deposits(&self) -> impl Iterator<Item = &Deposit> {
        self.deposits.values()
    }

    pub fn nations(&self) -> impl Iterator<Item = &Nation> {
        self.nations.values()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Every colony and ship, ascending by id.
    pub fn all_cors(&self) -> impl Iterator<Item = &Cors> {
        self.cors.values()
    }

    pub fn factory_groups(&self) -> impl Iterator<Item = &FactoryGroup> {
        self.factory_groups.values()
    }

    pub fn farm_groups(&self) -> impl Iterator<Item = &FarmGroup> {
        self.farm_groups.values()
    }

    pub fn mine_groups(&self) -> impl Iterator<Item = &MineGroup> {
        self.mine_groups.values()
    }

    /// The star a planet orbits.
    pub fn star_of(&self, planet: &Planet) -> Option<&Star> {
        self.stars.get(&planet.star)
    }

    /// The player followed by everyone above them in the reports-to chain.
    /// Stops before revisiting a player, so cyclic chains terminate.
    pub fn chain_of_command(&self, player: PlayerId) -> Vec<PlayerId> {
        let mut chain = Vec::new();
        let mut seen = BTreeSet::new();
        let mut next = self.players.get(&player).map(|p| p.id);
        while let Some(id) = next {
            if !seen.insert(id) {
                break;
            }
            chain.push(id);
            next = self.players.get(&id).and_then(|p| p.reports_to);
        }
        chain
    }

    pub fn summary(&self) -> WorldSummary {
        let colonies = self.cors.values().filter(|c| c.kind.is_colony()).count();
        WorldSummary {
            units: self.units.len(),
            systems: self.systems.len(),
            stars: self.stars.len(),
            planets: self.planets.len(),
            deposits: self.deposits.len(),
            nations: self.nations.len(),
            players: self.players.len(),
            colonies,
            ships: self.cors.len() - colonies,
            factory_groups: self.factory_groups.len(),
            farm_groups: self.farm_groups.len(),
            mine_groups: self.mine_groups.len(),
        }
    }
}
