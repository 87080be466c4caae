//! Normalized per-entity records: scalar fields plus raw integer references.

use crate::ids::{
    CorsId, DepositId, GroupKey, NationId, PlanetId, PlayerId, StarId, SystemId, UnitId,
};
use crate::turn::{GameCode, TurnKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

fn is_zero_decimal(v: &Decimal) -> bool {
    v.is_zero()
}

fn is_zero_stages(v: &[i64; 4]) -> bool {
    v.iter().all(|q| *q == 0)
}

/// Unit catalog entry. Derived economics are computed from `kind` and
/// `tech_level`, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: UnitId,
    /// Kind name, e.g. "factory" or "life-support".
    pub kind: String,
    /// Display code, e.g. "FCT-2".
    pub code: String,
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    pub tech_level: i32,
    /// Mass per item.
    #[serde(default, skip_serializing_if = "is_zero_decimal")]
    pub mass: Decimal,
    /// Volume per item.
    #[serde(default, skip_serializing_if = "is_zero_decimal")]
    pub volume: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub id: SystemId,
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    pub x: i32,
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    pub y: i32,
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    pub z: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    pub id: StarId,
    pub system: SystemId,
    /// Sequence label within the system, e.g. "A".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sequence: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    pub id: PlanetId,
    pub star: StarId,
    pub system: SystemId,
    /// Orbit position around the star, 1-based.
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    pub orbit: i32,
    /// Terrain kind, e.g. "terrestrial" or "gas-giant".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    pub habitability: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub id: DepositId,
    pub planet: PlanetId,
    /// Resource unit extracted from this deposit.
    pub unit: UnitId,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub initial_qty: i64,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub remaining_qty: i64,
    #[serde(default, skip_serializing_if = "is_zero_decimal")]
    pub yield_pct: Decimal,
    /// Colony or ship currently mining the deposit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controlled_by: Option<CorsId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NationRecord {
    pub id: NationId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_planet: Option<PlanetId>,
    /// Controlling player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub speciality: String,
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    pub tech_level: i32,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub research_points: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub nation: NationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_to: Option<PlayerId>,
}

/// Placement of a colony-or-ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorsKind {
    SurfaceColony,
    EnclosedColony,
    OrbitalColony,
    Ship,
}

impl CorsKind {
    pub const ALL: [CorsKind; 4] = [
        CorsKind::SurfaceColony,
        CorsKind::EnclosedColony,
        CorsKind::OrbitalColony,
        CorsKind::Ship,
    ];

    /// Hull identifier prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            CorsKind::SurfaceColony => "SC",
            CorsKind::EnclosedColony => "EC",
            CorsKind::OrbitalColony => "OC",
            CorsKind::Ship => "SH",
        }
    }

    pub fn is_colony(self) -> bool {
        !matches!(self, CorsKind::Ship)
    }

    /// Hull identifier for a manufacturer serial number, e.g. "OC-17".
    pub fn hull_id(self, msn: i32) -> String {
        format!("{}-{}", self.prefix(), msn)
    }
}

/// Population breakdown of a colony or ship crew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub professional: i64,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub soldier: i64,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub unskilled: i64,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub unemployed: i64,
}

impl Population {
    /// Head count across all groups. Saturates at the `i64` bounds.
    pub fn total(&self) -> i64 {
        self.professional
            .saturating_add(self.soldier)
            .saturating_add(self.unskilled)
            .saturating_add(self.unemployed)
    }

    pub fn is_empty(&self) -> bool {
        *self == Population::default()
    }
}

/// Pay rates as percentages of the base wage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PayRates {
    #[serde(default, skip_serializing_if = "is_zero_decimal")]
    pub professional: Decimal,
    #[serde(default, skip_serializing_if = "is_zero_decimal")]
    pub soldier: Decimal,
    #[serde(default, skip_serializing_if = "is_zero_decimal")]
    pub unskilled: Decimal,
}

impl PayRates {
    pub fn is_zero(&self) -> bool {
        self.professional.is_zero() && self.soldier.is_zero() && self.unskilled.is_zero()
    }
}

/// One inventory line in a hull or cargo hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub unit: UnitId,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub operational: i64,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub stowed: i64,
}

impl InventoryRecord {
    pub fn total(&self) -> i64 {
        self.operational.saturating_add(self.stowed)
    }
}

/// A joined colony-or-ship. The placement is implied by the snapshot table
/// holding the record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorsRecord {
    pub id: CorsId,
    /// Manufacturer serial number.
    pub msn: i32,
    /// Nation that built the hull.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder: Option<NationId>,
    /// Controlling player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerId>,
    /// Location.
    pub planet: PlanetId,
    #[serde(default, skip_serializing_if = "Population::is_empty")]
    pub population: Population,
    #[serde(default, skip_serializing_if = "PayRates::is_zero")]
    pub pay: PayRates,
    #[serde(default, skip_serializing_if = "is_zero_decimal")]
    pub ration_pct: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hull: Vec<InventoryRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cargo: Vec<InventoryRecord>,
}

/// Units contributing to a factory or farm group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUnitRecord {
    pub unit: UnitId,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub qty: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryGroupRecord {
    pub cors: CorsId,
    pub group_no: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<GroupUnitRecord>,
    /// Work-in-progress quantities for the four production stages.
    #[serde(default, skip_serializing_if = "is_zero_stages")]
    pub stages: [i64; 4],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmGroupRecord {
    pub cors: CorsId,
    pub group_no: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<GroupUnitRecord>,
    #[serde(default, skip_serializing_if = "is_zero_stages")]
    pub stages: [i64; 4],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineGroupRecord {
    pub cors: CorsId,
    pub group_no: i32,
    pub deposit: DepositId,
    #[serde(default, skip_serializing_if = "is_zero_stages")]
    pub stages: [i64; 4],
}

impl FactoryGroupRecord {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.cors, self.group_no)
    }
}

impl FarmGroupRecord {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.cors, self.group_no)
    }
}

impl MineGroupRecord {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.cors, self.group_no)
    }
}

/// The normalized record set describing one game at one turn.
///
/// `game` and `turn` are not part of the serialized table body; the snapshot
/// file carries them in its header.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(skip)]
    pub game: GameCode,
    #[serde(skip)]
    pub turn: TurnKey,
    #[serde(default)]
    pub deposits: Vec<DepositRecord>,
    #[serde(default)]
    pub surface_colonies: Vec<CorsRecord>,
    #[serde(default)]
    pub enclosed_colonies: Vec<CorsRecord>,
    #[serde(default)]
    pub orbital_colonies: Vec<CorsRecord>,
    #[serde(default)]
    pub factory_groups: Vec<FactoryGroupRecord>,
    #[serde(default)]
    pub farm_groups: Vec<FarmGroupRecord>,
    #[serde(default)]
    pub mine_groups: Vec<MineGroupRecord>,
    #[serde(default)]
    pub nations: Vec<NationRecord>,
    #[serde(default)]
    pub planets: Vec<PlanetRecord>,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
    #[serde(default)]
    pub ships: Vec<CorsRecord>,
    #[serde(default)]
    pub units: Vec<UnitRecord>,
    #[serde(default)]
    pub stars: Vec<StarRecord>,
    #[serde(default)]
    pub systems: Vec<SystemRecord>,
}

impl Snapshot {
    pub fn new(game: GameCode, turn: TurnKey) -> Self {
        Self {
            game,
            turn,
            ..Self::default()
        }
    }

    /// The table holding colonies-or-ships of the given placement.
    pub fn cors_table(&self, kind: CorsKind) -> &[CorsRecord] {
        match kind {
            CorsKind::SurfaceColony => &self.surface_colonies,
            CorsKind::EnclosedColony => &self.enclosed_colonies,
            CorsKind::OrbitalColony => &self.orbital_colonies,
            CorsKind::Ship => &self.ships,
        }
    }

    pub fn cors_table_mut(&mut self, kind: CorsKind) -> &mut Vec<CorsRecord> {
        match kind {
            CorsKind::SurfaceColony => &mut self.surface_colonies,
            CorsKind::EnclosedColony => &mut self.enclosed_colonies,
            CorsKind::OrbitalColony => &mut self.orbital_colonies,
            CorsKind::Ship => &mut self.ships,
        }
    }

    /// All colonies and ships with their placement, table by table.
    pub fn cors(&self) -> impl Iterator<Item = (CorsKind, &CorsRecord)> + '_ {
        CorsKind::ALL
            .into_iter()
            .flat_map(move |kind| self.cors_table(kind).iter().map(move |c| (kind, c)))
    }

    /// Sort every table ascending by id (groups by owner, then group number)
    /// and every nested line list by unit id.
    pub fn normalize(&mut self) {
        self.units.sort_by_key(|r| r.id);
        self.systems.sort_by_key(|r| r.id);
        self.stars.sort_by_key(|r| r.id);
        self.planets.sort_by_key(|r| r.id);
        self.deposits.sort_by_key(|r| r.id);
        self.nations.sort_by_key(|r| r.id);
        self.players.sort_by_key(|r| r.id);
        for kind in CorsKind::ALL {
            let table = self.cors_table_mut(kind);
            table.sort_by_key(|r| r.id);
            for cors in table.iter_mut() {
                cors.hull.sort_by_key(line_order);
                cors.cargo.sort_by_key(line_order);
            }
        }
        self.factory_groups.sort_by_key(|g| g.key());
        for g in &mut self.factory_groups {
            g.units.sort_by_key(|u| (u.unit, u.qty));
        }
        self.farm_groups.sort_by_key(|g| g.key());
        for g in &mut self.farm_groups {
            g.units.sort_by_key(|u| (u.unit, u.qty));
        }
        self.mine_groups.sort_by_key(|g| g.key());
    }
}

fn line_order(line: &InventoryRecord) -> (UnitId, i64, i64) {
    (line.unit, line.operational, line.stowed)
}
