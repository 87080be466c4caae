//! Record builders shared by the unit tests.

#![allow(dead_code)]

use ec_core::{
    CorsId, CorsRecord, DepositId, DepositRecord, FactoryGroupRecord, GameCode, GroupUnitRecord,
    InventoryRecord, MineGroupRecord, NationId, NationRecord, PayRates, PlanetId, PlanetRecord,
    PlayerId, PlayerRecord, Population, Snapshot, StarId, StarRecord, SystemId, SystemRecord,
    TurnKey, UnitId, UnitRecord,
};
use rust_decimal::Decimal;

pub fn unit(id: i32, kind: &str, tech_level: i32) -> UnitRecord {
    UnitRecord {
        id: UnitId(id),
        kind: kind.to_string(),
        code: format!("{}-{}", kind.to_uppercase(), tech_level),
        tech_level,
        mass: Decimal::ONE,
        volume: Decimal::ONE,
    }
}

pub fn system(id: i32) -> SystemRecord {
    SystemRecord {
        id: SystemId(id),
        x: id,
        y: 2 * id,
        z: 3 * id,
    }
}

pub fn star(id: i32, system: i32) -> StarRecord {
    StarRecord {
        id: StarId(id),
        system: SystemId(system),
        sequence: "A".to_string(),
        kind: "yellow".to_string(),
    }
}

pub fn planet(id: i32, star: i32, system: i32) -> PlanetRecord {
    PlanetRecord {
        id: PlanetId(id),
        star: StarId(star),
        system: SystemId(system),
        orbit: id,
        kind: "terrestrial".to_string(),
        habitability: 20,
    }
}

pub fn deposit(id: i32, planet: i32, unit: i32) -> DepositRecord {
    DepositRecord {
        id: DepositId(id),
        planet: PlanetId(planet),
        unit: UnitId(unit),
        initial_qty: 1_000,
        remaining_qty: 900,
        yield_pct: Decimal::new(45, 0),
        controlled_by: None,
    }
}

pub fn nation(id: i32) -> NationRecord {
    NationRecord {
        id: NationId(id),
        name: format!("Nation {id}"),
        home_planet: None,
        player: None,
        speciality: "industry".to_string(),
        tech_level: 1,
        research_points: 0,
    }
}

pub fn player(id: i32, nation: i32, reports_to: Option<i32>) -> PlayerRecord {
    PlayerRecord {
        id: PlayerId(id),
        name: format!("player-{id}"),
        nation: NationId(nation),
        reports_to: reports_to.map(PlayerId),
    }
}

pub fn colony(id: i32, msn: i32, planet: i32) -> CorsRecord {
    CorsRecord {
        id: CorsId(id),
        msn,
        builder: None,
        player: None,
        planet: PlanetId(planet),
        population: Population::default(),
        pay: PayRates::default(),
        ration_pct: Decimal::new(100, 0),
        hull: Vec::new(),
        cargo: Vec::new(),
    }
}

pub fn line(unit: i32, operational: i64, stowed: i64) -> InventoryRecord {
    InventoryRecord {
        unit: UnitId(unit),
        operational,
        stowed,
    }
}

pub fn factory_group(cors: i32, group_no: i32, unit: i32) -> FactoryGroupRecord {
    FactoryGroupRecord {
        cors: CorsId(cors),
        group_no,
        units: vec![GroupUnitRecord {
            unit: UnitId(unit),
            qty: 10,
        }],
        stages: [1, 2, 3, 4],
    }
}

pub fn mine_group(cors: i32, group_no: i32, deposit: i32) -> MineGroupRecord {
    MineGroupRecord {
        cors: CorsId(cors),
        group_no,
        deposit: DepositId(deposit),
        stages: [0, 0, 0, 5],
    }
}

/// One system, star, planet, nation and player, plus a metallics unit.
pub fn tiny_snapshot() -> Snapshot {
    let mut snap = Snapshot::new(GameCode::from("T"), TurnKey::new(1, 1));
    snap.units = vec![unit(1, "metallics", 1)];
    snap.systems = vec![system(1)];
    snap.stars = vec![star(1, 1)];
    snap.planets = vec![planet(1, 1, 1)];
    snap.nations = vec![nation(1)];
    snap.players = vec![player(1, 1, None)];
    snap
}
