#![allow(dead_code)]

use ec_core::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

pub const GAME: &str = "EC-TEST";

pub fn unit(id: i32, kind: &str, tech_level: i32) -> UnitRecord {
    UnitRecord {
        id: UnitId(id),
        kind: kind.to_string(),
        code: format!("U{id}-{tech_level}"),
        tech_level,
        mass: Decimal::new(i64::from(id), 1),
        volume: Decimal::new(i64::from(id) * 2, 1),
    }
}

pub const METALLICS: i32 = 1;
pub const NON_METALLICS: i32 = 2;
pub const FUEL: i32 = 3;
pub const LIFE_SUPPORT: i32 = 4;
pub const CONSUMER_GOODS: i32 = 5;
pub const FACTORY: i32 = 6;
pub const FARM: i32 = 7;
pub const SPACE_DRIVE: i32 = 8;

fn catalog() -> Vec<UnitRecord> {
    vec![
        unit(METALLICS, "metallics", 1),
        unit(NON_METALLICS, "non-metallics", 1),
        unit(FUEL, "fuel", 1),
        unit(LIFE_SUPPORT, "life-support", 1),
        unit(CONSUMER_GOODS, "consumer-goods", 1),
        unit(FACTORY, "factory", 2),
        unit(FARM, "farm", 7),
        unit(SPACE_DRIVE, "space-drive", 3),
    ]
}

fn push_cors(
    rows: &mut SourceRows,
    id: i32,
    kind: CorsKind,
    msn: i32,
    planet: i32,
    player: i32,
    builder: Option<i32>,
) {
    let cors = CorsId(id);
    rows.cors.push(CorsRow {
        id: cors,
        kind,
        msn,
        builder: builder.map(NationId),
        player: Some(PlayerId(player)),
    });
    rows.populations.push(CorsPopulationRow {
        cors,
        population: Population {
            professional: 100 * i64::from(msn),
            soldier: 50,
            unskilled: 200,
            unemployed: 50,
        },
    });
    rows.pay.push(CorsPayRow {
        cors,
        rates: PayRates {
            professional: Decimal::new(1250, 2),
            soldier: Decimal::new(9, 0),
            unskilled: Decimal::new(5, 0),
        },
    });
    rows.rations.push(CorsRationRow {
        cors,
        ration_pct: Decimal::new(100, 0),
    });
    rows.locations.push(CorsLocationRow {
        cors,
        planet: PlanetId(planet),
    });
}

fn push_line(rows: &mut SourceRows, cors: i32, bay: Bay, unit: i32, operational: i64, stowed: i64) {
    rows.inventory.push(InventoryRow {
        cors: CorsId(cors),
        bay,
        line: InventoryRecord {
            unit: UnitId(unit),
            operational,
            stowed,
        },
    });
}

/// A consistent galaxy of `systems` systems, each with one star, three
/// planets, a surface colony, an orbital colony and a ship. The ship of
/// system 2 has no pay row and is dropped by extraction.
pub fn galaxy(systems: i32) -> SourceRows {
    let mut rows = SourceRows {
        units: catalog(),
        ..SourceRows::default()
    };
    rows.nations = (1..=2)
        .map(|id| NationRecord {
            id: NationId(id),
            name: format!("Nation {id}"),
            home_planet: None,
            player: Some(PlayerId(id)),
            speciality: "mining".to_string(),
            tech_level: id,
            research_points: 10 * i64::from(id),
        })
        .collect();
    rows.players = (1..=4)
        .map(|id| PlayerRecord {
            id: PlayerId(id),
            name: format!("player-{id}"),
            nation: NationId((id - 1) % 2 + 1),
            reports_to: (id > 2).then(|| PlayerId(id - 2)),
        })
        .collect();

    for s in 1..=systems {
        rows.systems.push(SystemRecord {
            id: SystemId(s),
            x: s,
            y: 30 - s,
            z: s % 7,
        });
        rows.stars.push(StarRecord {
            id: StarId(s),
            system: SystemId(s),
            sequence: "A".to_string(),
            kind: "yellow".to_string(),
        });
        for k in 1..=3 {
            let p = (s - 1) * 3 + k;
            rows.planets.push(PlanetRecord {
                id: PlanetId(p),
                star: StarId(s),
                system: SystemId(s),
                orbit: k,
                kind: if k == 3 { "gas-giant" } else { "terrestrial" }.to_string(),
                habitability: 25 - 5 * k,
            });
            rows.deposits.push(DepositRecord {
                id: DepositId(p),
                planet: PlanetId(p),
                unit: UnitId(1 + p % 3),
                initial_qty: 10_000,
                remaining_qty: 10_000 - i64::from(p),
                yield_pct: Decimal::new(i64::from(20 + p % 50), 0),
                controlled_by: (k == 1).then(|| CorsId(10 * s + 1)),
            });
        }

        let home = (s - 1) * 3 + 1;
        let player = (s - 1) % 4 + 1;
        let builder = (s % 2 == 0).then(|| (player - 1) % 2 + 1);
        push_cors(&mut rows, 10 * s + 1, CorsKind::SurfaceColony, s, home, player, builder);
        push_cors(&mut rows, 10 * s + 2, CorsKind::OrbitalColony, s, home, player, builder);
        push_cors(&mut rows, 10 * s + 3, CorsKind::Ship, s, home + 1, player, None);

        push_line(&mut rows, 10 * s + 2, Bay::Hull, LIFE_SUPPORT, 10, 0);
        push_line(&mut rows, 10 * s + 2, Bay::Cargo, CONSUMER_GOODS, 5, 5);
        push_line(&mut rows, 10 * s + 2, Bay::Cargo, FUEL, 100, 0);
        push_line(&mut rows, 10 * s + 3, Bay::Hull, SPACE_DRIVE, 4, 0);
        push_line(&mut rows, 10 * s + 3, Bay::Cargo, METALLICS, 0, 250);

        for group_no in 1..=2 {
            rows.factory_groups.push(FactoryGroupRecord {
                cors: CorsId(10 * s + 1),
                group_no,
                units: vec![GroupUnitRecord {
                    unit: UnitId(FACTORY),
                    qty: 20 * i64::from(group_no),
                }],
                stages: [i64::from(s), 0, 2, 1],
            });
        }
        rows.farm_groups.push(FarmGroupRecord {
            cors: CorsId(10 * s + 1),
            group_no: 1,
            units: vec![GroupUnitRecord {
                unit: UnitId(FARM),
                qty: 15,
            }],
            stages: [0, 0, 0, 30],
        });
        rows.mine_groups.push(MineGroupRecord {
            cors: CorsId(10 * s + 1),
            group_no: 1,
            deposit: DepositId(home),
            stages: [0, 3, 0, 0],
        });
        rows.mine_groups.push(MineGroupRecord {
            cors: CorsId(10 * s + 3),
            group_no: 1,
            deposit: DepositId(home + 1),
            stages: [0, 0, 0, 0],
        });
    }

    if systems >= 2 {
        rows.pay.retain(|r| r.cors != CorsId(23));
    }
    rows
}

pub fn source(rows: SourceRows, from: TurnKey) -> MemorySource {
    let mut src = MemorySource::new(GameCode::from(GAME));
    src.insert(from, rows);
    src
}

/// Shuffle every row collection with a seeded generator.
pub fn shuffled(mut rows: SourceRows, seed: u64) -> SourceRows {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rows.units.shuffle(&mut rng);
    rows.systems.shuffle(&mut rng);
    rows.stars.shuffle(&mut rng);
    rows.planets.shuffle(&mut rng);
    rows.deposits.shuffle(&mut rng);
    rows.nations.shuffle(&mut rng);
    rows.players.shuffle(&mut rng);
    rows.cors.shuffle(&mut rng);
    rows.populations.shuffle(&mut rng);
    rows.pay.shuffle(&mut rng);
    rows.rations.shuffle(&mut rng);
    rows.locations.shuffle(&mut rng);
    rows.inventory.shuffle(&mut rng);
    rows.factory_groups.shuffle(&mut rng);
    rows.farm_groups.shuffle(&mut rng);
    rows.mine_groups.shuffle(&mut rng);
    rows
}
