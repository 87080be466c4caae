#![deny(warnings)]

//! Unit economics: per-unit resource costs derived from kind and tech level.
//!
//! Every catalog unit has a fixed cost profile:
//! - metallics and non-metallics needed to build one unit
//! - total mass units (the sum of the two)
//! - fuel burned per unit per turn while operational
//! - fuel burned per unit per combat round
//!
//! Costs are plain functions of the kind and the tech level. Most kinds are
//! linear in tech level, a few are flat, drives burn fuel quadratically, and
//! farms switch formulas at tech levels 6 and 10.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced by the economics table.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Kind name is not in the unit table.
    #[error("unknown unit kind: {0:?}")]
    UnknownUnitKind(String),
    /// Tech levels start at 1.
    #[error("invalid tech level {tech_level} for {kind}")]
    InvalidTechLevel { kind: UnitKind, tech_level: i32 },
}

/// Kinds of catalog units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    AntiMissile,
    AssaultCraft,
    AssaultWeapon,
    Automation,
    ConsumerGoods,
    EnergyShield,
    EnergyWeapon,
    Factory,
    Farm,
    Food,
    Fuel,
    Gold,
    HyperEngine,
    LifeSupport,
    LightStructural,
    Metallics,
    MilitaryRobot,
    MilitarySupplies,
    Mine,
    Missile,
    MissileLauncher,
    NonMetallics,
    Sensor,
    SpaceDrive,
    Structural,
    Transport,
}

impl UnitKind {
    pub const ALL: [UnitKind; 26] = [
        UnitKind::AntiMissile,
        UnitKind::AssaultCraft,
        UnitKind::AssaultWeapon,
        UnitKind::Automation,
        UnitKind::ConsumerGoods,
        UnitKind::EnergyShield,
        UnitKind::EnergyWeapon,
        UnitKind::Factory,
        UnitKind::Farm,
        UnitKind::Food,
        UnitKind::Fuel,
        UnitKind::Gold,
        UnitKind::HyperEngine,
        UnitKind::LifeSupport,
        UnitKind::LightStructural,
        UnitKind::Metallics,
        UnitKind::MilitaryRobot,
        UnitKind::MilitarySupplies,
        UnitKind::Mine,
        UnitKind::Missile,
        UnitKind::MissileLauncher,
        UnitKind::NonMetallics,
        UnitKind::Sensor,
        UnitKind::SpaceDrive,
        UnitKind::Structural,
        UnitKind::Transport,
    ];

    /// Catalog kind name, e.g. "life-support".
    pub fn name(self) -> &'static str {
        match self {
            UnitKind::AntiMissile => "anti-missile",
            UnitKind::AssaultCraft => "assault-craft",
            UnitKind::AssaultWeapon => "assault-weapon",
            UnitKind::Automation => "automation",
            UnitKind::ConsumerGoods => "consumer-goods",
            UnitKind::EnergyShield => "energy-shield",
            UnitKind::EnergyWeapon => "energy-weapon",
            UnitKind::Factory => "factory",
            UnitKind::Farm => "farm",
            UnitKind::Food => "food",
            UnitKind::Fuel => "fuel",
            UnitKind::Gold => "gold",
            UnitKind::HyperEngine => "hyper-engine",
            UnitKind::LifeSupport => "life-support",
            UnitKind::LightStructural => "light-structural",
            UnitKind::Metallics => "metallics",
            UnitKind::MilitaryRobot => "military-robot",
            UnitKind::MilitarySupplies => "military-supplies",
            UnitKind::Mine => "mine",
            UnitKind::Missile => "missile",
            UnitKind::MissileLauncher => "missile-launcher",
            UnitKind::NonMetallics => "non-metallics",
            UnitKind::Sensor => "sensor",
            UnitKind::SpaceDrive => "space-drive",
            UnitKind::Structural => "structural",
            UnitKind::Transport => "transport",
        }
    }

    /// Cost profile of one unit of this kind at `tech_level`.
    pub fn economics(self, tech_level: i32) -> Result<UnitEconomics, EconError> {
        if tech_level < 1 {
            return Err(EconError::InvalidTechLevel {
                kind: self,
                tech_level,
            });
        }
        let t = Decimal::from(tech_level);
        let zero = Decimal::ZERO;
        let e = match self {
            UnitKind::AntiMissile => UnitEconomics::new(lin(0, 2, t), lin(0, 2, t), zero, zero),
            UnitKind::AssaultCraft => {
                UnitEconomics::new(lin(0, 3, t), lin(0, 2, t), zero, frac(1, 1) * t)
            }
            UnitKind::AssaultWeapon => {
                UnitEconomics::new(lin(0, 1, t), lin(0, 1, t), zero, lin(0, 2, t))
            }
            UnitKind::Automation => UnitEconomics::new(lin(0, 2, t), lin(0, 2, t), zero, zero),
            UnitKind::ConsumerGoods => UnitEconomics::new(frac(2, 1), frac(4, 1), zero, zero),
            UnitKind::EnergyShield => {
                UnitEconomics::new(lin(0, 25, t), lin(0, 25, t), zero, lin(0, 10, t))
            }
            UnitKind::EnergyWeapon => {
                UnitEconomics::new(lin(0, 5, t), lin(0, 5, t), zero, lin(0, 4, t))
            }
            UnitKind::Factory => {
                UnitEconomics::new(lin(8, 2, t), lin(4, 2, t), frac(5, 1) * t, zero)
            }
            UnitKind::Farm => farm(t, tech_level),
            UnitKind::Food | UnitKind::Fuel | UnitKind::NonMetallics => {
                UnitEconomics::new(zero, Decimal::ONE, zero, zero)
            }
            UnitKind::Gold | UnitKind::Metallics => {
                UnitEconomics::new(Decimal::ONE, zero, zero, zero)
            }
            UnitKind::HyperEngine => UnitEconomics::new(lin(0, 25, t), lin(0, 20, t), zero, zero),
            UnitKind::LifeSupport => {
                UnitEconomics::new(lin(0, 3, t), lin(0, 5, t), Decimal::ONE, zero)
            }
            UnitKind::LightStructural => UnitEconomics::new(frac(1, 2), frac(4, 2), zero, zero),
            UnitKind::MilitaryRobot => UnitEconomics::new(lin(10, 2, t), lin(10, 2, t), zero, zero),
            UnitKind::MilitarySupplies => UnitEconomics::new(frac(2, 2), frac(2, 2), zero, zero),
            UnitKind::Mine => UnitEconomics::new(lin(5, 1, t), lin(5, 1, t), frac(5, 1) * t, zero),
            UnitKind::Missile => UnitEconomics::new(lin(0, 2, t), lin(0, 2, t), zero, zero),
            UnitKind::MissileLauncher => {
                UnitEconomics::new(lin(0, 15, t), lin(0, 10, t), zero, lin(0, 1, t))
            }
            UnitKind::Sensor => UnitEconomics::new(lin(0, 10, t), lin(0, 20, t), zero, zero),
            UnitKind::SpaceDrive => {
                UnitEconomics::new(lin(0, 15, t), lin(0, 10, t), frac(5, 2) * t * t, zero)
            }
            UnitKind::Structural => UnitEconomics::new(frac(1, 1), frac(4, 1), zero, zero),
            UnitKind::Transport => {
                UnitEconomics::new(lin(0, 3, t), lin(0, 1, t), frac(1, 1) * t * t, zero)
            }
        };
        Ok(e)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitKind {
    type Err = EconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| EconError::UnknownUnitKind(s.to_string()))
    }
}

/// Cost profile of a single unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEconomics {
    /// Metallics per unit.
    pub metallics: Decimal,
    /// Non-metallics per unit.
    pub non_metallics: Decimal,
    /// Total mass units (metallics + non-metallics).
    pub mass_units: Decimal,
    /// Fuel per unit per turn.
    pub fuel_per_turn: Decimal,
    /// Fuel per unit per combat round.
    pub fuel_per_combat_round: Decimal,
}

impl UnitEconomics {
    fn new(
        metallics: Decimal,
        non_metallics: Decimal,
        fuel_per_turn: Decimal,
        fuel_per_combat_round: Decimal,
    ) -> Self {
        Self {
            metallics,
            non_metallics,
            mass_units: metallics + non_metallics,
            fuel_per_turn,
            fuel_per_combat_round,
        }
    }
}

/// Look up the cost profile for a catalog kind name and tech level.
///
/// Example:
/// let e = economics("factory", 2).unwrap();
/// assert_eq!(e.metallics, Decimal::new(12, 0));
/// assert!(economics("warp-core", 1).is_err());
pub fn economics(kind: &str, tech_level: i32) -> Result<UnitEconomics, EconError> {
    kind.parse::<UnitKind>()?.economics(tech_level)
}

fn lin(base: i64, per_level: i64, t: Decimal) -> Decimal {
    Decimal::from(base) + Decimal::from(per_level) * t
}

fn frac(num: i64, scale: u32) -> Decimal {
    Decimal::new(num, scale)
}

// Bands: 1..=5, 6..=9, 10 and up.
fn farm(t: Decimal, tech_level: i32) -> UnitEconomics {
    let zero = Decimal::ZERO;
    match tech_level {
        1..=5 => UnitEconomics::new(lin(4, 1, t), lin(2, 1, t), frac(5, 1) * t, zero),
        6..=9 => UnitEconomics::new(lin(4, 2, t), lin(2, 2, t), t, zero),
        _ => UnitEconomics::new(lin(4, 3, t), lin(2, 3, t), frac(1, 1) * t * t, zero),
    }
}
