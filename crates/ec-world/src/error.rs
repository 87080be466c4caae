use ec_core::{
    ConfigError, CorsId, CorsKind, EntityId, GroupKey, PlanetId, SourceError, StarId, SystemId,
    UnitId,
};
use std::fmt;
use thiserror::Error;

/// Entity types as named in build errors and reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Unit,
    System,
    Star,
    Planet,
    Deposit,
    Nation,
    Player,
    /// A colony or ship of any placement.
    Cors,
    SurfaceColony,
    EnclosedColony,
    OrbitalColony,
    Ship,
    FactoryGroup,
    FarmGroup,
    MineGroup,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Unit => "unit",
            EntityKind::System => "system",
            EntityKind::Star => "star",
            EntityKind::Planet => "planet",
            EntityKind::Deposit => "deposit",
            EntityKind::Nation => "nation",
            EntityKind::Player => "player",
            EntityKind::Cors => "colony-or-ship",
            EntityKind::SurfaceColony => "surface colony",
            EntityKind::EnclosedColony => "enclosed colony",
            EntityKind::OrbitalColony => "orbital colony",
            EntityKind::Ship => "ship",
            EntityKind::FactoryGroup => "factory group",
            EntityKind::FarmGroup => "farm group",
            EntityKind::MineGroup => "mine group",
        }
    }
}

impl From<CorsKind> for EntityKind {
    fn from(kind: CorsKind) -> Self {
        match kind {
            CorsKind::SurfaceColony => EntityKind::SurfaceColony,
            CorsKind::EnclosedColony => EntityKind::EnclosedColony,
            CorsKind::OrbitalColony => EntityKind::OrbitalColony,
            CorsKind::Ship => EntityKind::Ship,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a record: an id, or owner and group number for groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Id(i32),
    Group(GroupKey),
}

impl RecordKey {
    pub fn id(id: impl EntityId) -> Self {
        RecordKey::Id(id.raw())
    }
}

impl From<GroupKey> for RecordKey {
    fn from(key: GroupKey) -> Self {
        RecordKey::Group(key)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => write!(f, "#{id}"),
            RecordKey::Group(key) => write!(f, "{key}"),
        }
    }
}

/// Fatal build failures. Every variant names the entity type and id that
/// triggered it; no partial world is ever returned alongside one.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("invalid build config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Catalog unit with a kind name missing from the economics table.
    #[error("unit {unit}: unknown unit kind {kind:?}")]
    UnknownUnitKind { unit: UnitId, kind: String },
    #[error("unit {unit}: invalid tech level {tech_level}")]
    InvalidTechLevel { unit: UnitId, tech_level: i32 },
    /// A required reference does not resolve.
    #[error("{entity} {key}: {field} references missing {target} #{target_id}")]
    DanglingReference {
        entity: EntityKind,
        key: RecordKey,
        field: &'static str,
        target: EntityKind,
        target_id: i32,
    },
    #[error("{entity} {key} appears more than once")]
    DuplicateKey { entity: EntityKind, key: RecordKey },
    #[error("hull id {hull} is used by both {first} and {second}")]
    DuplicateHullId {
        hull: String,
        first: CorsId,
        second: CorsId,
    },
    /// A planet's system differs from its star's system.
    #[error("planet {planet}: system {planet_system}, but star {star} is in {star_system}")]
    InconsistentPlanet {
        planet: PlanetId,
        star: StarId,
        star_system: SystemId,
        planet_system: SystemId,
    },
}

impl BuildError {
    pub(crate) fn duplicate(entity: EntityKind, key: RecordKey) -> Self {
        BuildError::DuplicateKey { entity, key }
    }
}
