use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer identifier of an entity, unique within its collection.
pub trait EntityId: Copy + Ord + fmt::Debug + fmt::Display {
    fn raw(self) -> i32;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }

        impl EntityId for $name {
            fn raw(self) -> i32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a star system.
    SystemId
);
entity_id!(
    /// Identifier of a star.
    StarId
);
entity_id!(
    /// Identifier of a planet.
    PlanetId
);
entity_id!(
    /// Identifier of a natural resource deposit.
    DepositId
);
entity_id!(
    /// Identifier of a unit catalog entry.
    UnitId
);
entity_id!(
    /// Identifier of a colony or ship. Colonies and ships share one id space.
    CorsId
);
entity_id!(
    /// Identifier of a nation.
    NationId
);
entity_id!(
    /// Identifier of a player.
    PlayerId
);

/// Key of a factory, farm or mine group: the owning colony-or-ship plus the
/// group number, which is unique within that owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    /// Owning colony or ship.
    pub cors: CorsId,
    /// Group number within the owner.
    pub group_no: i32,
}

impl GroupKey {
    pub fn new(cors: CorsId, group_no: i32) -> Self {
        Self { cors, group_no }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cors, self.group_no)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        let s = serde_json::to_string(&PlanetId(42)).unwrap();
        assert_eq!(s, "42");
        let back: PlanetId = serde_json::from_str("7").unwrap();
        assert_eq!(back, PlanetId(7));
    }

    #[test]
    fn group_keys_order_by_owner_then_number() {
        let mut keys = vec![
            GroupKey::new(CorsId(5), 1),
            GroupKey::new(CorsId(3), 2),
            GroupKey::new(CorsId(3), 1),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                GroupKey::new(CorsId(3), 1),
                GroupKey::new(CorsId(3), 2),
                GroupKey::new(CorsId(5), 1),
            ]
        );
        assert_eq!(GroupKey::new(CorsId(3), 2).to_string(), "#3/2");
    }
}
