//! Entities and the per-simulation entity factory.
//!
//! An [`Entity`] is an identity-bearing, kind-tagged token that flows through
//! stocks. Identity is the entity's `Uuid`: clones of one minted entity
//! compare equal, while two separate mints never do, even when their names
//! repeat. That is what lets a FIFO stock's `remove` hand back exactly what an
//! earlier `add` put in.
//!
//! Identity and naming counters are owned by an [`EntityFactory`], one per
//! simulation, so two simulations running in the same process can never
//! collide or interfere through shared globals.

use crate::types::{EntityKind, EntityName};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// An identity-bearing token tagged with a kind. Immutable after minting.
#[derive(Debug, Clone)]
pub struct Entity {
    id: Uuid,
    name: EntityName,
    kind: EntityKind,
}

impl Entity {
    /// The identity of this entity.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The display name, for reporting only. Names may repeat.
    pub fn name(&self) -> &EntityName {
        &self.name
    }

    /// The kind tag checked by stocks.
    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl std::hash::Hash for Entity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive an entity id from the factory seed and mint counter.
///
/// Deterministic so identical simulations mint identical identities.
fn entity_uuid(seed: u64, counter: u64) -> Uuid {
    let x0 = seed ^ counter;
    let lo = splitmix64(x0);
    let hi = splitmix64(x0.wrapping_add(0xD1B5_4A32_D192_ED03));
    Uuid::from_u128(((hi as u128) << 64) | (lo as u128))
}

/// Per-simulation allocator for entity identities and sequenced names.
#[derive(Debug)]
pub struct EntityFactory {
    seed: u64,
    minted: u64,
    name_sequences: HashMap<String, u64>,
}

impl EntityFactory {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            minted: 0,
            name_sequences: HashMap::new(),
        }
    }

    /// Mint an entity with an explicit name.
    pub fn entity(&mut self, name: impl Into<EntityName>, kind: impl Into<EntityKind>) -> Entity {
        let id = entity_uuid(self.seed, self.minted);
        self.minted += 1;
        Entity {
            id,
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Mint an entity named `"{prefix}-{n}"`, where `n` counts mints of this
    /// prefix within this factory.
    pub fn sequenced(&mut self, prefix: &str, kind: impl Into<EntityKind>) -> Entity {
        let sequence = self.name_sequences.entry(prefix.to_owned()).or_insert(0);
        let name = format!("{prefix}-{sequence}");
        *sequence += 1;
        self.entity(name, kind)
    }
}

impl Default for EntityFactory {
    fn default() -> Self {
        Self::new(0)
    }
}
