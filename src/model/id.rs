use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a field, heading or section within one procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

/// Identity of a condition group attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(Uuid);

macro_rules! uuid_identity {
    ($name:ident) => {
        impl $name {
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parses a textual UUID, as used on the wire.
            pub fn parse(text: &str) -> Option<Self> {
                Uuid::parse_str(text.trim()).ok().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identity!(NodeId);
uuid_identity!(ConditionId);

/// How an `IdGenerator` mints new identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Random v4 UUIDs.
    #[default]
    Random,
    /// A monotonic counter packed into a UUID. Deterministic across runs.
    Sequential,
}

/// Mints node and condition identities for one document.
///
/// The generator never hands out the same sequential value twice. The owning
/// `Procedure` additionally skips any value already present in its arena, so
/// identities stay unique even when loaded ids and minted ids share one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGenerator {
    strategy: IdStrategy,
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(IdStrategy::Random)
    }
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self { strategy, next: 0 }
    }

    pub fn random() -> Self {
        Self::new(IdStrategy::Random)
    }

    pub fn sequential() -> Self {
        Self::new(IdStrategy::Sequential)
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    fn next_uuid(&mut self) -> Uuid {
        match self.strategy {
            IdStrategy::Random => Uuid::new_v4(),
            IdStrategy::Sequential => {
                self.next += 1;
                Uuid::from_u128(u128::from(self.next))
            }
        }
    }

    pub fn node_id(&mut self) -> NodeId {
        NodeId(self.next_uuid())
    }

    pub fn condition_id(&mut self) -> ConditionId {
        ConditionId(self.next_uuid())
    }
}
