use std::borrow::Borrow;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier naming one runtime-side value across the process boundary.
#[derive(Clone, Debug, Display, From, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Id {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Generates identifiers for newly stored values.
///
/// Candidates are random version-4 UUID strings. A candidate may collide with
/// an id already in use; [`GlobalStorage::store`](crate::GlobalStorage::store)
/// keeps drawing until it finds a vacant slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdAllocator;

impl IdAllocator {
    pub const fn new() -> Self {
        Self
    }

    /// Draw a random candidate.
    pub fn candidate(&self) -> Id {
        Id(Uuid::new_v4().to_string())
    }
}
