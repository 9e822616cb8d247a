use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a Component
///
/// ComponentId wraps the store-generated integer key to provide type safety
/// and prevent mixing up component ids with other numeric values in the
/// system. Ids are assigned by the persistent store on insert and are
/// immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(i64);

impl ComponentId {
    /// Create a ComponentId from a raw integer key
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the inner integer value
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ComponentId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<ComponentId> for i64 {
    fn from(id: ComponentId) -> Self {
        id.0
    }
}
