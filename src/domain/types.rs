/// Identifier types used throughout the domain layer
///
/// These are wrappers around UUID to provide type safety - you can't
/// accidentally pass a child ID where a period ID is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildId(pub Uuid);

impl ChildId {
    /// Generate a new random child ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a child ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ChildId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a sleep period
///
/// Similar to ChildId but for individual sleep period rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodId(pub Uuid);

impl PeriodId {
    /// Generate a new random period ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a period ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PeriodId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PeriodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
