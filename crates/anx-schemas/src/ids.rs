//! Opaque identifiers.
//!
//! Both identifiers are trimmed on construction. Blank input, or input carrying
//! control characters, is rejected with `None` so that callers at the store
//! boundary can turn a malformed id into a silent no-op.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Category;

fn clean_id(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() || t.chars().any(char::is_control) {
        return None;
    }
    Some(t.to_string())
}

/// Error produced when deserializing a malformed identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidId {
    pub kind: &'static str,
    pub raw: String,
}

impl fmt::Display for InvalidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.kind, self.raw)
    }
}

impl std::error::Error for InvalidId {}

// ---------------------------------------------------------------------------
// PassengerId
// ---------------------------------------------------------------------------

/// One traveler within a booking session.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PassengerId(String);

impl PassengerId {
    pub fn parse(raw: &str) -> Option<Self> {
        clean_id(raw).map(Self)
    }

    /// Passenger id for a numeric `paxNumber` from the airline payload.
    pub fn from_pax_number(n: i64) -> Self {
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PassengerId {
    type Error = InvalidId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or(InvalidId {
            kind: "passenger id",
            raw,
        })
    }
}

impl From<PassengerId> for String {
    fn from(id: PassengerId) -> Self {
        id.0
    }
}

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// LegKey
// ---------------------------------------------------------------------------

/// One flight leg within an itinerary.
///
/// The engine never looks inside the key. Consumers that need route, flight
/// number or date go through [`crate::LegDescriptor::decode`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LegKey(String);

impl LegKey {
    pub fn parse(raw: &str) -> Option<Self> {
        clean_id(raw).map(Self)
    }

    /// Placeholder key `leg-{position}` for a leg known only by its position.
    pub fn positional(position: usize) -> Self {
        Self(format!("leg-{position}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LegKey {
    type Error = InvalidId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or(InvalidId {
            kind: "leg key",
            raw,
        })
    }
}

impl From<LegKey> for String {
    fn from(key: LegKey) -> Self {
        key.0
    }
}

impl fmt::Display for LegKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// SelectionKey
// ---------------------------------------------------------------------------

/// Store key: one (passenger, leg, category) triple.
///
/// Field order gives the `Ord` used by the store maps, so iteration groups by
/// passenger, then leg, then category.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SelectionKey {
    pub passenger: PassengerId,
    pub leg: LegKey,
    pub category: Category,
}

impl SelectionKey {
    pub fn new(passenger: PassengerId, leg: LegKey, category: Category) -> Self {
        Self {
            passenger,
            leg,
            category,
        }
    }

    /// Build a key from raw strings; `None` when either id is malformed.
    pub fn parse(passenger: &str, leg: &str, category: Category) -> Option<Self> {
        Some(Self::new(
            PassengerId::parse(passenger)?,
            LegKey::parse(leg)?,
            category,
        ))
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.passenger, self.leg, self.category)
    }
}
