//! Payload → store identifier mapping.
//!
//! # Problem
//!
//! The hold payload names passengers by `paxNumber` and legs by descriptor or
//! `legIndex`. The selection store is keyed by whatever ids the booking flow
//! chose (`"P1"`, `"L1"`, ...). Without a mapping the two sides never meet
//! and every confirmed selection goes unchecked.
//!
//! # Solution
//!
//! [`IdMapping`] carries both translations:
//!
//! ```text
//! paxNumber        →  store passenger id
//! legIndex - base  →  itinerary[i]  (store leg key)
//! ```
//!
//! A payload passenger without an entry keeps its own id, so a store written
//! with `"1"`, `"2"`, ... needs no mapping at all.

use std::collections::BTreeMap;

use anx_schemas::{LegKey, PassengerId};

/// Translates payload identifiers into the ids the store was written with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdMapping {
    /// Store leg keys in itinerary order, indexed by `legIndex`.
    pub itinerary: Vec<LegKey>,
    /// payload passenger id → store passenger id
    passengers: BTreeMap<PassengerId, PassengerId>,
}

impl IdMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_itinerary(mut self, itinerary: Vec<LegKey>) -> Self {
        self.itinerary = itinerary;
        self
    }

    /// Map payload passenger `payload` (its `paxNumber`) to `store`.
    ///
    /// Registering the same payload id twice keeps the last mapping.
    pub fn with_passenger(mut self, payload: PassengerId, store: PassengerId) -> Self {
        self.passengers.insert(payload, store);
        self
    }

    /// Store id for a payload passenger; identity when unmapped.
    pub fn passenger(&self, payload: &PassengerId) -> PassengerId {
        self.passengers
            .get(payload)
            .cloned()
            .unwrap_or_else(|| payload.clone())
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PassengerId {
        PassengerId::parse(s).unwrap()
    }

    #[test]
    fn mapped_and_unmapped_passengers() {
        let m = IdMapping::new()
            .with_passenger(pid("1"), pid("P1"))
            .with_passenger(pid("1"), pid("P9"));
        assert_eq!(m.passenger(&pid("1")), pid("P9"));
        assert_eq!(m.passenger(&pid("2")), pid("2"));
        assert_eq!(m.passenger_count(), 1);
    }
}
