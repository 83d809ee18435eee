use anx_schemas::{normalize_flight_number, Category, Slot};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{classify_code, CatalogEntry};

/// Shape of a normalized flight number: designator, digits, optional suffix.
static FLIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{2}[A-Z]?\d{1,5}[A-Z]?$").unwrap());

/// Lookup behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupPolicy {
    /// When no `PBOD` entry carries the leg's flight number, offer every
    /// `PBOD` entry in the catalog, in catalog order.
    pub pbod_leg_fallback: bool,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self {
            pbod_leg_fallback: true,
        }
    }
}

fn leg_flight(raw: Option<&str>) -> Option<String> {
    let f = normalize_flight_number(raw?);
    FLIGHT_RE.is_match(&f).then_some(f)
}

fn on_leg(entry: &CatalogEntry, flight: &str) -> bool {
    entry
        .option
        .flight_number()
        .map(normalize_flight_number)
        .is_some_and(|f| f == flight)
}

impl LookupPolicy {
    /// Entries for one slot of one leg, in catalog order.
    pub fn candidates_for_slot<'a>(
        &self,
        catalog: &'a [CatalogEntry],
        leg_flight_number: Option<&str>,
        slot: Slot,
    ) -> Vec<&'a CatalogEntry> {
        let Some(flight) = leg_flight(leg_flight_number) else {
            tracing::debug!(?leg_flight_number, %slot, "catalog lookup without usable flight number");
            return Vec::new();
        };
        let of_slot = |e: &&CatalogEntry| classify_code(e.option.code()) == Some(slot);

        let found: Vec<&CatalogEntry> = catalog
            .iter()
            .filter(|e| on_leg(e, &flight))
            .filter(of_slot)
            .collect();
        if !found.is_empty() || slot != Slot::Pbod || !self.pbod_leg_fallback {
            return found;
        }

        let fallback: Vec<&CatalogEntry> = catalog.iter().filter(of_slot).collect();
        if !fallback.is_empty() {
            tracing::debug!(%flight, n = fallback.len(), "PBOD offered from another leg");
        }
        fallback
    }

    /// Entries for every slot of `category`, grouped by slot in display order.
    ///
    /// Seats have no catalog codes; `Category::Seat` is always empty.
    pub fn candidates_for<'a>(
        &self,
        catalog: &'a [CatalogEntry],
        leg_flight_number: Option<&str>,
        category: Category,
    ) -> Vec<&'a CatalogEntry> {
        category
            .slots()
            .iter()
            .flat_map(|s| self.candidates_for_slot(catalog, leg_flight_number, *s))
            .collect()
    }
}

/// [`LookupPolicy::candidates_for`] with the default policy.
pub fn candidates_for<'a>(
    catalog: &'a [CatalogEntry],
    leg_flight_number: Option<&str>,
    category: Category,
) -> Vec<&'a CatalogEntry> {
    LookupPolicy::default().candidates_for(catalog, leg_flight_number, category)
}

/// [`LookupPolicy::candidates_for_slot`] with the default policy.
pub fn candidates_for_slot<'a>(
    catalog: &'a [CatalogEntry],
    leg_flight_number: Option<&str>,
    slot: Slot,
) -> Vec<&'a CatalogEntry> {
    LookupPolicy::default().candidates_for_slot(catalog, leg_flight_number, slot)
}
