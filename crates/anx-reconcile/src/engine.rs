use std::collections::{BTreeMap, BTreeSet};

use anx_catalog::{builtin_display_name, classify_code};
use anx_schemas::{normalize_code, Category, LegDescriptor, LegKey, PassengerId, Slot};
use anx_selection::SelectionStore;

use crate::{
    CategoryMatches, CategoryValues, HoldLeg, HoldPassenger, HoldSnapshot, IdMapping,
    ReconcileReport, ReconcileRow, ServiceSummary, UnmatchedConfirmed, NONE_LABEL,
};

/// Display and labeling knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Label of an empty category.
    pub none_label: String,
    /// Per-code display names (keys normalized), consulted when no airline
    /// line names the code, before the built-in names.
    pub display_names: BTreeMap<String, String>,
    /// Value of `legIndex` that denotes `itinerary[0]` (0 or 1).
    pub leg_index_base: i64,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            none_label: NONE_LABEL.to_string(),
            display_names: BTreeMap::new(),
            leg_index_base: 0,
        }
    }
}

impl ReconcileOptions {
    pub fn with_leg_index_base(mut self, base: i64) -> Self {
        self.leg_index_base = base;
        self
    }

    pub fn with_display_names(mut self, names: BTreeMap<String, String>) -> Self {
        self.display_names = names
            .into_iter()
            .map(|(k, v)| (normalize_code(&k), v))
            .collect();
        self
    }

    fn display_name(&self, code: &str) -> String {
        let norm = normalize_code(code);
        self.display_names
            .get(&norm)
            .cloned()
            .or_else(|| builtin_display_name(&norm))
            .unwrap_or_else(|| code.to_string())
    }
}

// ---------------------------------------------------------------------------
// Leg resolution
// ---------------------------------------------------------------------------

/// Maps payload legs onto the leg keys the store was written with.
struct LegResolver<'a> {
    decoded: Vec<(LegKey, Option<LegDescriptor>)>,
    itinerary: &'a [LegKey],
    index_base: i64,
}

impl<'a> LegResolver<'a> {
    fn new(store: &SelectionStore, itinerary: &'a [LegKey], index_base: i64) -> Self {
        let mut keys: BTreeSet<LegKey> = store.confirmed_legs();
        keys.extend(itinerary.iter().cloned());
        let decoded = keys
            .into_iter()
            .map(|k| {
                let d = LegDescriptor::decode(&k);
                (k, d)
            })
            .collect();
        Self {
            decoded,
            itinerary,
            index_base,
        }
    }

    fn resolve(&self, leg: &HoldLeg, position: usize) -> LegKey {
        let d = &leg.descriptor;
        if let Some((k, _)) = self
            .decoded
            .iter()
            .find(|(_, dk)| dk.as_ref().is_some_and(|dk| dk.matches(d)))
        {
            return k.clone();
        }
        let canonical = d.encode();
        if let Some(c) = &canonical {
            if let Some((k, _)) = self.decoded.iter().find(|(k, _)| k == c) {
                return k.clone();
            }
        }
        let by_index = leg
            .leg_index
            .and_then(|i| usize::try_from(i.checked_sub(self.index_base)?).ok())
            .and_then(|i| self.itinerary.get(i));
        if let Some(k) = by_index {
            return k.clone();
        }
        canonical.unwrap_or_else(|| {
            tracing::debug!(position, "hold leg has no flight number; positional key used");
            LegKey::positional(position)
        })
    }
}

// ---------------------------------------------------------------------------
// Requested / received
// ---------------------------------------------------------------------------

fn requested_for(
    store: &SelectionStore,
    passenger: &PassengerId,
    leg: &LegKey,
    opts: &ReconcileOptions,
) -> CategoryValues {
    let mut out = CategoryValues::none(&opts.none_label);
    for category in Category::ALL {
        let record = store.confirmed_for(passenger, leg, category);
        let pairs = record
            .options()
            .map(|o| {
                let name = if o.description().is_empty() {
                    opts.display_name(o.code())
                } else {
                    o.description().to_string()
                };
                (o.code().to_string(), name)
            })
            .collect();
        *out.get_mut(category) = ServiceSummary::from_pairs(pairs, &opts.none_label);
    }
    out
}

fn received_for(passenger: &HoldPassenger, opts: &ReconcileOptions) -> CategoryValues {
    let mut by_category: BTreeMap<Category, Vec<(String, String)>> = BTreeMap::new();

    // The airline's own name for a code, from whichever line carries one.
    let mut airline_names: BTreeMap<String, String> = BTreeMap::new();
    for line in passenger.ssr_lines() {
        if let Some(name) = line.tax_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            airline_names
                .entry(normalize_code(&line.tax_code))
                .or_insert_with(|| name.to_string());
        }
    }

    if let Some(seat) = &passenger.seat {
        by_category
            .entry(Category::Seat)
            .or_default()
            .push((seat.clone(), seat.clone()));
    }

    for line in passenger.ssr_lines() {
        let Some(slot) = classify_code(&line.tax_code) else {
            tracing::debug!(code = %line.tax_code, "unclassified SSR line ignored");
            continue;
        };
        if slot == Slot::Seat {
            continue;
        }
        let name = airline_names
            .get(&normalize_code(&line.tax_code))
            .cloned()
            .unwrap_or_else(|| opts.display_name(&line.tax_code));
        by_category
            .entry(slot.category())
            .or_default()
            .push((line.tax_code.clone(), name));
    }

    let mut out = CategoryValues::none(&opts.none_label);
    for (category, pairs) in by_category {
        *out.get_mut(category) = ServiceSummary::from_pairs(pairs, &opts.none_label);
    }
    out
}

fn category_matches(requested: &ServiceSummary, received: &ServiceSummary) -> bool {
    requested.is_none() || requested.code_set() == received.code_set()
}

fn compare(requested: &CategoryValues, received: &CategoryValues) -> CategoryMatches {
    let m = |c: Category| category_matches(requested.get(c), received.get(c));
    CategoryMatches {
        seat: m(Category::Seat),
        baggage: m(Category::Baggage),
        meal_beverage: m(Category::MealBeverage),
        priority_boarding: m(Category::PriorityBoarding),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Confirmed (passenger, leg) pairs with at least one service that no row
/// in `rows` was compared against.
fn unmatched_confirmed(store: &SelectionStore, rows: &[ReconcileRow]) -> Vec<UnmatchedConfirmed> {
    let consumed: BTreeSet<(&PassengerId, &LegKey)> =
        rows.iter().map(|r| (&r.passenger_id, &r.leg)).collect();
    let mut pending: BTreeMap<(PassengerId, LegKey), Vec<Category>> = BTreeMap::new();
    for (key, record) in store.all_confirmed(None) {
        if record.options().next().is_none() || consumed.contains(&(&key.passenger, &key.leg)) {
            continue;
        }
        pending
            .entry((key.passenger.clone(), key.leg.clone()))
            .or_default()
            .push(key.category);
    }
    pending
        .into_iter()
        .map(|((passenger_id, leg), mut categories)| {
            categories.sort();
            tracing::warn!(
                passenger = %passenger_id.as_str(),
                leg = %leg.as_str(),
                ?categories,
                "confirmed selection not present in the held booking"
            );
            UnmatchedConfirmed {
                passenger_id,
                leg,
                categories,
            }
        })
        .collect()
}

/// Reconcile with default options and no id mapping.
pub fn reconcile(store: &SelectionStore, hold: &HoldSnapshot) -> ReconcileReport {
    reconcile_with(store, hold, &IdMapping::default(), &ReconcileOptions::default())
}

/// One row per (leg, passenger) present in `hold`, in payload order, plus
/// every confirmed selection that no row covered.
///
/// Payload legs are matched to store leg keys by decoded descriptor, then by
/// canonical key text, then by `legIndex` into `mapping.itinerary`. A leg
/// that matches nothing is reported under its canonical key with nothing
/// requested. Payload passengers are translated through `mapping`; rows carry
/// the store's passenger id.
pub fn reconcile_with(
    store: &SelectionStore,
    hold: &HoldSnapshot,
    mapping: &IdMapping,
    opts: &ReconcileOptions,
) -> ReconcileReport {
    let resolver = LegResolver::new(store, &mapping.itinerary, opts.leg_index_base);
    let mut rows = Vec::new();

    for (position, leg) in hold.legs.iter().enumerate() {
        let leg_key = resolver.resolve(leg, position);
        for passenger in &leg.passengers {
            let passenger_id = mapping.passenger(&passenger.passenger_id);
            let requested = requested_for(store, &passenger_id, &leg_key, opts);
            let received = received_for(passenger, opts);
            let matches = compare(&requested, &received);
            rows.push(ReconcileRow {
                leg: leg_key.clone(),
                passenger_id,
                requested,
                received,
                matches,
            });
        }
    }

    let unmatched_confirmed = unmatched_confirmed(store, &rows);
    let report = ReconcileReport {
        rows,
        unmatched_confirmed,
    };
    tracing::info!(
        rows = report.rows.len(),
        mismatches = report.mismatches().len(),
        unmatched = report.unmatched_confirmed.len(),
        "reconciliation complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeeLine;
    use anx_schemas::{SelectionKey, ServiceOption};

    fn line(code: &str, name: Option<&str>, ssr: bool) -> FeeLine {
        FeeLine {
            tax_code: code.to_string(),
            tax_name: name.map(str::to_string),
            amount_micros: 0,
            is_ssr: ssr,
        }
    }

    fn pax(seat: Option<&str>, lines: Vec<FeeLine>) -> HoldPassenger {
        HoldPassenger {
            passenger_id: PassengerId::parse("1").unwrap(),
            seat: seat.map(str::to_string),
            fee_lines: lines,
        }
    }

    #[test]
    fn received_classifies_ssr_lines_only() {
        let p = pax(
            Some("12A"),
            vec![
                line("BG20", Some("Baggage 20kg"), true),
                line("SB15", None, true),
                line("MH01", None, true),
                line("BEV2", Some("Coke"), true),
                line("PBOD", None, true),
                line("BG25", None, false),
                line("YQ", Some("Fuel"), true),
            ],
        );
        let r = received_for(&p, &ReconcileOptions::default());
        assert_eq!(r.seat.codes, ["12A"]);
        assert_eq!(r.baggage.codes, ["BG20", "SB15"]);
        assert_eq!(r.baggage.names, ["Baggage 20kg", "Special baggage 15 kg"]);
        assert_eq!(r.meal_beverage.codes, ["MH01", "BEV2"]);
        assert_eq!(r.priority_boarding.display, "Priority boarding");
    }

    #[test]
    fn configured_display_names_beat_builtins() {
        let mut names = BTreeMap::new();
        names.insert("mh01".to_string(), "Pad thai".to_string());
        let opts = ReconcileOptions::default().with_display_names(names);
        let r = received_for(&pax(None, vec![line("MH01", None, true)]), &opts);
        assert_eq!(r.meal_beverage.display, "Pad thai");
        assert!(r.seat.is_none());
        assert_eq!(r.seat.display, "-");
    }

    #[test]
    fn unrequested_category_always_matches() {
        let none = ServiceSummary::none("-");
        let got = ServiceSummary::from_pairs(vec![("BG20".into(), "x".into())], "-");
        assert!(category_matches(&none, &got));
        assert!(!category_matches(&got, &none));
    }

    fn indexed_leg(index: i64) -> HoldLeg {
        HoldLeg {
            leg_index: Some(index),
            descriptor: LegDescriptor::from_parts("", "", "", ""),
            departure_date_time: None,
            arrival_date_time: None,
            passengers: vec![pax(None, vec![])],
        }
    }

    #[test]
    fn leg_index_resolves_through_itinerary() {
        let store = SelectionStore::new();
        let mapping = IdMapping::new()
            .with_itinerary(vec![LegKey::parse("out").unwrap(), LegKey::parse("back").unwrap()]);
        let hold = HoldSnapshot { legs: vec![indexed_leg(2)] };
        let report = reconcile_with(&store, &hold, &mapping, &ReconcileOptions::default());
        assert_eq!(report.rows[0].leg.as_str(), "leg-0");

        let opts = ReconcileOptions::default().with_leg_index_base(1);
        let report = reconcile_with(&store, &hold, &mapping, &opts);
        assert_eq!(report.rows[0].leg.as_str(), "back");

        let hold = HoldSnapshot { legs: vec![indexed_leg(0)] };
        let report = reconcile_with(&store, &hold, &mapping, &opts);
        assert_eq!(report.rows[0].leg.as_str(), "leg-0");
    }

    #[test]
    fn return_leg_alone_keeps_zero_based_index() {
        let store = SelectionStore::new();
        let mapping = IdMapping::new()
            .with_itinerary(vec![LegKey::parse("out").unwrap(), LegKey::parse("back").unwrap()]);
        // only the return leg was held; its legIndex is 1 in a 0-based payload
        let hold = HoldSnapshot { legs: vec![indexed_leg(1)] };
        let report = reconcile_with(&store, &hold, &mapping, &ReconcileOptions::default());
        assert_eq!(report.rows[0].leg.as_str(), "back");
    }

    #[test]
    fn airline_name_from_any_line_beats_static_names() {
        let p = pax(
            None,
            vec![
                line("BG20", None, true),
                line("bg20", Some("Airline 20kg bag"), true),
                line("PBOD", Some("  "), true),
            ],
        );
        let r = received_for(&p, &ReconcileOptions::default());
        assert_eq!(r.baggage.codes, ["BG20"]);
        assert_eq!(r.baggage.names, ["Airline 20kg bag"]);
        assert_eq!(r.priority_boarding.names, ["Priority boarding"]);
    }

    #[test]
    fn unchecked_confirmed_selection_is_reported() {
        let mut store = SelectionStore::new();
        let k = SelectionKey::parse("P1", "L1", Category::Baggage).unwrap();
        store.set_draft_slot(&k, Slot::Checked, Some(ServiceOption::new("BG20", "", 0, "THB")));
        store.confirm(&k);
        let hold = HoldSnapshot { legs: vec![indexed_leg(0)] };

        let report = reconcile_with(&store, &hold, &IdMapping::default(), &ReconcileOptions::default());
        assert_eq!(report.unmatched_confirmed.len(), 1);
        assert_eq!(report.unmatched_confirmed[0].passenger_id, k.passenger);
        assert_eq!(report.unmatched_confirmed[0].categories, [Category::Baggage]);
        assert!(!report.is_clean());

        let mapping = IdMapping::new()
            .with_itinerary(vec![k.leg.clone()])
            .with_passenger(PassengerId::parse("1").unwrap(), k.passenger.clone());
        let report = reconcile_with(&store, &hold, &mapping, &ReconcileOptions::default());
        assert!(report.unmatched_confirmed.is_empty());
        assert_eq!(report.rows[0].passenger_id, k.passenger);
        assert!(!report.rows[0].matches.baggage);
    }

    #[test]
    fn drafts_are_not_requested() {
        let mut store = SelectionStore::new();
        let k = SelectionKey::parse("1", "BKK-CNX-FD3435", Category::Baggage).unwrap();
        store.set_draft_slot(&k, Slot::Checked, Some(ServiceOption::new("BG20", "", 0, "THB")));
        let r = requested_for(&store, &k.passenger, &k.leg, &ReconcileOptions::default());
        assert!(r.baggage.is_none());
    }
}
