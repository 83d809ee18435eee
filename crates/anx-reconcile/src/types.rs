use std::collections::BTreeSet;

use anx_schemas::{normalize_code, Category, LegKey, PassengerId};
use serde::Serialize;

/// Default display sentinel for a category with nothing in it.
pub const NONE_LABEL: &str = "-";

/// Services of one category on one side of the comparison.
///
/// `codes` are reported verbatim for diagnosis; comparison uses the
/// normalized, order-independent [`ServiceSummary::code_set`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    pub codes: Vec<String>,
    pub names: Vec<String>,
    /// Names joined with `", "`, or the none label.
    pub display: String,
}

impl ServiceSummary {
    /// The empty / "not selected" sentinel.
    pub fn none(none_label: &str) -> Self {
        Self {
            codes: Vec::new(),
            names: Vec::new(),
            display: none_label.to_string(),
        }
    }

    /// Summary from `(code, name)` pairs; repeated codes keep the first name.
    pub fn from_pairs(pairs: Vec<(String, String)>, none_label: &str) -> Self {
        let mut seen = BTreeSet::new();
        let mut codes = Vec::new();
        let mut names = Vec::new();
        for (code, name) in pairs {
            if seen.insert(normalize_code(&code)) {
                codes.push(code);
                names.push(name);
            }
        }
        if codes.is_empty() {
            return Self::none(none_label);
        }
        let display = names.join(", ");
        Self {
            codes,
            names,
            display,
        }
    }

    pub fn is_none(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn code_set(&self) -> BTreeSet<String> {
        self.codes.iter().map(|c| normalize_code(c)).collect()
    }
}

/// One summary per category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryValues {
    pub seat: ServiceSummary,
    pub baggage: ServiceSummary,
    pub meal_beverage: ServiceSummary,
    pub priority_boarding: ServiceSummary,
}

impl CategoryValues {
    pub fn none(none_label: &str) -> Self {
        Self {
            seat: ServiceSummary::none(none_label),
            baggage: ServiceSummary::none(none_label),
            meal_beverage: ServiceSummary::none(none_label),
            priority_boarding: ServiceSummary::none(none_label),
        }
    }

    pub fn get(&self, category: Category) -> &ServiceSummary {
        match category {
            Category::Seat => &self.seat,
            Category::Baggage => &self.baggage,
            Category::MealBeverage => &self.meal_beverage,
            Category::PriorityBoarding => &self.priority_boarding,
        }
    }

    pub(crate) fn get_mut(&mut self, category: Category) -> &mut ServiceSummary {
        match category {
            Category::Seat => &mut self.seat,
            Category::Baggage => &mut self.baggage,
            Category::MealBeverage => &mut self.meal_beverage,
            Category::PriorityBoarding => &mut self.priority_boarding,
        }
    }
}

/// Per-category match flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMatches {
    pub seat: bool,
    pub baggage: bool,
    pub meal_beverage: bool,
    pub priority_boarding: bool,
}

impl CategoryMatches {
    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Seat => self.seat,
            Category::Baggage => self.baggage,
            Category::MealBeverage => self.meal_beverage,
            Category::PriorityBoarding => self.priority_boarding,
        }
    }

    pub fn all(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c))
    }
}

/// Requested-vs-received comparison for one (leg, passenger).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRow {
    pub leg: LegKey,
    pub passenger_id: PassengerId,
    pub requested: CategoryValues,
    pub received: CategoryValues,
    pub matches: CategoryMatches,
}

/// Evidence of one category mismatch.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mismatch {
    pub leg: LegKey,
    pub passenger_id: PassengerId,
    pub category: Category,
    pub requested: Vec<String>,
    pub received: Vec<String>,
}

/// A confirmed (passenger, leg) that no payload row was compared against.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedConfirmed {
    pub passenger_id: PassengerId,
    pub leg: LegKey,
    /// Categories with at least one confirmed service.
    pub categories: Vec<Category>,
}

/// Full report, rows in payload order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub rows: Vec<ReconcileRow>,
    /// Confirmed selections left unchecked, in key order.
    pub unmatched_confirmed: Vec<UnmatchedConfirmed>,
}

impl ReconcileReport {
    /// Every row matches and every confirmed selection was checked.
    pub fn is_clean(&self) -> bool {
        self.rows.iter().all(|r| r.matches.all()) && self.unmatched_confirmed.is_empty()
    }

    /// Every mismatched category, in stable order.
    pub fn mismatches(&self) -> Vec<Mismatch> {
        let mut out: Vec<Mismatch> = self
            .rows
            .iter()
            .flat_map(|r| {
                Category::ALL
                    .iter()
                    .filter(|c| !r.matches.get(**c))
                    .map(move |c| Mismatch {
                        leg: r.leg.clone(),
                        passenger_id: r.passenger_id.clone(),
                        category: *c,
                        requested: r.requested.get(*c).codes.clone(),
                        received: r.received.get(*c).codes.clone(),
                    })
            })
            .collect();
        out.sort();
        out
    }

    pub fn row(&self, leg: &LegKey, passenger: &PassengerId) -> Option<&ReconcileRow> {
        self.rows
            .iter()
            .find(|r| &r.leg == leg && &r.passenger_id == passenger)
    }
}
