use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical form of a service code: whitespace removed, ASCII uppercase.
///
/// Every code comparison in the engine goes through this function.
pub fn normalize_code(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// ---------------------------------------------------------------------------
// Category / Slot
// ---------------------------------------------------------------------------

/// Kind of ancillary service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Seat,
    Baggage,
    MealBeverage,
    PriorityBoarding,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Seat,
        Category::Baggage,
        Category::MealBeverage,
        Category::PriorityBoarding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Seat => "SEAT",
            Category::Baggage => "BAGGAGE",
            Category::MealBeverage => "MEAL_BEVERAGE",
            Category::PriorityBoarding => "PRIORITY_BOARDING",
        }
    }

    /// Slots owned by this category, in display order.
    pub fn slots(&self) -> &'static [Slot] {
        match self {
            Category::Seat => &[Slot::Seat],
            Category::Baggage => &[Slot::Checked, Slot::Special],
            Category::MealBeverage => &[Slot::Meal, Slot::Beverage],
            Category::PriorityBoarding => &[Slot::Pbod],
        }
    }

    /// Lenient parse: case-insensitive, `-`/space accepted for `_`.
    pub fn parse(raw: &str) -> Option<Self> {
        let norm = raw.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "SEAT" => Some(Category::Seat),
            "BAGGAGE" | "BAG" => Some(Category::Baggage),
            "MEAL_BEVERAGE" | "MEAL" | "MEALBEVERAGE" => Some(Category::MealBeverage),
            "PRIORITY_BOARDING" | "PBOD" | "PRIORITYBOARDING" => {
                Some(Category::PriorityBoarding)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named single-valued sub-choice within a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Seat,
    Checked,
    Special,
    Meal,
    Beverage,
    Pbod,
}

impl Slot {
    pub fn category(&self) -> Category {
        match self {
            Slot::Seat => Category::Seat,
            Slot::Checked | Slot::Special => Category::Baggage,
            Slot::Meal | Slot::Beverage => Category::MealBeverage,
            Slot::Pbod => Category::PriorityBoarding,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Seat => "seat",
            Slot::Checked => "checked",
            Slot::Special => "special",
            Slot::Meal => "meal",
            Slot::Beverage => "beverage",
            Slot::Pbod => "pbod",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "seat" => Some(Slot::Seat),
            "checked" => Some(Slot::Checked),
            "special" => Some(Slot::Special),
            "meal" => Some(Slot::Meal),
            "beverage" => Some(Slot::Beverage),
            "pbod" => Some(Slot::Pbod),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ServiceOption
// ---------------------------------------------------------------------------

/// One VAT component of a service price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatLine {
    pub amount_micros: i64,
    pub tax_code: String,
    pub tax_name: String,
}

/// A selectable ancillary service offered for one leg.
///
/// Immutable once constructed: fields are private and the `with_*` builders
/// consume `self`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOption {
    code: String,
    description: String,
    amount_micros: i64,
    currency: String,
    vat_lines: Vec<VatLine>,
    flight_number: Option<String>,
    departure_date: Option<NaiveDate>,
}

impl ServiceOption {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        amount_micros: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into().trim().to_string(),
            description: description.into().trim().to_string(),
            amount_micros,
            currency: currency.into().trim().to_ascii_uppercase(),
            vat_lines: Vec::new(),
            flight_number: None,
            departure_date: None,
        }
    }

    /// Seat options carry the seat designator as their code.
    pub fn seat(designator: impl Into<String>) -> Self {
        let d: String = designator.into();
        Self::new(d.clone(), d, 0, "")
    }

    pub fn with_vat_lines(mut self, vat_lines: Vec<VatLine>) -> Self {
        self.vat_lines = vat_lines;
        self
    }

    pub fn with_flight(
        mut self,
        flight_number: Option<String>,
        departure_date: Option<NaiveDate>,
    ) -> Self {
        self.flight_number = flight_number
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        self.departure_date = departure_date;
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn normalized_code(&self) -> String {
        normalize_code(&self.code)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount_micros(&self) -> i64 {
        self.amount_micros
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn vat_lines(&self) -> &[VatLine] {
        &self.vat_lines
    }

    pub fn flight_number(&self) -> Option<&str> {
        self.flight_number.as_deref()
    }

    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.departure_date
    }

    /// Code equality after normalization.
    pub fn same_code(&self, other: &ServiceOption) -> bool {
        self.normalized_code() == other.normalized_code()
    }
}

// ---------------------------------------------------------------------------
// LegRecord
// ---------------------------------------------------------------------------

/// Slot -> option mapping for one (passenger, leg, category).
///
/// A slot absent from `slots` is null. Slots are single-valued by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegRecord {
    category: Category,
    slots: BTreeMap<Slot, ServiceOption>,
}

impl LegRecord {
    /// All slots null.
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            slots: BTreeMap::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn get(&self, slot: Slot) -> Option<&ServiceOption> {
        self.slots.get(&slot)
    }

    /// Write one slot. Returns `false` (and changes nothing) when the slot does
    /// not belong to this record's category.
    pub fn set(&mut self, slot: Slot, option: Option<ServiceOption>) -> bool {
        if slot.category() != self.category {
            return false;
        }
        match option {
            Some(o) => {
                self.slots.insert(slot, o);
            }
            None => {
                self.slots.remove(&slot);
            }
        }
        true
    }

    /// `true` when every slot is null.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every slot of the category paired with its value, in display order.
    pub fn entries(&self) -> impl Iterator<Item = (Slot, Option<&ServiceOption>)> + '_ {
        self.category
            .slots()
            .iter()
            .map(move |s| (*s, self.slots.get(s)))
    }

    /// Non-null options in display order.
    pub fn options(&self) -> impl Iterator<Item = &ServiceOption> + '_ {
        self.entries().filter_map(|(_, o)| o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_code_strips_whitespace_and_uppercases() {
        assert_eq!(normalize_code(" bg 20 "), "BG20");
        assert_eq!(normalize_code("pbod"), "PBOD");
    }

    #[test]
    fn every_slot_belongs_to_its_category() {
        for c in Category::ALL {
            for s in c.slots() {
                assert_eq!(s.category(), c);
            }
        }
    }

    #[test]
    fn category_parse_variants() {
        assert_eq!(Category::parse("meal-beverage"), Some(Category::MealBeverage));
        assert_eq!(Category::parse("baggage"), Some(Category::Baggage));
        assert_eq!(Category::parse("priority boarding"), Some(Category::PriorityBoarding));
        assert_eq!(Category::parse("lounge"), None);
    }

    #[test]
    fn record_rejects_foreign_slot() {
        let mut r = LegRecord::empty(Category::Baggage);
        assert!(!r.set(Slot::Meal, Some(ServiceOption::new("MH01", "", 0, "THB"))));
        assert!(r.is_empty());
    }

    #[test]
    fn record_set_none_clears_slot() {
        let mut r = LegRecord::empty(Category::Baggage);
        r.set(Slot::Checked, Some(ServiceOption::new("BG20", "20 kg", 0, "THB")));
        assert_eq!(r.get(Slot::Checked).map(|o| o.code()), Some("BG20"));
        r.set(Slot::Checked, None);
        assert!(r.is_empty());
    }

    #[test]
    fn entries_list_every_slot() {
        let mut r = LegRecord::empty(Category::MealBeverage);
        r.set(Slot::Beverage, Some(ServiceOption::new("BEV1", "Water", 0, "THB")));
        let e: Vec<_> = r.entries().map(|(s, o)| (s, o.map(|o| o.code()))).collect();
        assert_eq!(e, vec![(Slot::Meal, None), (Slot::Beverage, Some("BEV1"))]);
    }

    #[test]
    fn currency_is_uppercased() {
        assert_eq!(ServiceOption::new("BG20", "", 1, " thb ").currency(), "THB");
    }
}
