//! Cross-key and cross-slot independence
//!
//! GREEN when:
//! - Writing `BAGGAGE.checked` never changes `BAGGAGE.special` of the same key.
//! - It never changes any slot of another category, passenger, or leg.
//! - Confirming one key leaves the drafts of other keys in place.

use anx_schemas::{Category, LegRecord, SelectionKey, ServiceOption, Slot};
use anx_selection::SelectionStore;

fn opt(code: &str) -> Option<ServiceOption> {
    Some(ServiceOption::new(code, code, 0, "THB"))
}

fn k(p: &str, l: &str, c: Category) -> SelectionKey {
    SelectionKey::parse(p, l, c).unwrap()
}

fn seeded() -> SelectionStore {
    let mut s = SelectionStore::new();
    let a_bag = k("A", "L1", Category::Baggage);
    s.set_draft_slot(&a_bag, Slot::Special, opt("SB15"));
    s.confirm(&a_bag);

    let a_meal = k("A", "L1", Category::MealBeverage);
    s.set_draft_slot(&a_meal, Slot::Meal, opt("MH01"));

    let b_bag = k("B", "L1", Category::Baggage);
    s.set_draft_slot(&b_bag, Slot::Checked, opt("BG15"));
    s.confirm(&b_bag);

    let a_bag_l2 = k("A", "L2", Category::Baggage);
    s.set_draft_slot(&a_bag_l2, Slot::Checked, opt("BG25"));
    s
}

fn snapshot(s: &SelectionStore, keys: &[SelectionKey]) -> Vec<(LegRecord, LegRecord)> {
    keys.iter().map(|k| (s.effective(k), s.confirmed(k))).collect()
}

#[test]
fn checked_write_touches_only_checked() {
    let mut s = seeded();
    let target = k("A", "L1", Category::Baggage);
    let others = [
        k("A", "L1", Category::MealBeverage),
        k("A", "L1", Category::Seat),
        k("B", "L1", Category::Baggage),
        k("A", "L2", Category::Baggage),
    ];
    let before = snapshot(&s, &others);
    let special_before = s.effective(&target).get(Slot::Special).cloned();

    s.set_draft_slot(&target, Slot::Checked, opt("BG20"));
    s.set_draft_slot(&target, Slot::Checked, opt("BG20"));

    assert_eq!(snapshot(&s, &others), before);
    assert_eq!(s.effective(&target).get(Slot::Special).cloned(), special_before);
    assert_eq!(s.effective(&target).get(Slot::Checked).map(|o| o.code()), Some("BG20"));
}

#[test]
fn confirm_of_one_key_keeps_other_drafts() {
    let mut s = seeded();
    let meal = k("A", "L1", Category::MealBeverage);
    let l2 = k("A", "L2", Category::Baggage);

    s.confirm(&meal);
    assert!(s.draft_entry(&l2).is_some());
    assert!(s.confirmed_entry(&l2).is_none());
}
