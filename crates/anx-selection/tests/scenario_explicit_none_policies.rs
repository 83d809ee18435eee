//! Explicit "none" under both draft policies
//!
//! GREEN when:
//! - KeepDraft: selecting none on an unset key creates a draft that the gate
//!   refuses to confirm; reverting a confirmed option to none is confirmable.
//! - CollapseRedundant: the same writes leave no draft when the result equals
//!   the baseline, and both policies agree on `effective`, `can_confirm` and
//!   the confirmed layer after every step.

use anx_schemas::{Category, SelectionKey, ServiceOption, Slot};
use anx_selection::{can_cancel, can_confirm, KeyState, NonePolicy, SelectionStore};

fn key() -> SelectionKey {
    SelectionKey::parse("P1", "L1", Category::Baggage).unwrap()
}

fn bg20() -> Option<ServiceOption> {
    Some(ServiceOption::new("BG20", "20 kg", 467_290_000, "THB"))
}

#[test]
fn keep_draft_none_on_unset_key() {
    let k = key();
    let mut s = SelectionStore::with_policy(NonePolicy::KeepDraft);
    s.set_draft_slot(&k, Slot::Checked, None);

    assert_eq!(s.key_state(&k), KeyState::Drafting);
    assert!(!can_confirm(&s, &k));
    assert!(can_cancel(&s, &k));
}

#[test]
fn collapse_redundant_none_on_unset_key() {
    let k = key();
    let mut s = SelectionStore::with_policy(NonePolicy::CollapseRedundant);
    s.set_draft_slot(&k, Slot::Checked, None);

    assert_eq!(s.key_state(&k), KeyState::Unset);
    assert!(!can_confirm(&s, &k));
    assert!(!can_cancel(&s, &k));
}

#[test]
fn reverting_confirmed_option_is_confirmable_under_both() {
    for policy in [NonePolicy::KeepDraft, NonePolicy::CollapseRedundant] {
        let k = key();
        let mut s = SelectionStore::with_policy(policy);
        s.set_draft_slot(&k, Slot::Checked, bg20());
        s.confirm(&k);

        s.set_draft_slot(&k, Slot::Checked, None);
        assert!(can_confirm(&s, &k), "{policy:?}");
        s.confirm(&k);
        assert!(s.confirmed(&k).is_empty(), "{policy:?}");
    }
}

#[test]
fn reselecting_then_reverting_under_collapse() {
    let k = key();
    let mut s = SelectionStore::with_policy(NonePolicy::CollapseRedundant);
    s.set_draft_slot(&k, Slot::Checked, bg20());
    s.confirm(&k);

    s.set_draft_slot(&k, Slot::Checked, None);
    assert_eq!(s.key_state(&k), KeyState::Drafting);
    s.set_draft_slot(&k, Slot::Checked, bg20());
    assert_eq!(s.key_state(&k), KeyState::Confirmed);
}

#[test]
fn policies_agree_on_observable_state() {
    let steps: Vec<(Slot, Option<ServiceOption>)> = vec![
        (Slot::Checked, None),
        (Slot::Checked, bg20()),
        (Slot::Special, None),
        (Slot::Checked, None),
    ];
    let k = key();
    let mut keep = SelectionStore::with_policy(NonePolicy::KeepDraft);
    let mut collapse = SelectionStore::with_policy(NonePolicy::CollapseRedundant);

    for (slot, option) in steps {
        keep.set_draft_slot(&k, slot, option.clone());
        collapse.set_draft_slot(&k, slot, option);
        assert_eq!(keep.effective(&k), collapse.effective(&k));
        assert_eq!(can_confirm(&keep, &k), can_confirm(&collapse, &k));
        keep.confirm(&k);
        collapse.confirm(&k);
        assert_eq!(keep.confirmed(&k).is_empty(), collapse.confirmed(&k).is_empty());
    }
}
