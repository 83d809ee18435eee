//! Change Detector / Confirm Gate
//!
//! Pure predicates over a [`SelectionStore`], recomputed on every read:
//!
//! - **confirm** is permitted only when a draft exists and differs from its
//!   baseline (the confirmed record, or the empty record) in at least one slot.
//! - **cancel** is offered when a draft exists, or the confirmed record has at
//!   least one non-null slot.
//!
//! Slot comparison goes through [`normalize_code`]: two nulls are equal, a
//! null never equals an option, and two options are equal iff their codes
//! match after normalization. Amounts and descriptions do not participate.

use anx_schemas::{normalize_code, Category, LegRecord, SelectionKey, ServiceOption};
use serde::Serialize;

use crate::SelectionStore;

/// Normalized-code slot equality.
pub fn slots_equivalent(a: Option<&ServiceOption>, b: Option<&ServiceOption>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => normalize_code(x.code()) == normalize_code(y.code()),
        _ => false,
    }
}

/// Slot-by-slot equivalence over the category of `a`.
pub fn records_equivalent(a: &LegRecord, b: &LegRecord) -> bool {
    a.category() == b.category()
        && a
            .category()
            .slots()
            .iter()
            .all(|s| slots_equivalent(a.get(*s), b.get(*s)))
}

// ---------------------------------------------------------------------------
// Confirm gate
// ---------------------------------------------------------------------------

/// Why a confirm is not permitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmBlocked {
    /// No draft entry for the key.
    NoDraft,
    /// Draft equals the confirmed (or empty) record.
    NoChange,
}

/// Result of a confirm gate check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmGate {
    Permitted,
    Blocked(ConfirmBlocked),
}

impl ConfirmGate {
    pub fn is_permitted(&self) -> bool {
        matches!(self, ConfirmGate::Permitted)
    }
}

pub fn check_confirm_gate(store: &SelectionStore, key: &SelectionKey) -> ConfirmGate {
    let Some(draft) = store.draft_entry(key) else {
        return ConfirmGate::Blocked(ConfirmBlocked::NoDraft);
    };
    if records_equivalent(draft, &store.baseline(key)) {
        ConfirmGate::Blocked(ConfirmBlocked::NoChange)
    } else {
        ConfirmGate::Permitted
    }
}

pub fn can_confirm(store: &SelectionStore, key: &SelectionKey) -> bool {
    check_confirm_gate(store, key).is_permitted()
}

pub fn can_cancel(store: &SelectionStore, key: &SelectionKey) -> bool {
    store.draft_entry(key).is_some()
        || store.confirmed_entry(key).is_some_and(|c| !c.is_empty())
}

// ---------------------------------------------------------------------------
// Panel view
// ---------------------------------------------------------------------------

/// Render state for one key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub effective: LegRecord,
    pub can_confirm: bool,
    pub can_cancel: bool,
}

impl PanelView {
    pub fn empty(category: Category) -> Self {
        Self {
            effective: LegRecord::empty(category),
            can_confirm: false,
            can_cancel: false,
        }
    }
}
