//! Selection Store: two-layer (draft / confirmed) staging cache.
//!
//! # Layers
//!
//! Both layers map [`SelectionKey`] -> [`LegRecord`]. A key absent from a
//! layer is distinct from a key present with all slots null.
//!
//! - `draft` entries are created by the first slot write for a key (seeded
//!   from the effective record) and destroyed by `confirm` or `cancel_draft`.
//! - `confirmed` entries are written only by `confirm`, which replaces the
//!   whole record in one map insert. They live until `reset`.
//!
//! # Lifecycle per key
//!
//! ```text
//!   Unset ──set_draft_slot──► Drafting ──confirm──► Confirmed
//!     ▲                        │    ▲                  │
//!     └──────cancel_draft──────┘    └──set_draft_slot──┘
//!            (back to Unset or Confirmed, whichever held before)
//! ```
//!
//! Writes to one key never touch another key, and a slot write never touches
//! the other slots of the same record.

use std::collections::{BTreeMap, BTreeSet};

use anx_schemas::{Category, LegKey, LegRecord, PassengerId, SelectionKey, ServiceOption, Slot};
use serde::{Deserialize, Serialize};

use crate::gate::{self, PanelView};

/// How an explicit write that leaves the draft equal to its baseline is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonePolicy {
    /// Every slot write, including `None`, creates or updates the draft.
    /// Only the confirm gate decides whether it is worth confirming.
    #[default]
    KeepDraft,
    /// A draft that ends up equivalent to its baseline (the confirmed record,
    /// or the empty record) is dropped after the write, so "no draft" and
    /// "draft equal to confirmed" never coexist.
    CollapseRedundant,
}

/// Where a key sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyState {
    Unset,
    Drafting,
    Confirmed,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    draft: BTreeMap<SelectionKey, LegRecord>,
    confirmed: BTreeMap<SelectionKey, LegRecord>,
    none_policy: NonePolicy,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(none_policy: NonePolicy) -> Self {
        Self {
            none_policy,
            ..Self::default()
        }
    }

    pub fn none_policy(&self) -> NonePolicy {
        self.none_policy
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Write exactly one slot of the draft record for `key`.
    ///
    /// The draft is created from the current effective record if absent. A
    /// slot that does not belong to `key.category` makes this a no-op.
    pub fn set_draft_slot(&mut self, key: &SelectionKey, slot: Slot, option: Option<ServiceOption>) {
        if slot.category() != key.category {
            tracing::debug!(%key, %slot, "slot does not belong to category; ignored");
            return;
        }
        if !self.draft.contains_key(key) {
            let seed = self.effective(key);
            self.draft.insert(key.clone(), seed);
        }
        if let Some(record) = self.draft.get_mut(key) {
            record.set(slot, option);
        }

        if self.none_policy == NonePolicy::CollapseRedundant {
            let redundant = match self.draft.get(key) {
                Some(d) => gate::records_equivalent(d, &self.baseline(key)),
                None => false,
            };
            if redundant {
                tracing::debug!(%key, "draft equals baseline; collapsed");
                self.draft.remove(key);
            }
        }
    }

    /// Promote the draft for `key` into `confirmed` (full replace) and drop
    /// the draft. Without a draft this is a guaranteed no-op.
    pub fn confirm(&mut self, key: &SelectionKey) {
        match self.draft.remove(key) {
            Some(record) => {
                self.confirmed.insert(key.clone(), record);
            }
            None => tracing::debug!(%key, "confirm without draft; ignored"),
        }
    }

    /// Drop the draft for `key`, if any. Never touches `confirmed`.
    pub fn cancel_draft(&mut self, key: &SelectionKey) {
        self.draft.remove(key);
    }

    /// Full session reset: both layers, every key.
    pub fn reset(&mut self) {
        self.draft.clear();
        self.confirmed.clear();
    }

    // -----------------------------------------------------------------------
    // Reads (total)
    // -----------------------------------------------------------------------

    /// Draft if present, else confirmed if present, else the empty record.
    pub fn effective(&self, key: &SelectionKey) -> LegRecord {
        self.draft
            .get(key)
            .or_else(|| self.confirmed.get(key))
            .cloned()
            .unwrap_or_else(|| LegRecord::empty(key.category))
    }

    /// Confirmed record, or the empty record.
    pub fn confirmed(&self, key: &SelectionKey) -> LegRecord {
        self.confirmed
            .get(key)
            .cloned()
            .unwrap_or_else(|| LegRecord::empty(key.category))
    }

    pub fn draft_entry(&self, key: &SelectionKey) -> Option<&LegRecord> {
        self.draft.get(key)
    }

    pub fn confirmed_entry(&self, key: &SelectionKey) -> Option<&LegRecord> {
        self.confirmed.get(key)
    }

    /// What a draft is compared against: confirmed, or empty.
    pub(crate) fn baseline(&self, key: &SelectionKey) -> LegRecord {
        self.confirmed(key)
    }

    /// Every confirmed entry, optionally restricted to one passenger, in key order.
    pub fn all_confirmed(&self, passenger: Option<&PassengerId>) -> Vec<(&SelectionKey, &LegRecord)> {
        self.confirmed
            .iter()
            .filter(|(k, _)| passenger.map_or(true, |p| &k.passenger == p))
            .collect()
    }

    /// Confirmed record for (passenger, leg, category) without building a key.
    pub fn confirmed_for(&self, passenger: &PassengerId, leg: &LegKey, category: Category) -> LegRecord {
        self.confirmed(&SelectionKey::new(passenger.clone(), leg.clone(), category))
    }

    /// Legs with at least one confirmed entry.
    pub fn confirmed_legs(&self) -> BTreeSet<LegKey> {
        self.confirmed.keys().map(|k| k.leg.clone()).collect()
    }

    pub fn key_state(&self, key: &SelectionKey) -> KeyState {
        if self.draft.contains_key(key) {
            KeyState::Drafting
        } else if self.confirmed.contains_key(key) {
            KeyState::Confirmed
        } else {
            KeyState::Unset
        }
    }

    /// Everything a panel needs to render one key.
    pub fn panel(&self, key: &SelectionKey) -> PanelView {
        PanelView {
            effective: self.effective(key),
            can_confirm: gate::can_confirm(self, key),
            can_cancel: gate::can_cancel(self, key),
        }
    }

    /// [`SelectionStore::panel`] from raw ids; malformed ids render an empty panel.
    pub fn panel_for(&self, passenger: &str, leg: &str, category: Category) -> PanelView {
        match SelectionKey::parse(passenger, leg, category) {
            Some(key) => self.panel(&key),
            None => PanelView::empty(category),
        }
    }
}
