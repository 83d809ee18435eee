//! Raw-string boundary.
//!
//! UI events and scripted sessions arrive with plain-string ids. Each action is
//! resolved to a [`SelectionKey`] here; an action whose passenger or leg id is
//! blank or malformed is dropped without touching the store.

use anx_schemas::{micros_from_f64, Category, SelectionKey, ServiceOption, Slot};
use serde::Deserialize;

use crate::SelectionStore;

/// Minimal wire form of a chosen option.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSpec {
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
}

impl OptionSpec {
    pub fn into_option(self) -> ServiceOption {
        ServiceOption::new(
            self.code,
            self.description,
            micros_from_f64(self.amount),
            self.currency,
        )
    }
}

/// One store operation, as a UI event or a line of a session script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StoreAction {
    Set {
        passenger: String,
        leg: String,
        category: Category,
        slot: Slot,
        #[serde(default)]
        option: Option<OptionSpec>,
    },
    Confirm {
        passenger: String,
        leg: String,
        category: Category,
    },
    Cancel {
        passenger: String,
        leg: String,
        category: Category,
    },
    Reset,
}

impl StoreAction {
    /// Key this action addresses; `None` for `Reset` and for malformed ids.
    pub fn key(&self) -> Option<SelectionKey> {
        match self {
            StoreAction::Set {
                passenger,
                leg,
                category,
                ..
            }
            | StoreAction::Confirm {
                passenger,
                leg,
                category,
            }
            | StoreAction::Cancel {
                passenger,
                leg,
                category,
            } => SelectionKey::parse(passenger, leg, *category),
            StoreAction::Reset => None,
        }
    }
}

impl SelectionStore {
    /// Apply one raw action. Returns `false` when it was dropped for a
    /// malformed id.
    pub fn apply(&mut self, action: StoreAction) -> bool {
        if matches!(action, StoreAction::Reset) {
            self.reset();
            return true;
        }
        let Some(key) = action.key() else {
            tracing::debug!(?action, "malformed passenger or leg id; action dropped");
            return false;
        };
        match action {
            StoreAction::Set { slot, option, .. } => {
                self.set_draft_slot(&key, slot, option.map(OptionSpec::into_option))
            }
            StoreAction::Confirm { .. } => self.confirm(&key),
            StoreAction::Cancel { .. } => self.cancel_draft(&key),
            StoreAction::Reset => {}
        }
        true
    }

    /// Apply a whole script in order. Returns how many actions were dropped.
    pub fn apply_all(&mut self, actions: impl IntoIterator<Item = StoreAction>) -> usize {
        let mut dropped = 0;
        for a in actions {
            if !self.apply(a) {
                dropped += 1;
            }
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_parses_and_applies() {
        let script = r#"[
            { "op": "set", "passenger": "P1", "leg": "L1", "category": "BAGGAGE", "slot": "checked",
              "option": { "code": "BG20", "amount": 467.29, "currency": "THB" } },
            { "op": "confirm", "passenger": "P1", "leg": "L1", "category": "BAGGAGE" },
            { "op": "set", "passenger": "  ", "leg": "L1", "category": "SEAT", "slot": "seat",
              "option": { "code": "12A" } }
        ]"#;
        let actions: Vec<StoreAction> = serde_json::from_str(script).unwrap();
        let mut s = SelectionStore::new();
        assert_eq!(s.apply_all(actions), 1);

        let k = SelectionKey::parse("P1", "L1", Category::Baggage).unwrap();
        let c = s.confirmed(&k);
        let bg = c.get(Slot::Checked).unwrap();
        assert_eq!(bg.code(), "BG20");
        assert_eq!(bg.amount_micros(), 467_290_000);
    }

    #[test]
    fn set_without_option_clears_slot() {
        let a: StoreAction = serde_json::from_str(
            r#"{ "op": "set", "passenger": "P1", "leg": "L1", "category": "MEAL_BEVERAGE", "slot": "meal" }"#,
        )
        .unwrap();
        assert!(matches!(a, StoreAction::Set { option: None, .. }));
    }

    #[test]
    fn reset_applies() {
        let mut s = SelectionStore::new();
        assert!(s.apply(StoreAction::Reset));
    }
}
