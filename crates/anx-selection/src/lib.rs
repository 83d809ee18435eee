//! anx-selection
//!
//! Selection State Engine:
//! - `SelectionStore`: draft/confirmed layers keyed by (passenger, leg, category)
//! - Change Detector / Confirm Gate: pure predicates over the store
//! - `StoreAction`: raw-string boundary for UI events and scripted sessions
//!
//! One store per booking session, passed by reference. Single writer,
//! synchronous, no IO.

mod actions;
mod gate;
mod store;

pub use actions::{OptionSpec, StoreAction};
pub use gate::{
    can_cancel, can_confirm, check_confirm_gate, records_equivalent, slots_equivalent,
    ConfirmBlocked, ConfirmGate, PanelView,
};
pub use store::{KeyState, NonePolicy, SelectionStore};
