//! anx-reconcile
//!
//! Booking Reconciliation Engine:
//! - Hold adapter: the airline's post-hold payload -> `HoldSnapshot`
//! - Engine: confirmed selections vs. the held booking, one row per
//!   (leg, passenger) present in the payload, plus every confirmed
//!   selection the payload never reached
//! - Mapping: payload `paxNumber` / `legIndex` -> store ids
//!
//! Architectural decisions:
//! - `requested` comes only from the confirmed layer; drafts are not requests
//! - an un-requested category never counts as a mismatch
//! - missing airline data resolves to the "none" sentinel, never an error
//! - read-only: nothing is written back to the store or the payload
//!
//! Deterministic, pure logic. No IO.

mod engine;
mod hold_adapter;
mod mapping;
mod types;

pub use engine::{reconcile, reconcile_with, ReconcileOptions};
pub use hold_adapter::{
    normalize, normalize_json, normalize_lenient, FeeLine, HoldAdapterError, HoldLeg,
    HoldPassenger, HoldSnapshot,
};
pub use mapping::IdMapping;
pub use types::*;
