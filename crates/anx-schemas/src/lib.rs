//! anx-schemas
//!
//! Shared key and value types for the ancillary selection engine:
//! - identifiers (`PassengerId`, `LegKey`, `SelectionKey`)
//! - categories and slots
//! - immutable `ServiceOption` values and the per-key `LegRecord`
//! - the canonical leg-key decoder (`LegDescriptor`)
//!
//! Deterministic, pure types. No IO.

mod ids;
mod leg_key;
mod money;
mod service;

pub use ids::{LegKey, PassengerId, SelectionKey};
pub use leg_key::{normalize_flight_number, parse_date_prefix, LegDescriptor};
pub use money::{micros_from_f64, micros_to_f64, MICROS_SCALE};
pub use service::{normalize_code, Category, LegRecord, ServiceOption, Slot, VatLine};
