//! anx-catalog
//!
//! Service Catalog Lookup:
//! - service-code patterns shared with reconciliation (`classify_code`)
//! - catalog wire adapter (tolerates field-name drift in the upstream payload)
//! - leg/category candidate filtering (`candidates_for`)
//!
//! Deterministic, pure logic. No IO. Lookups never fail; they return empty.

mod adapter;
mod lookup;
mod patterns;
pub mod wire;

pub use adapter::{
    normalize, normalize_json, normalize_lenient, Catalog, CatalogAdapterError, CatalogEntry,
};
pub use lookup::{candidates_for, candidates_for_slot, LookupPolicy};
pub use patterns::{builtin_display_name, classify_code};
