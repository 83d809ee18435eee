//! Catalog Adapter: normalize the upstream ancillary catalog into internal types.
//!
//! # Purpose
//! The pricing/catalog collaborator returns, per leg,
//! `{ legFlightNumber, services: [{ ssrCode, description, amount, currency,
//! vat: [..], flightNumber, departureDate, paxTypeCode }] }`, but field names
//! and list wrappers have drifted over time. This module reads every accepted
//! variant and produces [`Catalog`] / [`CatalogEntry`] values.
//!
//! # Design constraints
//! - Pure, deterministic conversion. No IO, no async.
//! - Whole-document failures (not JSON, scalar top level) are
//!   [`CatalogAdapterError`]s. Per-service problems either fail the strict
//!   [`normalize`] or are collected by [`normalize_lenient`].
//! - A service without its own flight number inherits the catalog's
//!   `legFlightNumber`.

use anx_schemas::{parse_date_prefix, ServiceOption, VatLine};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::wire::{first_list, first_micros, first_text, records, RawList, RawScalar};

const CATALOG_WRAPPERS: &[&str] = &["data", "catalogs", "legs"];
/// Keys that mark an object as a service rather than a per-leg catalog.
const SERVICE_MARKERS: &[&str] = &["ssrCode", "ssr_code", "code", "serviceCode"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// All errors that can occur during catalog normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogAdapterError {
    /// Input text was not JSON.
    InvalidJson(String),
    /// Top level was neither an object nor an array.
    UnrecognisedShape,
    /// A catalog carried no recognisable services list.
    MissingServices { catalog_index: usize },
    /// A service entry was not a JSON object.
    ServiceNotObject { catalog_index: usize, service_index: usize },
    /// A service entry had an empty or missing code.
    MissingCode { catalog_index: usize, service_index: usize },
    /// A service entry could not be read, e.g. it carried two spellings of
    /// the same field.
    MalformedService {
        catalog_index: usize,
        service_index: usize,
        reason: String,
    },
}

impl std::fmt::Display for CatalogAdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(msg) => write!(f, "catalog is not valid JSON: {msg}"),
            Self::UnrecognisedShape => {
                write!(f, "catalog top level must be an object or an array")
            }
            Self::MissingServices { catalog_index } => {
                write!(f, "catalog #{catalog_index} has no services list")
            }
            Self::ServiceNotObject {
                catalog_index,
                service_index,
            } => write!(
                f,
                "catalog #{catalog_index} service #{service_index} is not an object"
            ),
            Self::MissingCode {
                catalog_index,
                service_index,
            } => write!(
                f,
                "catalog #{catalog_index} service #{service_index} has empty code"
            ),
            Self::MalformedService {
                catalog_index,
                service_index,
                reason,
            } => write!(
                f,
                "catalog #{catalog_index} service #{service_index} is malformed: {reason}"
            ),
        }
    }
}

impl std::error::Error for CatalogAdapterError {}

// ---------------------------------------------------------------------------
// Internal types
// ---------------------------------------------------------------------------

/// One offered service, plus the passenger type it is priced for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub option: ServiceOption,
    /// `None` applies to every passenger type.
    pub pax_type_code: Option<String>,
}

impl CatalogEntry {
    pub fn new(option: ServiceOption) -> Self {
        Self {
            option,
            pax_type_code: None,
        }
    }

    /// `true` when this entry is offered to `pax_type` (`ADT`, `CHD`, ...).
    pub fn applies_to(&self, pax_type: &str) -> bool {
        match &self.pax_type_code {
            None => true,
            Some(p) => p.eq_ignore_ascii_case(pax_type.trim()),
        }
    }
}

/// Services offered for one leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub leg_flight_number: Option<String>,
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// All entries of several per-leg catalogs, in input order.
    pub fn flatten(catalogs: &[Catalog]) -> Vec<CatalogEntry> {
        catalogs.iter().flat_map(|c| c.entries.iter().cloned()).collect()
    }
}

// ---------------------------------------------------------------------------
// Raw wire-level structs  (catalog JSON -> these -> internal types)
// ---------------------------------------------------------------------------

/// One per-leg catalog. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    #[serde(alias = "leg_flight_number")]
    leg_flight_number: Option<RawScalar>,
    flight_number: Option<RawScalar>,
    services: Option<RawList>,
    ssr_list: Option<RawList>,
    available_services: Option<RawList>,
    ssrs: Option<RawList>,
}

/// One offered service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawService {
    #[serde(alias = "ssr_code")]
    ssr_code: Option<RawScalar>,
    code: Option<RawScalar>,
    service_code: Option<RawScalar>,
    description: Option<RawScalar>,
    ssr_name: Option<RawScalar>,
    name: Option<RawScalar>,
    ssr_description: Option<RawScalar>,
    amount: Option<RawScalar>,
    price: Option<RawScalar>,
    total_amount: Option<RawScalar>,
    currency: Option<RawScalar>,
    currency_code: Option<RawScalar>,
    vat: Option<RawList>,
    vats: Option<RawList>,
    vat_details: Option<RawList>,
    #[serde(alias = "flight_number")]
    flight_number: Option<RawScalar>,
    flight_no: Option<RawScalar>,
    #[serde(alias = "departure_date")]
    departure_date: Option<RawScalar>,
    departure_date_time: Option<RawScalar>,
    #[serde(alias = "pax_type_code")]
    pax_type_code: Option<RawScalar>,
    pax_type: Option<RawScalar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVat {
    amount: Option<RawScalar>,
    vat_amount: Option<RawScalar>,
    #[serde(alias = "tax_code")]
    tax_code: Option<RawScalar>,
    code: Option<RawScalar>,
    #[serde(alias = "tax_name")]
    tax_name: Option<RawScalar>,
    name: Option<RawScalar>,
    description: Option<RawScalar>,
}

// ---------------------------------------------------------------------------
// Normalization helpers
// ---------------------------------------------------------------------------

fn normalize_vat(raw: &Value) -> Option<VatLine> {
    let vat = RawVat::deserialize(raw).ok()?;
    Some(VatLine {
        amount_micros: first_micros(&[&vat.amount, &vat.vat_amount]).unwrap_or(0),
        tax_code: first_text(&[&vat.tax_code, &vat.code])?,
        tax_name: first_text(&[&vat.tax_name, &vat.name, &vat.description]).unwrap_or_default(),
    })
}

fn normalize_service(
    raw: &Value,
    leg_flight: Option<&str>,
    catalog_index: usize,
    service_index: usize,
) -> Result<CatalogEntry, CatalogAdapterError> {
    if !raw.is_object() {
        return Err(CatalogAdapterError::ServiceNotObject {
            catalog_index,
            service_index,
        });
    }
    let s = RawService::deserialize(raw).map_err(|e| CatalogAdapterError::MalformedService {
        catalog_index,
        service_index,
        reason: e.to_string(),
    })?;
    let code = first_text(&[&s.ssr_code, &s.code, &s.service_code]).ok_or(
        CatalogAdapterError::MissingCode {
            catalog_index,
            service_index,
        },
    )?;

    let vat_lines = first_list(&[&s.vat, &s.vats, &s.vat_details])
        .map(|lines| lines.iter().filter_map(normalize_vat).collect())
        .unwrap_or_default();
    let flight = first_text(&[&s.flight_number, &s.flight_no])
        .or_else(|| leg_flight.map(str::to_string));
    let departure = first_text(&[&s.departure_date, &s.departure_date_time])
        .and_then(|d| parse_date_prefix(&d));

    let option = ServiceOption::new(
        code,
        first_text(&[&s.description, &s.ssr_name, &s.name, &s.ssr_description])
            .unwrap_or_default(),
        first_micros(&[&s.amount, &s.price, &s.total_amount]).unwrap_or(0),
        first_text(&[&s.currency, &s.currency_code]).unwrap_or_default(),
    )
    .with_vat_lines(vat_lines)
    .with_flight(flight, departure);

    Ok(CatalogEntry {
        option,
        pax_type_code: first_text(&[&s.pax_type_code, &s.pax_type]).map(|p| p.to_ascii_uppercase()),
    })
}

fn is_service(v: &Value) -> bool {
    v.as_object()
        .is_some_and(|o| SERVICE_MARKERS.iter().any(|k| o.contains_key(*k)))
}

fn top_level(raw: &Value) -> Result<Vec<&Value>, CatalogAdapterError> {
    // A bare list of services (no per-leg wrapper) is one anonymous catalog.
    if let Some(items) = raw.as_array() {
        if items.iter().any(is_service) {
            return Ok(vec![raw]);
        }
    }
    records(raw, CATALOG_WRAPPERS).ok_or(CatalogAdapterError::UnrecognisedShape)
}

fn normalize_catalog(
    raw: &Value,
    catalog_index: usize,
    errors: &mut Vec<CatalogAdapterError>,
    strict: bool,
) -> Result<Catalog, CatalogAdapterError> {
    let c: RawCatalog;
    let (leg_flight, services): (Option<String>, &[Value]) = match raw {
        Value::Array(items) => (None, items),
        _ => {
            c = RawCatalog::deserialize(raw)
                .map_err(|_| CatalogAdapterError::MissingServices { catalog_index })?;
            let services = first_list(&[&c.services, &c.ssr_list, &c.available_services, &c.ssrs])
                .ok_or(CatalogAdapterError::MissingServices { catalog_index })?;
            (first_text(&[&c.leg_flight_number, &c.flight_number]), services)
        }
    };

    let mut entries = Vec::with_capacity(services.len());
    for (service_index, s) in services.iter().enumerate() {
        match normalize_service(s, leg_flight.as_deref(), catalog_index, service_index) {
            Ok(e) => entries.push(e),
            Err(e) if strict => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed catalog service");
                errors.push(e);
            }
        }
    }
    Ok(Catalog {
        leg_flight_number: leg_flight,
        entries,
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize a catalog document into per-leg [`Catalog`]s.
///
/// # Errors
/// Returns the first [`CatalogAdapterError`] encountered. For a variant that
/// skips bad entries instead, see [`normalize_lenient`].
pub fn normalize(raw: &Value) -> Result<Vec<Catalog>, CatalogAdapterError> {
    let mut unused = Vec::new();
    top_level(raw)?
        .into_iter()
        .enumerate()
        .map(|(i, c)| normalize_catalog(c, i, &mut unused, true))
        .collect()
}

/// Lenient variant: skip malformed catalogs and services rather than failing.
///
/// The caller receives the partial result and the list of skipped problems.
pub fn normalize_lenient(raw: &Value) -> (Vec<Catalog>, Vec<CatalogAdapterError>) {
    let mut errors = Vec::new();
    let tops = match top_level(raw) {
        Ok(t) => t,
        Err(e) => return (Vec::new(), vec![e]),
    };
    let mut catalogs = Vec::with_capacity(tops.len());
    for (i, c) in tops.into_iter().enumerate() {
        match normalize_catalog(c, i, &mut errors, false) {
            Ok(cat) => catalogs.push(cat),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed catalog");
                errors.push(e);
            }
        }
    }
    (catalogs, errors)
}

/// Parse JSON text and normalize strictly.
pub fn normalize_json(json: &str) -> Result<Vec<Catalog>, CatalogAdapterError> {
    let raw: Value =
        serde_json::from_str(json).map_err(|e| CatalogAdapterError::InvalidJson(e.to_string()))?;
    normalize(&raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
