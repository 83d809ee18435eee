//! Hold Adapter: normalize the post-hold booking payload into internal types.
//!
//! # Purpose
//! After a booking is held, the airline system returns, per leg,
//! `{ legIndex, origin, destination, departureDateTime, arrivalDateTime,
//! flightNumber, passengerDetails: [{ paxNumber, seatSelect, pricingDetails:
//! { taxesAndFees: [{ taxCode, taxName, amount, isSSR }] } }] }`.
//! Field names, list wrappers and the seat field's shape have all drifted
//! historically; this module accepts every variant seen and produces a
//! [`HoldSnapshot`].
//!
//! # Design constraints
//! - Pure, deterministic conversion. No IO.
//! - The payload is borrowed, never modified.
//! - Missing data is absence (`None`, empty lists), not an error. Errors are
//!   reserved for entries that cannot be attributed at all (a passenger
//!   without `paxNumber`, a leg that is not an object) or that are ambiguous
//!   (two spellings of one field in the same object).

use anx_catalog::wire::{first_list, first_micros, first_text, records, Loose, RawList, RawScalar};
use anx_schemas::{LegDescriptor, PassengerId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const LEG_WRAPPERS: &[&str] = &["data", "legs", "flights", "journeys"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// All errors that can occur during hold-payload normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldAdapterError {
    /// Input text was not JSON.
    InvalidJson(String),
    /// Top level was neither an object nor an array.
    UnrecognisedShape,
    /// A leg entry was not a JSON object.
    LegNotObject { leg_position: usize },
    /// A passenger entry was not a JSON object.
    PassengerNotObject {
        leg_position: usize,
        passenger_position: usize,
    },
    /// A passenger had no usable `paxNumber`.
    MissingPaxNumber {
        leg_position: usize,
        passenger_position: usize,
    },
    /// A leg object could not be read, e.g. it carried two spellings of the
    /// same field.
    MalformedLeg { leg_position: usize, reason: String },
    /// A passenger object could not be read.
    MalformedPassenger {
        leg_position: usize,
        passenger_position: usize,
        reason: String,
    },
}

impl std::fmt::Display for HoldAdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(msg) => write!(f, "hold payload is not valid JSON: {msg}"),
            Self::UnrecognisedShape => {
                write!(f, "hold payload top level must be an object or an array")
            }
            Self::LegNotObject { leg_position } => {
                write!(f, "hold leg #{leg_position} is not an object")
            }
            Self::PassengerNotObject {
                leg_position,
                passenger_position,
            } => write!(
                f,
                "hold leg #{leg_position} passenger #{passenger_position} is not an object"
            ),
            Self::MissingPaxNumber {
                leg_position,
                passenger_position,
            } => write!(
                f,
                "hold leg #{leg_position} passenger #{passenger_position} has no paxNumber"
            ),
            Self::MalformedLeg {
                leg_position,
                reason,
            } => write!(f, "hold leg #{leg_position} is malformed: {reason}"),
            Self::MalformedPassenger {
                leg_position,
                passenger_position,
                reason,
            } => write!(
                f,
                "hold leg #{leg_position} passenger #{passenger_position} is malformed: {reason}"
            ),
        }
    }
}

impl std::error::Error for HoldAdapterError {}

// ---------------------------------------------------------------------------
// Internal types
// ---------------------------------------------------------------------------

/// One tax/fee line of a held passenger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeLine {
    pub tax_code: String,
    pub tax_name: Option<String>,
    pub amount_micros: i64,
    /// Line is a special-service line (an ancillary), not a tax.
    pub is_ssr: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldPassenger {
    pub passenger_id: PassengerId,
    /// Seat designator, if one was assigned.
    pub seat: Option<String>,
    pub fee_lines: Vec<FeeLine>,
}

impl HoldPassenger {
    pub fn ssr_lines(&self) -> impl Iterator<Item = &FeeLine> + '_ {
        self.fee_lines.iter().filter(|l| l.is_ssr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldLeg {
    pub leg_index: Option<i64>,
    pub descriptor: LegDescriptor,
    pub departure_date_time: Option<String>,
    pub arrival_date_time: Option<String>,
    pub passengers: Vec<HoldPassenger>,
}

/// The authoritative booking as held, legs in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoldSnapshot {
    pub legs: Vec<HoldLeg>,
}

// ---------------------------------------------------------------------------
// Raw wire-level structs  (hold JSON -> these -> internal types)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHoldLeg {
    #[serde(alias = "leg_index")]
    leg_index: Option<RawScalar>,
    segment_index: Option<RawScalar>,
    origin: Option<RawScalar>,
    departure_station: Option<RawScalar>,
    from: Option<RawScalar>,
    destination: Option<RawScalar>,
    arrival_station: Option<RawScalar>,
    to: Option<RawScalar>,
    #[serde(alias = "departure_date_time")]
    departure_date_time: Option<RawScalar>,
    departure_date: Option<RawScalar>,
    #[serde(alias = "arrival_date_time")]
    arrival_date_time: Option<RawScalar>,
    arrival_date: Option<RawScalar>,
    #[serde(alias = "flight_number")]
    flight_number: Option<RawScalar>,
    flight_no: Option<RawScalar>,
    passenger_details: Option<RawList>,
    passengers: Option<RawList>,
    pax_details: Option<RawList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHoldPassenger {
    #[serde(alias = "pax_number")]
    pax_number: Option<RawScalar>,
    passenger_number: Option<RawScalar>,
    #[serde(alias = "seat_select")]
    seat_select: Option<RawSeat>,
    seat_number: Option<RawSeat>,
    seat: Option<RawSeat>,
    seat_assignment: Option<RawSeat>,
    #[serde(alias = "pricing_details")]
    pricing_details: Option<Loose<RawPricing>>,
    taxes_and_fees: Option<RawList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPricing {
    #[serde(alias = "taxes_and_fees")]
    taxes_and_fees: Option<RawList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeeLine {
    #[serde(alias = "tax_code")]
    tax_code: Option<RawScalar>,
    code: Option<RawScalar>,
    #[serde(alias = "tax_name")]
    tax_name: Option<RawScalar>,
    description: Option<RawScalar>,
    name: Option<RawScalar>,
    amount: Option<RawScalar>,
    value: Option<RawScalar>,
    #[serde(rename = "isSSR", alias = "isSsr", alias = "is_ssr")]
    is_ssr: Option<RawScalar>,
}

/// Every seat shape seen on the wire: `"12A"`, `["12A"]`,
/// `{"seatNumber": "12A"}` or `[{"seatNumber": "12A"}]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSeat {
    Text(String),
    List(Vec<RawSeat>),
    Object(RawSeatObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeatObject {
    seat_number: Option<RawScalar>,
    seat: Option<RawScalar>,
    number: Option<RawScalar>,
    designator: Option<RawScalar>,
}

// ---------------------------------------------------------------------------
// Normalization helpers
// ---------------------------------------------------------------------------

/// `"-"` and blank mean "no seat".
fn seat_text(raw: &str) -> Option<String> {
    let t = raw.trim();
    (!t.is_empty() && t != "-").then(|| t.to_string())
}

impl RawSeat {
    /// First designator found, depth-first.
    fn designator(&self) -> Option<String> {
        match self {
            RawSeat::Text(s) => seat_text(s),
            RawSeat::List(items) => items.iter().find_map(RawSeat::designator),
            RawSeat::Object(o) => [&o.seat_number, &o.seat, &o.number, &o.designator]
                .into_iter()
                .find_map(|c| c.as_ref()?.text().as_deref().and_then(seat_text)),
            RawSeat::Other(_) => None,
        }
    }
}

fn pax_id(raw: &RawScalar) -> Option<PassengerId> {
    match raw {
        RawScalar::Int(n) => Some(PassengerId::from_pax_number(*n)),
        other => other.text().and_then(|s| PassengerId::parse(&s)),
    }
}

fn normalize_fee(raw: &Value) -> Option<FeeLine> {
    let l = RawFeeLine::deserialize(raw).ok()?;
    Some(FeeLine {
        tax_code: first_text(&[&l.tax_code, &l.code])?,
        tax_name: first_text(&[&l.tax_name, &l.description, &l.name]),
        amount_micros: first_micros(&[&l.amount, &l.value]).unwrap_or(0),
        is_ssr: l.is_ssr.as_ref().is_some_and(RawScalar::flag),
    })
}

fn normalize_passenger(
    raw: &Value,
    leg_position: usize,
    passenger_position: usize,
) -> Result<HoldPassenger, HoldAdapterError> {
    if !raw.is_object() {
        return Err(HoldAdapterError::PassengerNotObject {
            leg_position,
            passenger_position,
        });
    }
    let p = RawHoldPassenger::deserialize(raw).map_err(|e| {
        HoldAdapterError::MalformedPassenger {
            leg_position,
            passenger_position,
            reason: e.to_string(),
        }
    })?;
    let passenger_id = [&p.pax_number, &p.passenger_number]
        .into_iter()
        .find_map(|c| c.as_ref().and_then(pax_id))
        .ok_or(HoldAdapterError::MissingPaxNumber {
            leg_position,
            passenger_position,
        })?;

    // An empty seatSelect does not hide a seatNumber next to it.
    let seat = [&p.seat_select, &p.seat_number, &p.seat, &p.seat_assignment]
        .into_iter()
        .find_map(|s| s.as_ref().and_then(RawSeat::designator));

    let fee_lines = p
        .pricing_details
        .as_ref()
        .and_then(Loose::typed)
        .and_then(|pricing| first_list(&[&pricing.taxes_and_fees]))
        .or_else(|| first_list(&[&p.taxes_and_fees]))
        .map(|lines| lines.iter().filter_map(normalize_fee).collect())
        .unwrap_or_default();

    Ok(HoldPassenger {
        passenger_id,
        seat,
        fee_lines,
    })
}

fn normalize_leg(
    raw: &Value,
    leg_position: usize,
    errors: &mut Vec<HoldAdapterError>,
    strict: bool,
) -> Result<HoldLeg, HoldAdapterError> {
    if !raw.is_object() {
        return Err(HoldAdapterError::LegNotObject { leg_position });
    }
    let l = RawHoldLeg::deserialize(raw).map_err(|e| HoldAdapterError::MalformedLeg {
        leg_position,
        reason: e.to_string(),
    })?;
    let departure = first_text(&[&l.departure_date_time, &l.departure_date]);
    let descriptor = LegDescriptor::from_parts(
        &first_text(&[&l.origin, &l.departure_station, &l.from]).unwrap_or_default(),
        &first_text(&[&l.destination, &l.arrival_station, &l.to]).unwrap_or_default(),
        &first_text(&[&l.flight_number, &l.flight_no]).unwrap_or_default(),
        departure.as_deref().unwrap_or_default(),
    );

    let mut passengers = Vec::new();
    let listed = first_list(&[&l.passenger_details, &l.passengers, &l.pax_details]);
    for (i, p) in listed.into_iter().flatten().enumerate() {
        match normalize_passenger(p, leg_position, i) {
            Ok(p) => passengers.push(p),
            Err(e) if strict => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unattributable hold passenger");
                errors.push(e);
            }
        }
    }

    let leg = HoldLeg {
        leg_index: [&l.leg_index, &l.segment_index]
            .into_iter()
            .find_map(|c| c.as_ref()?.int()),
        descriptor,
        departure_date_time: departure,
        arrival_date_time: first_text(&[&l.arrival_date_time, &l.arrival_date]),
        passengers,
    };
    Ok(leg)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize a hold payload into a [`HoldSnapshot`].
///
/// # Errors
/// Returns the first [`HoldAdapterError`] encountered. For a variant that
/// skips unattributable entries, see [`normalize_lenient`].
pub fn normalize(raw: &Value) -> Result<HoldSnapshot, HoldAdapterError> {
    let tops = records(raw, LEG_WRAPPERS).ok_or(HoldAdapterError::UnrecognisedShape)?;
    let mut unused = Vec::new();
    let legs = tops
        .into_iter()
        .enumerate()
        .map(|(i, l)| normalize_leg(l, i, &mut unused, true))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HoldSnapshot { legs })
}

/// Lenient variant: skip bad legs and passengers rather than failing.
pub fn normalize_lenient(raw: &Value) -> (HoldSnapshot, Vec<HoldAdapterError>) {
    let Some(tops) = records(raw, LEG_WRAPPERS) else {
        return (HoldSnapshot::default(), vec![HoldAdapterError::UnrecognisedShape]);
    };
    let mut errors = Vec::new();
    let mut legs = Vec::with_capacity(tops.len());
    for (i, l) in tops.into_iter().enumerate() {
        match normalize_leg(l, i, &mut errors, false) {
            Ok(leg) => legs.push(leg),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed hold leg");
                errors.push(e);
            }
        }
    }
    (HoldSnapshot { legs }, errors)
}

/// Parse JSON text and normalize strictly.
pub fn normalize_json(json: &str) -> Result<HoldSnapshot, HoldAdapterError> {
    let raw: Value =
        serde_json::from_str(json).map_err(|e| HoldAdapterError::InvalidJson(e.to_string()))?;
    normalize(&raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
