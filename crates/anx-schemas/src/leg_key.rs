//! Canonical leg-key decoder.
//!
//! Leg keys are opaque to the selection store. Anything that needs the route,
//! flight number or date of a leg decodes it here, once, with one grammar:
//!
//! ```text
//! ORG <sep> DST <sep> FLIGHT [<sep> DATE]
//!   sep    := one or more of '-', '_', '|', whitespace
//!   FLIGHT := designator (2-char IATA or 3-letter ICAO), optional '-'/space,
//!             1-5 digits, optional suffix letter
//!   DATE   := YYYY-MM-DD | YYYYMMDD
//! ```
//!
//! The canonical encoding is `ORG-DST-FLIGHT-YYYY-MM-DD` with a normalized
//! flight number.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::LegKey;

static LEG_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*([A-Za-z]{3})[\s_|-]+([A-Za-z]{3})[\s_|-]+((?:[A-Za-z]{3}|[A-Za-z0-9]{2})[\s-]?\d{1,5}[A-Za-z]?)(?:[\s_|-]+(\d{4}-\d{2}-\d{2}|\d{8}))?\s*$",
    )
    .expect("leg key grammar is a valid regex")
});

/// Uppercase, drop whitespace and hyphens, strip leading zeros from the
/// numeric part (`"fd 0345"` -> `"FD345"`, `"THA0123"` -> `"THA123"`).
pub fn normalize_flight_number(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if cleaned.len() < 3 || !cleaned.is_ascii() {
        return cleaned;
    }
    let (designator, rest) = cleaned.split_at(designator_len(&cleaned));
    let digit_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_len == 0 {
        return cleaned;
    }
    let (digits, suffix) = rest.split_at(digit_len);
    let digits = match digits.trim_start_matches('0') {
        "" => "0",
        d => d,
    };
    format!("{designator}{digits}{suffix}")
}

/// Three letters followed by a digit is an ICAO designator; anything else
/// is read as a 2-character IATA designator.
fn designator_len(cleaned: &str) -> usize {
    let b = cleaned.as_bytes();
    let icao = b.len() > 3 && b[..3].iter().all(u8::is_ascii_alphabetic) && b[3].is_ascii_digit();
    if icao {
        3
    } else {
        2
    }
}

/// Parse a date from `YYYY-MM-DD`, `YYYYMMDD`, or a datetime string that
/// starts with `YYYY-MM-DD`.
pub fn parse_date_prefix(raw: &str) -> Option<NaiveDate> {
    let t = raw.trim();
    if let Some(head) = t.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
            return Some(d);
        }
    }
    t.get(..8)
        .filter(|h| h.chars().all(|c| c.is_ascii_digit()))
        .and_then(|h| NaiveDate::parse_from_str(h, "%Y%m%d").ok())
}

/// Route, flight number and date of one leg.
///
/// Empty strings / `None` mean "not known"; [`LegDescriptor::matches`] only
/// compares fields known on both sides, except the flight number, which must
/// be present and equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LegDescriptor {
    pub origin: String,
    pub destination: String,
    pub flight_number: String,
    pub date: Option<NaiveDate>,
}

impl LegDescriptor {
    pub fn new(origin: &str, destination: &str, flight_number: &str, date: Option<NaiveDate>) -> Self {
        Self {
            origin: origin.trim().to_ascii_uppercase(),
            destination: destination.trim().to_ascii_uppercase(),
            flight_number: normalize_flight_number(flight_number),
            date,
        }
    }

    /// Descriptor from free-form parts, with `date` given as any date or
    /// datetime string (see module docs).
    pub fn from_parts(origin: &str, destination: &str, flight_number: &str, date: &str) -> Self {
        Self::new(origin, destination, flight_number, parse_date_prefix(date))
    }

    /// Decode a leg key. `None` when the key does not follow the grammar.
    pub fn decode(key: &LegKey) -> Option<Self> {
        let caps = LEG_KEY_RE.captures(key.as_str())?;
        let date = match caps.get(4) {
            Some(m) => Some(parse_date_prefix(m.as_str())?),
            None => None,
        };
        Some(Self::new(&caps[1], &caps[2], &caps[3], date))
    }

    /// Canonical `ORG-DST-FLIGHT[-YYYY-MM-DD]` key.
    ///
    /// `None` when origin, destination or flight number is unknown.
    pub fn encode(&self) -> Option<LegKey> {
        if self.origin.is_empty() || self.destination.is_empty() || self.flight_number.is_empty() {
            return None;
        }
        let mut s = format!("{}-{}-{}", self.origin, self.destination, self.flight_number);
        if let Some(d) = self.date {
            s.push('-');
            s.push_str(&d.format("%Y-%m-%d").to_string());
        }
        LegKey::parse(&s)
    }

    /// Same leg, comparing only what both sides know.
    pub fn matches(&self, other: &LegDescriptor) -> bool {
        if self.flight_number.is_empty() || self.flight_number != other.flight_number {
            return false;
        }
        let known_eq = |a: &str, b: &str| a.is_empty() || b.is_empty() || a == b;
        if !known_eq(&self.origin, &other.origin) || !known_eq(&self.destination, &other.destination) {
            return false;
        }
        match (self.date, other.date) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}
