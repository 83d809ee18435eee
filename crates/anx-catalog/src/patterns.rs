//! Service-code patterns.
//!
//! Codes are matched after [`normalize_code`], anchored at both ends:
//!
//! | slot       | pattern            |
//! |------------|--------------------|
//! | `checked`  | `BG\d{2}`          |
//! | `special`  | `SB\d{2}`          |
//! | `meal`     | `MH\d{2}`, `MS\d{2}` |
//! | `beverage` | `BEV\d{1,2}`       |
//! | `pbod`     | `PBOD`             |
//!
//! Seat designators have no code pattern; seats never classify.

use anx_schemas::{normalize_code, Slot};
use once_cell::sync::Lazy;
use regex::Regex;

static CHECKED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^BG\d{2}$").unwrap());
static SPECIAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^SB\d{2}$").unwrap());
static MEAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^M[HS]\d{2}$").unwrap());
static BEVERAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^BEV\d{1,2}$").unwrap());

const PBOD: &str = "PBOD";

/// Slot a service code belongs to, or `None` for codes outside every pattern.
pub fn classify_code(raw: &str) -> Option<Slot> {
    let code = normalize_code(raw);
    if CHECKED_RE.is_match(&code) {
        Some(Slot::Checked)
    } else if SPECIAL_RE.is_match(&code) {
        Some(Slot::Special)
    } else if MEAL_RE.is_match(&code) {
        Some(Slot::Meal)
    } else if BEVERAGE_RE.is_match(&code) {
        Some(Slot::Beverage)
    } else if code == PBOD {
        Some(Slot::Pbod)
    } else {
        None
    }
}

/// Static display name used when the airline line carries no description.
pub fn builtin_display_name(raw: &str) -> Option<String> {
    let code = normalize_code(raw);
    let slot = classify_code(&code)?;
    let name = match slot {
        Slot::Checked => format!("Checked baggage {} kg", &code[2..]),
        Slot::Special => format!("Special baggage {} kg", &code[2..]),
        Slot::Meal if code.starts_with("MH") => "Hot meal".to_string(),
        Slot::Meal => "Snack meal".to_string(),
        Slot::Beverage => "Beverage".to_string(),
        Slot::Pbod => "Priority boarding".to_string(),
        Slot::Seat => return None,
    };
    Some(name)
}
