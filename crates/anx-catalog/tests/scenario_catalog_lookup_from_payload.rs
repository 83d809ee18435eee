//! Catalog lookup from a drifted upstream payload
//!
//! GREEN when:
//! - A two-leg catalog response using mixed field-name variants normalizes.
//! - Per-leg candidates only include services for that leg's flight number.
//! - Priority boarding offered on one leg is still offered on the other.
//! - A leg absent from the response yields no baggage candidates.

use anx_catalog::{candidates_for, candidates_for_slot, normalize_json, Catalog};
use anx_schemas::{Category, Slot};

const PAYLOAD: &str = r#"{
  "data": [
    {
      "legFlightNumber": "FD3435",
      "services": [
        { "ssrCode": "BG15", "description": "15 kg", "amount": 400.0, "currency": "THB", "flightNumber": "FD3435", "paxTypeCode": "ADT" },
        { "ssrCode": "BG20", "description": "20 kg", "amount": 467.29, "currency": "THB", "flightNumber": "FD3435", "paxTypeCode": "ADT" },
        { "ssrCode": "MH01", "description": "Pad thai", "amount": 150, "currency": "THB", "flightNumber": "FD3435" },
        { "ssrCode": "BEV2", "description": "Orange juice", "amount": 60, "currency": "THB", "flightNumber": "FD3435" },
        { "ssrCode": "PBOD", "description": "Priority boarding", "amount": 99, "currency": "THB", "flightNumber": "FD3435" }
      ]
    },
    {
      "leg_flight_number": "FD 3436",
      "ssrList": [
        { "code": "BG20", "ssrName": "20 kg", "price": "467.29", "currencyCode": "THB" },
        { "code": "SB15", "ssrName": "Golf bag", "price": "800", "currencyCode": "THB" },
        { "code": "MS03", "ssrName": "Sandwich", "price": "90", "currencyCode": "THB" }
      ]
    }
  ]
}"#;

fn entries() -> Vec<anx_catalog::CatalogEntry> {
    let catalogs = normalize_json(PAYLOAD).unwrap();
    assert_eq!(catalogs.len(), 2);
    Catalog::flatten(&catalogs)
}

#[test]
fn outbound_leg_candidates() {
    let all = entries();
    let bags = candidates_for(&all, Some("FD3435"), Category::Baggage);
    let codes: Vec<&str> = bags.iter().map(|e| e.option.code()).collect();
    assert_eq!(codes, ["BG15", "BG20"]);

    let meals = candidates_for(&all, Some("FD3435"), Category::MealBeverage);
    let codes: Vec<&str> = meals.iter().map(|e| e.option.code()).collect();
    assert_eq!(codes, ["MH01", "BEV2"]);
}

#[test]
fn return_leg_uses_inherited_flight_number() {
    let all = entries();
    let bags = candidates_for(&all, Some("FD3436"), Category::Baggage);
    let codes: Vec<&str> = bags.iter().map(|e| e.option.code()).collect();
    assert_eq!(codes, ["BG20", "SB15"]);
    assert_eq!(bags[0].option.amount_micros(), 467_290_000);
}

#[test]
fn priority_boarding_offered_on_both_legs() {
    let all = entries();
    let out = candidates_for_slot(&all, Some("FD3435"), Slot::Pbod);
    let back = candidates_for_slot(&all, Some("FD3436"), Slot::Pbod);
    assert_eq!(out.len(), 1);
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].option.code(), "PBOD");
}

#[test]
fn unknown_leg_has_no_baggage() {
    let all = entries();
    assert!(candidates_for(&all, Some("FD1111"), Category::Baggage).is_empty());
}
