//! Lenient wire-level building blocks for the `Raw*` structs of the adapters.
//!
//! The upstream booking API has renamed fields, changed scalar types and
//! wrapped lists differently across releases. Spelling variants of one name
//! (`legIndex` / `leg_index`) are `#[serde(alias)]`es on a single field;
//! genuinely different names (`description` / `ssrName`) are separate fields
//! that the adapter reads in order. Scalars and lists go through
//! [`RawScalar`] and [`Loose`] so a wrong type is absence, never a
//! deserialization failure.

use anx_schemas::micros_from_f64;
use serde::Deserialize;
use serde_json::Value;

/// A scalar that may arrive as text, a number or a bool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Other(Value),
}

impl RawScalar {
    /// Trimmed, non-empty text. Numbers are rendered as strings.
    pub fn text(&self) -> Option<String> {
        let s = match self {
            RawScalar::Text(s) => s.trim().to_string(),
            RawScalar::Int(i) => i.to_string(),
            RawScalar::Float(f) => f.to_string(),
            RawScalar::Bool(_) | RawScalar::Other(_) => return None,
        };
        (!s.is_empty()).then_some(s)
    }

    /// Amount in micros from a number or a numeric string.
    pub fn micros(&self) -> Option<i64> {
        match self {
            RawScalar::Int(i) => Some(micros_from_f64(*i as f64)),
            RawScalar::Float(f) => Some(micros_from_f64(*f)),
            RawScalar::Text(s) => s.trim().parse::<f64>().ok().map(micros_from_f64),
            _ => None,
        }
    }

    /// Integer from a number or a numeric string.
    pub fn int(&self) -> Option<i64> {
        match self {
            RawScalar::Int(i) => Some(*i),
            RawScalar::Float(f) if f.is_finite() => Some(*f as i64),
            RawScalar::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// `true`, `1`, or one of `"true" | "y" | "yes" | "1"` (case-insensitive).
    pub fn flag(&self) -> bool {
        match self {
            RawScalar::Bool(b) => *b,
            RawScalar::Int(i) => *i == 1,
            RawScalar::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "y" | "yes" | "1"
            ),
            _ => false,
        }
    }
}

/// First field among `candidates` that yields text.
pub fn first_text(candidates: &[&Option<RawScalar>]) -> Option<String> {
    candidates
        .iter()
        .find_map(|c| c.as_ref().and_then(RawScalar::text))
}

/// First field among `candidates` that yields an amount.
pub fn first_micros(candidates: &[&Option<RawScalar>]) -> Option<i64> {
    candidates
        .iter()
        .find_map(|c| c.as_ref().and_then(RawScalar::micros))
}

/// A value of the expected shape, or anything else kept aside.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Loose<T> {
    Typed(T),
    Other(Value),
}

impl<T> Loose<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            Loose::Typed(t) => Some(t),
            Loose::Other(_) => None,
        }
    }
}

/// A list field; anything that is not a list reads as absent.
pub type RawList = Loose<Vec<Value>>;

/// Items of the first list field among `candidates`.
pub fn first_list<'a>(candidates: &[&'a Option<RawList>]) -> Option<&'a [Value]> {
    candidates
        .iter()
        .copied()
        .find_map(|c| c.as_ref().and_then(Loose::typed))
        .map(Vec::as_slice)
}

/// Top-level record list: a bare array, an object wrapping an array under one
/// of `wrappers`, or a single object treated as a one-element list.
///
/// `None` for scalars.
pub fn records<'a>(v: &'a Value, wrappers: &[&str]) -> Option<Vec<&'a Value>> {
    match v {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Object(obj) => {
            let wrapped = wrappers
                .iter()
                .filter_map(|w| obj.get(*w))
                .find_map(Value::as_array);
            match wrapped {
                Some(items) => Some(items.iter().collect()),
                None => Some(vec![v]),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scalar(v: Value) -> RawScalar {
        serde_json::from_value(v).unwrap()
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        #[serde(alias = "is_ssr", alias = "isSsr", rename = "isSSR")]
        is_ssr: Option<RawScalar>,
        code: Option<RawScalar>,
        ssr_code: Option<RawScalar>,
        items: Option<RawList>,
    }

    #[test]
    fn first_variant_with_text_wins() {
        let p: Sample = serde_json::from_value(json!({ "code": "  ", "ssrCode": "BG20" })).unwrap();
        assert_eq!(first_text(&[&p.code, &p.ssr_code]).as_deref(), Some("BG20"));
    }

    #[test]
    fn amounts_from_number_or_string() {
        assert_eq!(scalar(json!(467.29)).micros(), Some(467_290_000));
        assert_eq!(scalar(json!(" 10.5 ")).micros(), Some(10_500_000));
        assert_eq!(scalar(json!(99)).micros(), Some(99_000_000));
        assert_eq!(scalar(json!("n/a")).micros(), None);
    }

    #[test]
    fn flag_spellings_and_types() {
        for v in [json!({"isSSR": true}), json!({"isSsr": "Y"}), json!({"is_ssr": 1}), json!({"isSSR": "true"})] {
            let p: Sample = serde_json::from_value(v.clone()).unwrap();
            assert!(p.is_ssr.as_ref().is_some_and(RawScalar::flag), "{v}");
        }
        for v in [json!(false), json!("N"), json!({"x": 1})] {
            assert!(!scalar(v.clone()).flag(), "{v}");
        }
    }

    #[test]
    fn wrong_types_are_absent_not_errors() {
        let p: Sample = serde_json::from_value(json!({ "code": {"nested": 1}, "items": "nope" })).unwrap();
        assert_eq!(first_text(&[&p.code]), None);
        assert!(first_list(&[&p.items]).is_none());

        let p: Sample = serde_json::from_value(json!({ "items": [1, 2] })).unwrap();
        assert_eq!(first_list(&[&p.items]).map(<[Value]>::len), Some(2));
    }

    #[test]
    fn record_shapes() {
        assert_eq!(records(&json!([1, 2]), &["data"]).unwrap().len(), 2);
        assert_eq!(records(&json!({"data": [1, 2, 3]}), &["data"]).unwrap().len(), 3);
        assert_eq!(records(&json!({"x": 1}), &["data"]).unwrap().len(), 1);
        assert!(records(&json!("nope"), &["data"]).is_none());
    }
}
