/// Micros scale (1e-6) used for service amounts.
///
/// Amounts are carried for display only; pricing math belongs to the airline
/// system.
pub const MICROS_SCALE: i64 = 1_000_000;

/// Convert a wire amount to micros, rounding half away from zero.
///
/// Non-finite input maps to 0.
pub fn micros_from_f64(amount: f64) -> i64 {
    if !amount.is_finite() {
        return 0;
    }
    (amount * MICROS_SCALE as f64).round() as i64
}

pub fn micros_to_f64(micros: i64) -> f64 {
    micros as f64 / MICROS_SCALE as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thai_baht_amount_survives_scaling() {
        assert_eq!(micros_from_f64(467.29), 467_290_000);
        assert!((micros_to_f64(467_290_000) - 467.29).abs() < 1e-9);
    }

    #[test]
    fn non_finite_is_zero() {
        assert_eq!(micros_from_f64(f64::NAN), 0);
        assert_eq!(micros_from_f64(f64::INFINITY), 0);
    }
}
