// 10^22 is the largest power of ten an f64 holds exactly.
const EXACT_DECIMAL_EXPONENT: u32 = 22;

/// Rounds `x` to `digits` decimal places, ties to even.
///
/// Used to present approximations and errors; the numeric core never
/// rounds its own results. Values that cannot be scaled without leaving
/// the finite range are returned as they are.
pub fn round(x: f64, digits: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let (coarse, fine) = decimal_scale(digits);
    let scaled = x * coarse * fine;
    if scaled.is_finite() {
        scaled.round_ties_even() / fine / coarse
    } else {
        x
    }
}

/// `10^digits` as two factors, the second exact, so neither overflows on
/// its own.
fn decimal_scale(digits: u32) -> (f64, f64) {
    match digits.checked_sub(EXACT_DECIMAL_EXPONENT) {
        Some(rest) if rest > 0 => (10.0_f64.powi(rest as i32), 1e22),
        _ => (10.0_f64.powi(digits as i32), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_go_to_even() {
        assert_eq!(round(0.5, 0), 0.0);
        assert_eq!(round(1.5, 0), 2.0);
        assert_eq!(round(2.5, 0), 2.0);
        assert_eq!(round(-2.5, 0), -2.0);
        assert_eq!(round(0.125, 2), 0.12);
    }

    #[test]
    fn rounds_to_digits() {
        assert_eq!(round(0.328125, 4), 0.3281);
        assert_eq!(round(1.0 / 3.0, 6), 0.333333);
        assert_eq!(round(-2.0 / 3.0, 3), -0.667);
    }

    #[test]
    fn scale_splits_past_exact_powers() {
        assert_eq!(decimal_scale(6), (1e6, 1.0));
        assert_eq!(decimal_scale(22), (1e22, 1.0));
        assert_eq!(decimal_scale(25), (1e3, 1e22));
    }

    #[test]
    fn huge_and_non_finite_values_are_left_alone() {
        assert_eq!(round(1e300, 30), 1e300);
        assert_eq!(round(f64::INFINITY, 3), f64::INFINITY);
        assert!(round(f64::NAN, 3).is_nan());
    }
}
