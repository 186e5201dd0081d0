//! Shared numeric guards. Every conversion from upstream data and every
//! division in the calculators goes through these so absent and malformed
//! values collapse to `None` in exactly one place.

/// Normalize an optional float: NaN and infinities become absent.
pub fn safe_f64(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Widen an optional integer count to f64.
pub fn safe_from_i64(value: Option<i64>) -> Option<f64> {
    value.map(|v| v as f64)
}

/// Scale a fractional field (0.1523) to a percentage (15.23).
pub fn safe_pct(value: Option<f64>) -> Option<f64> {
    safe_f64(value).map(|v| v * 100.0)
}

/// Division returning `None` on an absent operand, a zero denominator,
/// or a non-finite quotient.
pub fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let n = safe_f64(numerator)?;
    let d = safe_f64(denominator)?;
    if d == 0.0 {
        return None;
    }
    let q = n / d;
    q.is_finite().then_some(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_f64_filters_non_finite() {
        assert_eq!(safe_f64(Some(1.5)), Some(1.5));
        assert_eq!(safe_f64(Some(f64::NAN)), None);
        assert_eq!(safe_f64(Some(f64::INFINITY)), None);
        assert_eq!(safe_f64(None), None);
    }

    #[test]
    fn safe_pct_scales_fractions() {
        assert_eq!(safe_pct(Some(0.1523)), Some(15.23));
        assert_eq!(safe_pct(None), None);
    }

    #[test]
    fn safe_div_guards_denominator() {
        assert_eq!(safe_div(Some(10.0), Some(4.0)), Some(2.5));
        assert_eq!(safe_div(Some(10.0), Some(0.0)), None);
        assert_eq!(safe_div(Some(10.0), None), None);
        assert_eq!(safe_div(None, Some(4.0)), None);
        assert_eq!(safe_div(Some(f64::NAN), Some(4.0)), None);
    }

    #[test]
    fn safe_div_zero_numerator_is_zero_not_absent() {
        assert_eq!(safe_div(Some(0.0), Some(4.0)), Some(0.0));
    }
}
