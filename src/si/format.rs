//! Number rendering for SI text

/// How a missing value is printed
pub const MISSING_TEXT: &str = "nan";

/// Fixed number of decimals; missing prints as `nan`
pub fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => MISSING_TEXT.to_string(),
    }
}

/// Round to `digits` significant figures, keeping trailing zeros.
///
/// Zero prints as `0`; missing prints as `nan`.
pub fn sig_figs(value: Option<f64>, digits: u32) -> String {
    let v = match value {
        Some(v) => v,
        None => return MISSING_TEXT.to_string(),
    };
    if v == 0.0 {
        return "0".to_string();
    }

    let magnitude = v.abs().log10().floor() as i32;
    let decimals = digits as i32 - 1 - magnitude;
    if decimals <= 0 {
        let step = 10f64.powi(-decimals);
        format!("{:.0}", (v / step).round() * step)
    } else {
        format!("{:.*}", decimals as usize, v)
    }
}

/// `numerator / denominator`, missing when either side is missing or the
/// denominator is zero
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(Some(53.5812), 2), "53.58");
        assert_eq!(fixed(Some(1000.0), 1), "1000.0");
        assert_eq!(fixed(None, 2), "nan");
    }

    #[test]
    fn test_sig_figs_keeps_trailing_zeros() {
        assert_eq!(sig_figs(Some(50.0), 3), "50.0");
        assert_eq!(sig_figs(Some(100.0), 4), "100.0");
        assert_eq!(sig_figs(Some(0.05), 3), "0.0500");
    }

    #[test]
    fn test_sig_figs_rounds() {
        assert_eq!(sig_figs(Some(49.87), 3), "49.9");
        assert_eq!(sig_figs(Some(199.82), 4), "199.8");
        assert_eq!(sig_figs(Some(0.0501234), 3), "0.0501");
    }

    #[test]
    fn test_sig_figs_large_values() {
        assert_eq!(sig_figs(Some(1234.5), 3), "1230");
        assert_eq!(sig_figs(Some(987.6), 3), "988");
        assert_eq!(sig_figs(Some(-1234.5), 2), "-1200");
    }

    #[test]
    fn test_sig_figs_zero_and_missing() {
        assert_eq!(sig_figs(Some(0.0), 3), "0");
        assert_eq!(sig_figs(None, 3), "nan");
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(Some(10.0), Some(4.0)), Some(2.5));
        assert_eq!(ratio(Some(10.0), Some(0.0)), None);
        assert_eq!(ratio(None, Some(4.0)), None);
        assert_eq!(ratio(Some(10.0), None), None);
    }
}
