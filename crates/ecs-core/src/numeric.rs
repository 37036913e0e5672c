//! Float guards shared by the network step, scenario parsing and run loop.

use crate::{EcsError, EcsResult};

pub fn ensure_finite(value: f64, what: &'static str) -> EcsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EcsError::NonFinite { what, value })
    }
}

/// A usable timestep: finite and strictly positive.
pub fn ensure_step(dt: f64, what: &'static str) -> EcsResult<f64> {
    let dt = ensure_finite(dt, what)?;
    if dt > 0.0 {
        Ok(dt)
    } else {
        Err(EcsError::InvalidArg { what })
    }
}

/// `num / den` clamped to `[0, 1]`. Zero when `den` is not positive.
pub fn unit_ratio(num: f64, den: f64) -> f64 {
    if den.is_nan() || den <= 0.0 || !num.is_finite() {
        return 0.0;
    }
    (num / den).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ensure_finite_names_the_value() {
        let err = ensure_finite(f64::NAN, "leaksize").unwrap_err();
        assert!(matches!(err, EcsError::NonFinite { what: "leaksize", .. }));
        assert_eq!(ensure_finite(2.5, "leaksize"), Ok(2.5));
    }

    #[test]
    fn step_must_be_positive() {
        assert_eq!(ensure_step(0.5, "dt"), Ok(0.5));
        assert!(matches!(ensure_step(0.0, "dt"), Err(EcsError::InvalidArg { what: "dt" })));
        assert!(matches!(ensure_step(-1.0, "dt"), Err(EcsError::InvalidArg { .. })));
        assert!(matches!(ensure_step(f64::INFINITY, "dt"), Err(EcsError::NonFinite { .. })));
    }

    #[test]
    fn ratio_guards_empty_denominator() {
        assert_eq!(unit_ratio(1.0, 0.0), 0.0);
        assert_eq!(unit_ratio(1.0, -2.0), 0.0);
        assert_eq!(unit_ratio(3.0, 4.0), 0.75);
        assert_eq!(unit_ratio(9.0, 4.0), 1.0);
    }

    proptest! {
        #[test]
        fn ratio_stays_in_unit_interval(num in -1e6_f64..1e6, den in -1e3_f64..1e3) {
            let r = unit_ratio(num, den);
            prop_assert!((0.0..=1.0).contains(&r));
        }
    }
}
