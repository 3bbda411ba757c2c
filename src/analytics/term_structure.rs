//! ATM implied-volatility term structure.
//!
//! Piecewise-linear in days-to-expiry, flat beyond the knots on both sides.
//! The curve is immutable once built and freely shareable across threads.

use serde::Serialize;

use crate::analytics::expirations::FAR_CUTOFF_DAYS;
use crate::error::{ScreenError, ScreenResult};

/// One knot of the term structure.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TermPoint {
    pub days_to_expiry: i64,
    pub implied_vol: f64,
}

/// A sampled point of the fitted curve, for charting.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CurvePoint {
    pub dte: i64,
    pub iv: f64,
}

/// Piecewise-linear IV term structure over sorted DTE knots.
#[derive(Debug, Clone)]
pub struct TermStructureCurve {
    points: Vec<TermPoint>,
}

impl TermStructureCurve {
    /// Build the curve from knots in any order. Needs at least two.
    ///
    /// Knots are not deduplicated here; the caller derives one point per
    /// expiration date upstream.
    pub fn new(mut points: Vec<TermPoint>) -> ScreenResult<Self> {
        if points.len() < 2 {
            return Err(ScreenError::InsufficientData(format!(
                "term structure needs at least 2 points, got {}",
                points.len()
            )));
        }
        points.sort_by_key(|p| p.days_to_expiry);
        Ok(Self { points })
    }

    /// The sorted knots.
    pub fn points(&self) -> &[TermPoint] {
        &self.points
    }

    /// DTE of the nearest knot.
    pub fn front_dte(&self) -> i64 {
        self.points[0].days_to_expiry
    }

    /// Evaluate the curve at a DTE.
    ///
    /// Flat below the first knot and above the last, exact at knots, linear
    /// between bracketing knots.
    pub fn iv(&self, dte: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if dte <= first.days_to_expiry as f64 {
            return first.implied_vol;
        }
        if dte >= last.days_to_expiry as f64 {
            return last.implied_vol;
        }

        let mut lo = first;
        for hi in &self.points[1..] {
            let x1 = hi.days_to_expiry as f64;
            if dte <= x1 {
                if dte == x1 {
                    return hi.implied_vol;
                }
                let x0 = lo.days_to_expiry as f64;
                let frac = (dte - x0) / (x1 - x0);
                return lo.implied_vol + frac * (hi.implied_vol - lo.implied_vol);
            }
            lo = *hi;
        }
        last.implied_vol
    }

    /// Integer-DTE samples from the first knot out to at least 45 days.
    pub fn sample(&self) -> Vec<CurvePoint> {
        let start = self.points[0].days_to_expiry;
        let end = self.points[self.points.len() - 1]
            .days_to_expiry
            .max(FAR_CUTOFF_DAYS);
        (start..=end)
            .map(|dte| CurvePoint {
                dte,
                iv: self.iv(dte as f64),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(days_to_expiry: i64, implied_vol: f64) -> TermPoint {
        TermPoint {
            days_to_expiry,
            implied_vol,
        }
    }

    fn curve() -> TermStructureCurve {
        // Deliberately unsorted input.
        TermStructureCurve::new(vec![point(30, 0.25), point(7, 0.30), point(60, 0.28)]).unwrap()
    }

    #[test]
    fn test_flat_extrapolation_below_and_above() {
        let curve = curve();
        assert_eq!(curve.iv(5.0), 0.30);
        assert_eq!(curve.iv(90.0), 0.28);
    }

    #[test]
    fn test_knots_round_trip_exactly() {
        let curve = curve();
        assert_eq!(curve.iv(7.0), 0.30);
        assert_eq!(curve.iv(30.0), 0.25);
        assert_eq!(curve.iv(60.0), 0.28);
    }

    #[test]
    fn test_linear_interpolation_between_knots() {
        let curve = curve();
        // 0.25 + (45-30)/(60-30) * (0.28-0.25)
        assert!((curve.iv(45.0) - 0.265).abs() < 1e-12);
    }

    #[test]
    fn test_needs_two_points() {
        let err = TermStructureCurve::new(vec![point(30, 0.25)]).unwrap_err();
        assert!(matches!(err, ScreenError::InsufficientData(_)));
    }

    #[test]
    fn test_sample_spans_front_knot_to_45() {
        let curve =
            TermStructureCurve::new(vec![point(10, 0.30), point(30, 0.25)]).unwrap();
        let samples = curve.sample();
        assert_eq!(samples.first().unwrap().dte, 10);
        assert_eq!(samples.last().unwrap().dte, 45);
        assert_eq!(samples.last().unwrap().iv, 0.25);
    }

    #[test]
    fn test_front_dte_is_min_knot() {
        assert_eq!(curve().front_dte(), 7);
    }
}
