//! Realized volatility and volume statistics from daily bars.
//!
//! The realized-volatility estimator is Yang-Zhang (2000): overnight,
//! close-to-close and Rogers-Satchell components combined so the estimate
//! stays unbiased under opening jumps and drift. The exact formula (the k
//! weight, the 1/(window-1) normalization, the window alignment) is part of
//! the contract with downstream thresholds; do not swap in a close-to-close
//! standard deviation.

use serde::Serialize;
use tracing::debug;

use crate::data::types::to_f64;
use crate::data::PriceBar;
use crate::error::{ScreenError, ScreenResult};

/// Trading sessions per year used for annualization.
pub const TRADING_PERIODS: usize = 252;

/// Default trailing window, in sessions.
pub const DEFAULT_WINDOW: usize = 30;

/// A realized-volatility reading for one window length.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolPoint {
    pub window: usize,
    pub rv: f64,
}

/// Annualized Yang-Zhang volatility at the most recent session.
///
/// Requires `window + 1` bars so the trailing window is fully formed.
pub fn yang_zhang(bars: &[PriceBar], window: usize, trading_periods: usize) -> ScreenResult<f64> {
    let series = yang_zhang_series(bars, window, trading_periods)?;
    series.last().copied().ok_or_else(|| {
        ScreenError::InsufficientData("yang-zhang produced an empty series".to_string())
    })
}

/// Trailing Yang-Zhang series, leading unformed windows dropped.
///
/// With `n` bars the result has `n - window` entries, the last of which is
/// the [`yang_zhang`] scalar.
pub fn yang_zhang_series(
    bars: &[PriceBar],
    window: usize,
    trading_periods: usize,
) -> ScreenResult<Vec<f64>> {
    if window < 2 {
        return Err(ScreenError::InvalidQuote(
            "yang-zhang window must be at least 2 sessions".to_string(),
        ));
    }
    if bars.len() < window + 1 {
        return Err(ScreenError::InsufficientData(format!(
            "yang-zhang window {} needs {} bars, got {}",
            window,
            window + 1,
            bars.len()
        )));
    }

    let n = bars.len();
    let mut oc_sq = Vec::with_capacity(n - 1);
    let mut cc_sq = Vec::with_capacity(n - 1);
    let mut rs = Vec::with_capacity(n - 1);

    for t in 1..n {
        let open = to_f64(bars[t].open, "open")?;
        let high = to_f64(bars[t].high, "high")?;
        let low = to_f64(bars[t].low, "low")?;
        let close = to_f64(bars[t].close, "close")?;
        let prev_close = to_f64(bars[t - 1].close, "close")?;
        if open <= 0.0 || high <= 0.0 || low <= 0.0 || close <= 0.0 || prev_close <= 0.0 {
            return Err(ScreenError::InvalidQuote(format!(
                "non-positive price in bar {}",
                bars[t].date
            )));
        }

        let log_ho = (high / open).ln();
        let log_lo = (low / open).ln();
        let log_co = (close / open).ln();
        let log_oc = (open / prev_close).ln();
        let log_cc = (close / prev_close).ln();

        oc_sq.push(log_oc * log_oc);
        cc_sq.push(log_cc * log_cc);
        rs.push(log_ho * (log_ho - log_co) + log_lo * (log_lo - log_co));
    }

    let w = window as f64;
    let norm = 1.0 / (w - 1.0);
    let k = 0.34 / (1.34 + (w + 1.0) / (w - 1.0));
    let annualizer = (trading_periods as f64).sqrt();

    let mut out = Vec::with_capacity(n - window);
    for end in window..=oc_sq.len() {
        let open_vol = oc_sq[end - window..end].iter().sum::<f64>() * norm;
        let close_vol = cc_sq[end - window..end].iter().sum::<f64>() * norm;
        let window_rs = rs[end - window..end].iter().sum::<f64>() * norm;

        let variance = open_vol + k * close_vol + (1.0 - k) * window_rs;
        if !variance.is_finite() || variance < 0.0 {
            return Err(ScreenError::Numerical(format!(
                "yang-zhang variance {} in window ending at bar {}",
                variance, bars[end].date
            )));
        }
        out.push(variance.sqrt() * annualizer);
    }
    Ok(out)
}

/// Trailing mean of daily share volume over the most recent `window` sessions.
pub fn average_volume(bars: &[PriceBar], window: usize) -> ScreenResult<f64> {
    if window == 0 {
        return Err(ScreenError::InvalidQuote(
            "volume window must be at least 1 session".to_string(),
        ));
    }
    if bars.len() < window {
        return Err(ScreenError::InsufficientData(format!(
            "average volume needs {} sessions, got {}",
            window,
            bars.len()
        )));
    }
    let total: i64 = bars[bars.len() - window..].iter().map(|b| b.volume).sum();
    Ok(total as f64 / window as f64)
}

/// Realized-volatility readings across several windows, for charting.
///
/// Windows the history cannot support are skipped rather than reported.
pub fn realized_vol_profile(bars: &[PriceBar], windows: &[usize]) -> Vec<VolPoint> {
    windows
        .iter()
        .filter_map(|&window| match yang_zhang(bars, window, TRADING_PERIODS) {
            Ok(rv) => Some(VolPoint { window, rv }),
            Err(err) => {
                debug!(window, %err, "skipping realized-vol window");
                None
            }
        })
        .collect()
}
