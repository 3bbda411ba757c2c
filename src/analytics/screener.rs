//! Screening engine and pipeline assembly.
//!
//! Combines the realized-volatility estimate, the ATM term structure and the
//! near straddle into three independent pass/fail criteria:
//! - 30-session average volume at or above 1.5M shares
//! - IV30/RV30 at or above 1.25
//! - 0-45 day term-structure slope at or below -0.00406
//!
//! The three booleans are never combined into a single verdict here; how
//! many must pass to constitute a trade signal is the caller's call.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::atm::{extract_atm, AtmPoint};
use crate::analytics::expirations::{filter_expirations, FAR_CUTOFF_DAYS};
use crate::analytics::term_structure::{CurvePoint, TermPoint, TermStructureCurve};
use crate::analytics::volatility::{
    average_volume, realized_vol_profile, yang_zhang, VolPoint, DEFAULT_WINDOW, TRADING_PERIODS,
};
use crate::data::types::to_f64;
use crate::data::{MarketSnapshot, OptionChain, PriceBar};
use crate::error::{ScreenError, ScreenResult};

/// Minimum 30-session average share volume.
pub const MIN_AVG_VOLUME: f64 = 1_500_000.0;

/// Minimum IV30/RV30 ratio.
pub const MIN_IV30_RV30: f64 = 1.25;

/// Maximum 0-45 day term-structure slope.
pub const MAX_TS_SLOPE: f64 = -0.00406;

/// Realized-vol chart windows.
const PROFILE_WINDOWS: &[usize] = &[10, 20, 30, 60, 90];

/// Maximum per-expiration ATM rows carried in the report.
const MAX_OPTION_ROWS: usize = 5;

/// The screening verdict: three independent criteria plus the expected move.
///
/// Serialized field names match the analysis block consumed by charting
/// clients (`avg_volume`, `iv30_rv30` and `ts_slope_0_45` carry the
/// booleans; the `_value` fields carry the figures).
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    #[serde(rename = "avg_volume")]
    pub avg_volume_pass: bool,
    pub avg_volume_value: f64,
    #[serde(rename = "iv30_rv30")]
    pub iv30_rv30_pass: bool,
    pub iv30_rv30_value: f64,
    #[serde(rename = "ts_slope_0_45")]
    pub ts_slope_pass: bool,
    #[serde(rename = "ts_slope_0_45_value")]
    pub ts_slope_value: f64,
    pub expected_move: Option<String>,
    pub expected_move_value: Option<f64>,
    pub rv30: f64,
    pub iv30: f64,
}

/// Chart-ready intermediates returned alongside the verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub term_structure: Vec<CurvePoint>,
    pub option_data: Vec<AtmPoint>,
    pub volatility: Vec<VolPoint>,
}

/// Full screening output for one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenReport {
    pub ticker: String,
    pub current_price: Decimal,
    pub analysis: Analysis,
    pub chart: ChartData,
}

impl ScreenReport {
    /// Human-readable report.
    pub fn summary(&self) -> String {
        let a = &self.analysis;
        format!(
            "Earnings Screen: {}\n\
             ========================\n\
             \n\
             Price: ${}\n\
             \n\
             Avg Volume (30d): {:.0} [{}]\n\
             IV30/RV30: {:.4} (iv30 {:.4}, rv30 {:.4}) [{}]\n\
             Term Slope 0-45: {:.5} [{}]\n\
             Expected Move: {}",
            self.ticker,
            self.current_price,
            a.avg_volume_value,
            pass_str(a.avg_volume_pass),
            a.iv30_rv30_value,
            a.iv30,
            a.rv30,
            pass_str(a.iv30_rv30_pass),
            a.ts_slope_value,
            pass_str(a.ts_slope_pass),
            a.expected_move.as_deref().unwrap_or("n/a"),
        )
    }
}

fn pass_str(pass: bool) -> &'static str {
    if pass {
        "PASS"
    } else {
        "FAIL"
    }
}

fn ensure_finite(value: f64, what: &str) -> ScreenResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScreenError::Numerical(format!("{} is not finite", what)))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Apply the three screening criteria.
///
/// `rv30` must come from a 30-session Yang-Zhang window; `curve` is the ATM
/// term structure whose nearest knot is the nearest usable expiration.
/// Fails with [`ScreenError::DivideByZero`] when that knot sits exactly 45
/// days out, leaving the slope undefined.
pub fn screen(
    rv30: f64,
    curve: &TermStructureCurve,
    straddle: Option<Decimal>,
    underlying_price: Decimal,
    price_history: &[PriceBar],
) -> ScreenResult<Analysis> {
    let rv30 = ensure_finite(rv30, "rv30")?;
    if rv30 == 0.0 {
        return Err(ScreenError::DivideByZero("rv30 is zero".to_string()));
    }
    let iv30 = ensure_finite(curve.iv(30.0), "iv30")?;
    let iv30_rv30 = ensure_finite(iv30 / rv30, "iv30/rv30")?;

    let front_dte = curve.front_dte();
    if front_dte == FAR_CUTOFF_DAYS {
        return Err(ScreenError::DivideByZero(
            "nearest expiration is exactly 45 days out".to_string(),
        ));
    }
    let far = FAR_CUTOFF_DAYS as f64;
    let ts_slope = ensure_finite(
        (curve.iv(far) - curve.iv(front_dte as f64)) / (far - front_dte as f64),
        "ts_slope_0_45",
    )?;

    let avg_volume = ensure_finite(
        average_volume(price_history, DEFAULT_WINDOW)?,
        "avg_volume",
    )?;

    let (expected_move, expected_move_value) = match straddle {
        Some(straddle) => {
            let straddle = to_f64(straddle, "straddle")?;
            let price = to_f64(underlying_price, "underlying price")?;
            if price <= 0.0 {
                return Err(ScreenError::InvalidQuote(
                    "non-positive underlying price".to_string(),
                ));
            }
            let pct = ensure_finite(straddle / price * 100.0, "expected move")?;
            (Some(format!("{:.2}%", pct)), Some(round2(straddle)))
        }
        None => (None, None),
    };

    info!(
        iv30,
        rv30,
        ratio = iv30_rv30,
        slope = ts_slope,
        avg_volume,
        "screen criteria computed"
    );

    Ok(Analysis {
        avg_volume_pass: avg_volume >= MIN_AVG_VOLUME,
        avg_volume_value: avg_volume,
        iv30_rv30_pass: iv30_rv30 >= MIN_IV30_RV30,
        iv30_rv30_value: iv30_rv30,
        ts_slope_pass: ts_slope <= MAX_TS_SLOPE,
        ts_slope_value: ts_slope,
        expected_move,
        expected_move_value,
        rv30,
        iv30,
    })
}

/// Stateless pipeline front-end.
///
/// Composes expiration filtering, ATM extraction, term-structure
/// construction, realized volatility and the screening criteria over one
/// [`MarketSnapshot`].
pub struct Screener;

impl Screener {
    /// Run the full screen over one snapshot.
    pub fn analyze(snapshot: &MarketSnapshot) -> ScreenResult<ScreenReport> {
        let expirations = filter_expirations(&snapshot.expirations, snapshot.as_of)?;
        debug!(
            ticker = %snapshot.ticker,
            kept = expirations.len(),
            "filtered expiration dates"
        );

        // Restrict supplied chains to the filtered dates, in date order.
        let chains: Vec<&OptionChain> = expirations
            .iter()
            .filter_map(|date| snapshot.chains.iter().find(|c| c.expiration == *date))
            .collect();

        let extraction =
            extract_atm(snapshot.underlying_price, chains, snapshot.as_of)?;

        let points: Vec<TermPoint> = extraction
            .points
            .iter()
            .map(|p| TermPoint {
                days_to_expiry: p.days_to_expiry,
                implied_vol: p.atm_iv,
            })
            .collect();
        let curve = TermStructureCurve::new(points)?;

        let rv30 = yang_zhang(&snapshot.price_history, DEFAULT_WINDOW, TRADING_PERIODS)?;

        let analysis = screen(
            rv30,
            &curve,
            extraction.straddle,
            snapshot.underlying_price,
            &snapshot.price_history,
        )?;

        let chart = ChartData {
            term_structure: curve.sample(),
            option_data: extraction
                .points
                .iter()
                .take(MAX_OPTION_ROWS)
                .cloned()
                .collect(),
            volatility: realized_vol_profile(&snapshot.price_history, PROFILE_WINDOWS),
        };

        Ok(ScreenReport {
            ticker: snapshot.ticker.clone(),
            current_price: snapshot.underlying_price,
            analysis,
            chart,
        })
    }
}
