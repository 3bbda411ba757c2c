//! Screening analytics.
//!
//! Provides:
//! - Expiration filtering around the 45-day cutoff
//! - Yang-Zhang realized volatility and volume statistics
//! - ATM quote extraction and straddle pricing
//! - Term-structure construction and evaluation
//! - The screening engine and report assembly

pub mod atm;
pub mod expirations;
pub mod screener;
pub mod term_structure;
pub mod volatility;

pub use atm::{extract_atm, AtmExtraction, AtmPoint};
pub use expirations::{filter_expirations, FAR_CUTOFF_DAYS};
pub use screener::{screen, Analysis, ChartData, ScreenReport, Screener};
pub use term_structure::{CurvePoint, TermPoint, TermStructureCurve};
pub use volatility::{
    average_volume, realized_vol_profile, yang_zhang, yang_zhang_series, VolPoint, DEFAULT_WINDOW,
    TRADING_PERIODS,
};
