//! Pre-earnings options market screener.
//!
//! Turns raw price history and option-chain quotes into a screening verdict
//! ahead of an earnings event:
//! - Yang-Zhang realized volatility from daily OHLC bars
//! - ATM implied-volatility term structure with flat extrapolation
//! - IV30/RV30 ratio, 0-45 day term-structure slope, average volume
//! - Straddle-implied expected move
//!
//! Every component is a pure function of its explicit inputs; the caller
//! supplies the market data and the trade date, and owns any fetching or
//! caching.

pub mod analytics;
pub mod data;
pub mod error;

// Re-export commonly used types
pub use analytics::{
    extract_atm, filter_expirations, yang_zhang, yang_zhang_series, Analysis, AtmExtraction,
    AtmPoint, ChartData, CurvePoint, ScreenReport, Screener, TermPoint, TermStructureCurve,
};
pub use data::{MarketSnapshot, OptionChain, OptionQuote, PriceBar};
pub use error::{ScreenError, ScreenResult};
