//! Core market data types for the screening pipeline.
//!
//! These mirror the shape of data a quote provider hands back: daily OHLCV
//! bars for the underlying and one option chain per expiration date. All
//! types are request-scoped and immutable once built; the pipeline never
//! mutates them.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ScreenError, ScreenResult};

/// A single daily OHLCV bar for the underlying.
///
/// Prices must be positive, with high >= max(open, close) and
/// low <= min(open, close). Bars are supplied ordered by date ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
}

/// A single option contract quote.
///
/// `bid`/`ask` are `None` when the venue returned no quote on that side.
/// `implied_volatility` is `None` (or non-finite) for unquoted or illiquid
/// contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: Decimal,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub ask: Option<Decimal>,
    #[serde(default)]
    pub implied_volatility: Option<f64>,
}

impl OptionQuote {
    /// Bid/ask midpoint, if both sides are quoted.
    pub fn mid(&self) -> Option<Decimal> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::from(2)),
            _ => None,
        }
    }

    /// Implied volatility if present and finite.
    pub fn usable_iv(&self) -> Option<f64> {
        self.implied_volatility.filter(|iv| iv.is_finite())
    }
}

/// All quotes for one expiration date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChain {
    pub expiration: NaiveDate,
    pub calls: Vec<OptionQuote>,
    pub puts: Vec<OptionQuote>,
}

/// One ticker's market data as supplied by the boundary service.
///
/// `as_of` is the trade date the analysis runs against; the pipeline never
/// reads the wall clock. Chains are expected ordered ascending by expiration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub as_of: NaiveDate,
    pub underlying_price: Decimal,
    pub price_history: Vec<PriceBar>,
    pub expirations: Vec<String>,
    pub chains: Vec<OptionChain>,
}

/// Convert a money figure to `f64` for volatility math.
pub(crate) fn to_f64(value: Decimal, what: &str) -> ScreenResult<f64> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ScreenError::Numerical(format!("{} is not representable as f64", what)))
}
