//! ATM quote selection and straddle pricing.
//!
//! For each expiration, picks the call and put whose strikes sit closest to
//! the underlying and averages their implied volatilities. The nearest
//! expiration that yields an ATM IV also prices the straddle used for the
//! expected-move figure.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::data::{OptionChain, OptionQuote};
use crate::error::{ScreenError, ScreenResult};

/// ATM readings for one expiration.
#[derive(Debug, Clone, Serialize)]
pub struct AtmPoint {
    pub expiration: NaiveDate,
    pub days_to_expiry: i64,
    pub strike: Decimal,
    pub call_iv: f64,
    pub put_iv: f64,
    pub atm_iv: f64,
}

/// Output of ATM extraction across all usable expirations.
#[derive(Debug, Clone)]
pub struct AtmExtraction {
    /// One entry per expiration that yielded an ATM IV, in input order.
    pub points: Vec<AtmPoint>,
    /// ATM straddle mid for the nearest usable expiration, when both legs
    /// were quoted on both sides.
    pub straddle: Option<Decimal>,
}

/// Closest-to-the-money quote; ties go to the first occurrence.
fn closest_to_money(quotes: &[OptionQuote], price: Decimal) -> Option<&OptionQuote> {
    quotes.iter().min_by_key(|q| (q.strike - price).abs())
}

/// Extract ATM IVs and the near straddle from chains ordered by expiration.
///
/// Chains with an empty side or an unquoted ATM IV are skipped without
/// error; a missing straddle quote degrades to `None`. Fails with
/// [`ScreenError::NoAtmIv`] when no chain yields an ATM IV.
pub fn extract_atm<'a>(
    underlying_price: Decimal,
    chains: impl IntoIterator<Item = &'a OptionChain>,
    today: NaiveDate,
) -> ScreenResult<AtmExtraction> {
    let mut points: Vec<AtmPoint> = Vec::new();
    let mut straddle = None;

    for chain in chains {
        if chain.calls.is_empty() || chain.puts.is_empty() {
            debug!(expiration = %chain.expiration, "skipping chain with an empty side");
            continue;
        }

        let (Some(call), Some(put)) = (
            closest_to_money(&chain.calls, underlying_price),
            closest_to_money(&chain.puts, underlying_price),
        ) else {
            continue;
        };

        let (Some(call_iv), Some(put_iv)) = (call.usable_iv(), put.usable_iv()) else {
            debug!(expiration = %chain.expiration, "skipping chain with unquoted ATM IV");
            continue;
        };

        let atm_iv = (call_iv + put_iv) / 2.0;

        if points.is_empty() {
            straddle = match (call.mid(), put.mid()) {
                (Some(call_mid), Some(put_mid)) => Some(call_mid + put_mid),
                _ => None,
            };
        }

        points.push(AtmPoint {
            expiration: chain.expiration,
            days_to_expiry: (chain.expiration - today).num_days(),
            strike: call.strike,
            call_iv,
            put_iv,
            atm_iv,
        });
    }

    if points.is_empty() {
        return Err(ScreenError::NoAtmIv);
    }
    Ok(AtmExtraction { points, straddle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn quote(strike: Decimal, iv: f64) -> OptionQuote {
        OptionQuote {
            strike,
            bid: Some(strike / dec!(20)),
            ask: Some(strike / dec!(20) + dec!(0.4)),
            implied_volatility: Some(iv),
        }
    }

    fn chain(expiration: &str, strikes_ivs: &[(Decimal, f64)]) -> OptionChain {
        let quotes: Vec<OptionQuote> = strikes_ivs.iter().map(|&(s, iv)| quote(s, iv)).collect();
        OptionChain {
            expiration: date(expiration),
            calls: quotes.clone(),
            puts: quotes,
        }
    }

    #[test]
    fn test_selects_closest_strike() {
        let chains = [chain(
            "2024-02-02",
            &[(dec!(95), 0.40), (dec!(100), 0.30), (dec!(105), 0.50)],
        )];
        let atm = extract_atm(dec!(100), &chains, date("2024-01-02")).unwrap();
        assert_eq!(atm.points.len(), 1);
        assert_eq!(atm.points[0].strike, dec!(100));
        assert!((atm.points[0].atm_iv - 0.30).abs() < 1e-12);
        assert_eq!(atm.points[0].days_to_expiry, 31);
    }

    #[test]
    fn test_tie_goes_to_first_occurrence() {
        // 95 and 105 are both 5 away; 95 comes first in chain order.
        let chains = [chain("2024-02-02", &[(dec!(95), 0.40), (dec!(105), 0.50)])];
        let atm = extract_atm(dec!(100), &chains, date("2024-01-02")).unwrap();
        assert_eq!(atm.points[0].strike, dec!(95));
    }

    #[test]
    fn test_nan_iv_skips_chain() {
        let mut bad = chain("2024-01-19", &[(dec!(100), 0.30)]);
        bad.calls[0].implied_volatility = Some(f64::NAN);
        let good = chain("2024-02-16", &[(dec!(100), 0.28)]);

        let atm = extract_atm(dec!(100), &[bad, good], date("2024-01-02")).unwrap();
        assert_eq!(atm.points.len(), 1);
        assert_eq!(atm.points[0].expiration, date("2024-02-16"));
    }

    #[test]
    fn test_no_atm_iv_anywhere() {
        let mut bad = chain("2024-01-19", &[(dec!(100), 0.30)]);
        bad.puts[0].implied_volatility = None;
        let empty = OptionChain {
            expiration: date("2024-02-16"),
            calls: vec![quote(dec!(100), 0.3)],
            puts: vec![],
        };
        let err = extract_atm(dec!(100), &[bad, empty], date("2024-01-02")).unwrap_err();
        assert!(matches!(err, ScreenError::NoAtmIv));
    }

    #[test]
    fn test_straddle_from_first_usable_expiration() {
        let empty_side = OptionChain {
            expiration: date("2024-01-12"),
            calls: vec![quote(dec!(100), 0.35)],
            puts: vec![],
        };
        let near = chain("2024-01-19", &[(dec!(100), 0.32)]);
        let far = chain("2024-02-16", &[(dec!(100), 0.28)]);

        let atm = extract_atm(dec!(100), &[empty_side, near, far], date("2024-01-02")).unwrap();
        // Both legs quote bid 5.0 / ask 5.4 at strike 100 -> mid 5.2 per leg.
        assert_eq!(atm.straddle, Some(dec!(10.4)));
        assert_eq!(atm.points.len(), 2);
    }

    #[test]
    fn test_missing_bid_degrades_straddle() {
        let mut near = chain("2024-01-19", &[(dec!(100), 0.32)]);
        near.calls[0].bid = None;
        let far = chain("2024-02-16", &[(dec!(100), 0.28)]);

        let atm = extract_atm(dec!(100), &[near, far], date("2024-01-02")).unwrap();
        assert_eq!(atm.straddle, None);
        // The expiration still contributes its ATM IV.
        assert_eq!(atm.points.len(), 2);
    }
}
