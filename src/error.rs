//! Error types for the screening pipeline.

use thiserror::Error;

/// Errors raised by the screening pipeline.
///
/// Every variant is terminal for the analysis that raised it: the pipeline
/// never substitutes defaults for financial figures.
#[derive(Error, Debug)]
pub enum ScreenError {
    /// Fewer input rows than a computation requires.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// No expiration date 45 or more days in the future.
    #[error("no expiration date 45 days or more in the future")]
    NoFarDate,

    /// No expiration produced a usable ATM implied volatility.
    #[error("could not determine ATM IV for any expiration date")]
    NoAtmIv,

    /// A slope or ratio denominator was exactly zero.
    #[error("division by zero: {0}")]
    DivideByZero(String),

    /// Malformed quote or chain input.
    #[error("invalid quote data: {0}")]
    InvalidQuote(String),

    /// A computation that must yield a finite figure produced NaN or infinity.
    #[error("non-finite result: {0}")]
    Numerical(String),
}

pub type ScreenResult<T> = Result<T, ScreenError>;
