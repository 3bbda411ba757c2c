pub mod types;

pub use types::{MarketSnapshot, OptionChain, OptionQuote, PriceBar};
