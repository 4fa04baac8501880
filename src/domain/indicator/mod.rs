//! Technical indicator calculations over a bounded price window.
//!
//! Every function is pure: it takes an ordered slice of past prices
//! (oldest first, most recent last) and returns `None` when the window
//! is shorter than the indicator requires. The window itself is owned
//! and evicted by the caller, never by this module.

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod bollinger;
pub mod macd;

/// Standard periods backing the predicate variable table. A variable
/// name like `sma20` always means these parameters; strategy params do
/// not re-tune them.
pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_MULT: f64 = 2.0;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Per-tick indicator snapshot. Each field is `None` until the price
/// window is long enough. Recomputed on every tick, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSet {
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub ema12: Option<f64>,
    pub ema26: Option<f64>,
    pub rsi: Option<f64>,
    pub bollinger: Option<BollingerBands>,
    pub macd: Option<f64>,
}

impl IndicatorSet {
    pub fn compute(prices: &[f64]) -> Self {
        IndicatorSet {
            sma20: sma::sma(prices, 20),
            sma50: sma::sma(prices, 50),
            ema12: ema::ema(prices, MACD_FAST),
            ema26: ema::ema(prices, MACD_SLOW),
            rsi: rsi::rsi(prices, RSI_PERIOD),
            bollinger: bollinger::bollinger(prices, BOLLINGER_PERIOD, BOLLINGER_MULT),
            macd: macd::macd(prices, MACD_FAST, MACD_SLOW),
        }
    }
}
