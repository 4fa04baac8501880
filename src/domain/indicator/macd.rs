//! Moving Average Convergence Divergence.
//!
//! Returns only the raw MACD line, EMA(fast) - EMA(slow). Signal-line
//! smoothing and the histogram are intentionally not part of the
//! contract; strategies compare the line itself.

use crate::domain::indicator::ema::ema;

pub fn macd(prices: &[f64], fast: usize, slow: usize) -> Option<f64> {
    if fast == 0 || slow == 0 || prices.len() < fast.max(slow) {
        return None;
    }
    Some(ema(prices, fast)? - ema(prices, slow)?)
}
