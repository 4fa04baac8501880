//! Relative Strength Index.
//!
//! Computed from the most recent `period` successive price changes
//! (needs `period + 1` prices): RS = average gain / average loss,
//! RSI = 100 - 100/(1 + RS). Zero total loss means RSI = 100, never a
//! division by zero. A zero change counts as a gain of zero.

pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }

    let window = &prices[prices.len() - (period + 1)..];
    let mut gains = 0.0;
    let mut losses = 0.0;

    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change >= 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    if losses == 0.0 {
        return Some(100.0);
    }

    let rs = (gains / period as f64) / (losses / period as f64);
    Some(100.0 - 100.0 / (1.0 + rs))
}
