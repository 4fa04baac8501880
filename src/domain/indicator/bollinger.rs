//! Bollinger Bands.
//!
//! Middle = SMA over the most recent `period` prices; upper/lower are
//! `mult` population standard deviations (divide by N, not N-1) away.

use crate::domain::indicator::BollingerBands;

pub fn bollinger(prices: &[f64], period: usize, mult: f64) -> Option<BollingerBands> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let window = &prices[prices.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;
    let variance = window
        .iter()
        .map(|price| {
            let diff = price - middle;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    let offset = mult * variance.sqrt();

    Some(BollingerBands {
        upper: middle + offset,
        middle,
        lower: middle - offset,
    })
}
