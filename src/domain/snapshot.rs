//! Per-tick evaluation snapshot.
//!
//! A `TickSnapshot` bundles the raw tick fields with the indicator set
//! computed from the symbol's current price window. Predicates are
//! evaluated against this value only; they never see the window itself.

use crate::domain::indicator::IndicatorSet;
use crate::domain::tick::PriceTick;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSnapshot {
    pub price: f64,
    pub price_change: f64,
    pub volume: f64,
    pub hour: u32,
    pub indicators: IndicatorSet,
}

impl TickSnapshot {
    /// Build the snapshot for one tick given the symbol's price window
    /// (oldest first, including this tick's price).
    pub fn new(tick: &PriceTick, prices: &[f64]) -> Self {
        TickSnapshot {
            price: tick.price,
            price_change: tick.percent_change_24h,
            volume: tick.volume_24h,
            hour: tick.hour(),
            indicators: IndicatorSet::compute(prices),
        }
    }
}
