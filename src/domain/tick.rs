//! Price tick observations.

use chrono::{DateTime, Timelike, Utc};

/// One price observation for a symbol at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub symbol: String,
    pub price: f64,
    pub percent_change_24h: f64,
    pub volume_24h: f64,
    pub timestamp: DateTime<Utc>,
}

impl PriceTick {
    /// UTC hour of the observation, 0-23.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}
