//! Shared helpers for integration tests.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use tickbot::domain::strategy::Strategy;
use tickbot::domain::tick::PriceTick;

pub fn time(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10 + minute / 60, minute % 60, 0)
        .unwrap()
}

pub fn tick(symbol: &str, price: f64, minute: u32) -> PriceTick {
    PriceTick {
        symbol: symbol.into(),
        price,
        percent_change_24h: 0.0,
        volume_24h: 0.0,
        timestamp: time(minute),
    }
}

pub fn tick_full(
    symbol: &str,
    price: f64,
    percent_change: f64,
    volume: f64,
    minute: u32,
) -> PriceTick {
    PriceTick {
        symbol: symbol.into(),
        price,
        percent_change_24h: percent_change,
        volume_24h: volume,
        timestamp: time(minute),
    }
}

pub fn strategy(id: &str, buy: &str, sell: &str) -> Strategy {
    Strategy::from_conditions(id, id, buy, sell, HashMap::new()).unwrap()
}

/// The price-band scenario strategy used throughout the suite.
pub fn band_strategy() -> Strategy {
    strategy("band", "price < 100", "price > 110")
}
