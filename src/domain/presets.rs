//! Built-in strategy preset catalog.
//!
//! Four preset families, each with ready-to-activate buy/sell
//! conditions and default parameter sets. The conditions use the same
//! DSL accepted from strategy config files.

use std::collections::HashMap;

use crate::domain::error::TickbotError;
use crate::domain::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub family: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub buy: &'static str,
    pub sell: &'static str,
    pub params: &'static [(&'static str, f64)],
}

impl Preset {
    /// Instantiate the preset as an activatable strategy.
    pub fn to_strategy(&self, id: &str) -> Result<Strategy, TickbotError> {
        let params: HashMap<String, f64> = self
            .params
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect();
        Strategy::from_conditions(id, self.name, self.buy, self.sell, params)
    }
}

pub const CATALOG: &[Preset] = &[
    Preset {
        family: "Trend Following",
        name: "Simple Moving Average Crossover",
        description: "Follows market momentum and trends",
        buy: "price > sma20 && sma20 > sma50 && priceChange > 0",
        sell: "price < sma20 && sma20 < sma50 || priceChange < -2",
        params: &[("shortPeriod", 20.0), ("longPeriod", 50.0)],
    },
    Preset {
        family: "Trend Following",
        name: "RSI Momentum",
        description: "Follows market momentum and trends",
        buy: "rsi < 30 && priceChange > 0",
        sell: "rsi > 70 || priceChange < -3",
        params: &[("rsiPeriod", 14.0)],
    },
    Preset {
        family: "Volatility Trading",
        name: "Bollinger Bands Bounce",
        description: "Capitalizes on market volatility",
        buy: "price < bollingerLower && rsi < 40",
        sell: "price > bollingerUpper || rsi > 60",
        params: &[("period", 20.0), ("standardDeviations", 2.0)],
    },
    Preset {
        family: "Mean Reversion",
        name: "Oversold Bounce",
        description: "Trades price returns to average",
        buy: "rsi < 20 && price < sma20 * 0.95",
        sell: "rsi > 60 || price > sma20 * 1.05",
        params: &[("rsiPeriod", 14.0), ("smaPeriod", 20.0)],
    },
    Preset {
        family: "Time-Based Trading",
        name: "Volume-Time Strategy",
        description: "Trades based on time patterns",
        buy: "hour >= 9 && hour <= 16 && volume > 1000000 && priceChange > 1",
        sell: "hour >= 15 || priceChange < -2 || volume < 500000",
        params: &[("tradingHoursStart", 9.0), ("tradingHoursEnd", 16.0), ("minVolume", 1_000_000.0)],
    },
];

/// Look up a preset by its display name, case-insensitive.
pub fn find(name: &str) -> Option<&'static Preset> {
    CATALOG
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}
