//! Recent-trade log records.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::position::TradeEvent;

/// Quote currency used for display pairs, e.g. `BTC/USDT`.
pub const QUOTE_CURRENCY: &str = "USDT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// One row of the bounded recent-trade log. Buy rows carry zero profit;
/// sell rows carry the realized profit and the close time.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub symbol: String,
    pub pair: String,
    pub side: TradeSide,
    pub price: f64,
    pub profit: f64,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl TradeRecord {
    pub fn from_event(event: &TradeEvent) -> TradeRecord {
        match event {
            TradeEvent::Opened {
                symbol,
                price,
                time,
            } => TradeRecord {
                symbol: symbol.clone(),
                pair: pair_for(symbol),
                side: TradeSide::Buy,
                price: *price,
                profit: 0.0,
                opened_at: *time,
                closed_at: None,
            },
            TradeEvent::Closed {
                symbol,
                exit_price,
                profit,
                opened_at,
                closed_at,
                ..
            } => TradeRecord {
                symbol: symbol.clone(),
                pair: pair_for(symbol),
                side: TradeSide::Sell,
                price: *exit_price,
                profit: *profit,
                opened_at: *opened_at,
                closed_at: Some(*closed_at),
            },
        }
    }
}

pub fn pair_for(symbol: &str) -> String {
    format!("{}/{}", symbol.to_uppercase(), QUOTE_CURRENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn time(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, minute, 0).unwrap()
    }

    #[test]
    fn pair_uppercases_symbol() {
        assert_eq!(pair_for("btc"), "BTC/USDT");
        assert_eq!(pair_for("ETH"), "ETH/USDT");
    }

    #[test]
    fn buy_record_from_opened_event() {
        let event = TradeEvent::Opened {
            symbol: "btc".into(),
            price: 42_000.0,
            time: time(0),
        };
        let record = TradeRecord::from_event(&event);
        assert_eq!(record.side, TradeSide::Buy);
        assert_eq!(record.pair, "BTC/USDT");
        assert_eq!(record.price, 42_000.0);
        assert_eq!(record.profit, 0.0);
        assert_eq!(record.closed_at, None);
    }

    #[test]
    fn sell_record_from_closed_event() {
        let event = TradeEvent::Closed {
            symbol: "btc".into(),
            entry_price: 42_000.0,
            exit_price: 43_500.0,
            profit: 1_500.0,
            opened_at: time(0),
            closed_at: time(30),
        };
        let record = TradeRecord::from_event(&event);
        assert_eq!(record.side, TradeSide::Sell);
        assert_eq!(record.price, 43_500.0);
        assert_eq!(record.profit, 1_500.0);
        assert_eq!(record.opened_at, time(0));
        assert_eq!(record.closed_at, Some(time(30)));
    }

    #[test]
    fn side_display() {
        assert_eq!(TradeSide::Buy.to_string(), "BUY");
        assert_eq!(TradeSide::Sell.to_string(), "SELL");
    }
}
