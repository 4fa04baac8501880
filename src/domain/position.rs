//! Per-symbol position state machine.
//!
//! Two states, Flat and Open. While Flat only the buy predicate is
//! consulted; while Open only the sell predicate. At most one open
//! position per (strategy, symbol): a second buy signal is a no-op,
//! as is a sell signal while Flat.

use chrono::{DateTime, Utc};

use crate::domain::expr;
use crate::domain::snapshot::TickSnapshot;
use crate::domain::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    #[default]
    Flat,
    Open {
        entry_price: f64,
        entry_time: DateTime<Utc>,
    },
}

/// Emitted by a state transition; consumed by the metrics aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeEvent {
    Opened {
        symbol: String,
        price: f64,
        time: DateTime<Utc>,
    },
    Closed {
        symbol: String,
        entry_price: f64,
        exit_price: f64,
        profit: f64,
        opened_at: DateTime<Utc>,
        closed_at: DateTime<Utc>,
    },
}

impl Position {
    pub fn is_open(&self) -> bool {
        matches!(self, Position::Open { .. })
    }

    /// Apply one tick, returning the transition event if any.
    pub fn on_tick(
        &mut self,
        strategy: &Strategy,
        symbol: &str,
        snapshot: &TickSnapshot,
        time: DateTime<Utc>,
    ) -> Option<TradeEvent> {
        match *self {
            Position::Flat => {
                if expr::evaluate(&strategy.buy, snapshot) {
                    *self = Position::Open {
                        entry_price: snapshot.price,
                        entry_time: time,
                    };
                    Some(TradeEvent::Opened {
                        symbol: symbol.to_string(),
                        price: snapshot.price,
                        time,
                    })
                } else {
                    None
                }
            }
            Position::Open {
                entry_price,
                entry_time,
            } => {
                if expr::evaluate(&strategy.sell, snapshot) {
                    *self = Position::Flat;
                    Some(TradeEvent::Closed {
                        symbol: symbol.to_string(),
                        entry_price,
                        exit_price: snapshot.price,
                        profit: snapshot.price - entry_price,
                        opened_at: entry_time,
                        closed_at: time,
                    })
                } else {
                    None
                }
            }
        }
    }
}
