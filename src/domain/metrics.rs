//! Running performance metrics per strategy.

use std::collections::VecDeque;

use crate::domain::position::TradeEvent;
use crate::domain::trade::TradeRecord;

/// Upper bound on the recent-trade log; the oldest entry is evicted.
pub const RECENT_TRADES_CAP: usize = 50;

/// Aggregates trade events into running totals and a bounded
/// newest-first trade log. One tracker per strategy instance.
#[derive(Debug, Clone, Default)]
pub struct MetricsTracker {
    total_profit: f64,
    win_count: usize,
    total_trades: usize,
    active_trades: usize,
    recent: VecDeque<TradeRecord>,
}

/// Owned read-only view handed to callers; nothing mutable escapes.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub total_profit: f64,
    /// win_count / total_trades, 0.0 before the first closed trade.
    pub win_rate: f64,
    pub active_trades: usize,
    pub total_trades: usize,
    /// Newest first, at most [`RECENT_TRADES_CAP`] entries.
    pub recent_trades: Vec<TradeRecord>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &TradeEvent) {
        match event {
            TradeEvent::Opened { .. } => {
                self.active_trades += 1;
            }
            TradeEvent::Closed { profit, .. } => {
                self.active_trades = self.active_trades.saturating_sub(1);
                self.total_trades += 1;
                self.total_profit += profit;
                if *profit > 0.0 {
                    self.win_count += 1;
                }
            }
        }
        self.recent.push_front(TradeRecord::from_event(event));
        self.recent.truncate(RECENT_TRADES_CAP);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let win_rate = if self.total_trades > 0 {
            self.win_count as f64 / self.total_trades as f64
        } else {
            0.0
        };
        MetricsSnapshot {
            total_profit: self.total_profit,
            win_rate,
            active_trades: self.active_trades,
            total_trades: self.total_trades,
            recent_trades: self.recent.iter().cloned().collect(),
        }
    }

    /// The recent-trade log, newest first.
    pub fn recent_trades(&self) -> Vec<TradeRecord> {
        self.recent.iter().cloned().collect()
    }
}
