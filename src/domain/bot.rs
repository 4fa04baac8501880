//! Bot controller: routes tick batches to active strategies.
//!
//! The controller owns all per-strategy state (price histories,
//! positions, metrics) and mutates it only inside [`BotController::apply_batch`].
//! Everything is synchronous; any scheduler can drive it. Ticks for a
//! strategy are always applied in batch order.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::domain::error::TickbotError;
use crate::domain::expr;
use crate::domain::history::PriceHistory;
use crate::domain::metrics::{MetricsSnapshot, MetricsTracker};
use crate::domain::position::{Position, TradeEvent};
use crate::domain::snapshot::TickSnapshot;
use crate::domain::strategy::Strategy;
use crate::domain::tick::PriceTick;
use crate::domain::trade::TradeRecord;

#[derive(Debug)]
struct StrategyInstance {
    strategy: Strategy,
    active: bool,
    window_len: usize,
    histories: HashMap<String, PriceHistory>,
    positions: HashMap<String, Position>,
    metrics: MetricsTracker,
}

impl StrategyInstance {
    fn new(strategy: Strategy) -> Self {
        let window_len = strategy.required_history();
        StrategyInstance {
            strategy,
            active: true,
            window_len,
            histories: HashMap::new(),
            positions: HashMap::new(),
            metrics: MetricsTracker::new(),
        }
    }

    fn apply(&mut self, tick: &PriceTick) -> Option<TradeEvent> {
        // A tick for an unseen symbol implicitly starts an empty history
        // and a Flat position.
        let window_len = self.window_len;
        let history = self
            .histories
            .entry(tick.symbol.clone())
            .or_insert_with(|| PriceHistory::with_capacity(window_len));
        history.push(tick.price);
        let have = history.len();
        let snapshot = TickSnapshot::new(tick, history.prices());

        if !expr::fully_resolved(&self.strategy.buy, &snapshot)
            || !expr::fully_resolved(&self.strategy.sell, &snapshot)
        {
            debug!(
                strategy = %self.strategy.id,
                symbol = %tick.symbol,
                have,
                need = self.window_len,
                "predicate not fully resolved yet; unavailable values read as false"
            );
        }

        let position = self.positions.entry(tick.symbol.clone()).or_default();
        let event = position.on_tick(&self.strategy, &tick.symbol, &snapshot, tick.timestamp);
        if let Some(ref event) = event {
            self.metrics.record(event);
        }
        event
    }
}

/// Owns every strategy instance; the single writer for their state.
#[derive(Debug, Default)]
pub struct BotController {
    instances: HashMap<String, StrategyInstance>,
    // Activation order, for deterministic batch routing.
    order: Vec<String>,
}

impl BotController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and admit a strategy. Re-activating a known id resumes
    /// it without resetting positions or metrics. A strategy that fails
    /// validation never enters the set.
    pub fn activate(&mut self, strategy: Strategy) -> Result<(), TickbotError> {
        strategy.validate()?;
        let id = strategy.id.clone();
        if let Some(instance) = self.instances.get_mut(&id) {
            instance.active = true;
            info!(strategy = %id, "strategy resumed");
        } else {
            info!(strategy = %id, name = %strategy.name, "strategy activated");
            self.order.push(id.clone());
            self.instances.insert(id, StrategyInstance::new(strategy));
        }
        Ok(())
    }

    /// Resume a paused strategy. Unknown id is a no-op.
    pub fn resume(&mut self, id: &str) {
        if let Some(instance) = self.instances.get_mut(id) {
            instance.active = true;
            info!(strategy = %id, "strategy resumed");
        }
    }

    /// Pause a strategy: it receives no ticks and its positions freeze.
    /// Unknown id is a no-op.
    pub fn pause(&mut self, id: &str) {
        if let Some(instance) = self.instances.get_mut(id) {
            instance.active = false;
            info!(strategy = %id, "strategy paused");
        }
    }

    /// Drop a strategy and all of its state. Unknown id is a no-op.
    pub fn remove(&mut self, id: &str) {
        if self.instances.remove(id).is_some() {
            self.order.retain(|known| known != id);
            info!(strategy = %id, "strategy removed");
        }
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.instances.get(id).is_some_and(|i| i.active)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    /// Strategy ids in activation order.
    pub fn strategy_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn strategy_name(&self, id: &str) -> Option<&str> {
        self.instances.get(id).map(|i| i.strategy.name.as_str())
    }

    /// Apply one batch of ticks to every active strategy. Failures are
    /// impossible mid-batch by construction: unresolved predicate
    /// values read as false and unknown symbols initialize implicitly.
    pub fn apply_batch(&mut self, ticks: &[PriceTick]) {
        for id in &self.order {
            let Some(instance) = self.instances.get_mut(id) else {
                continue;
            };
            if !instance.active {
                continue;
            }
            for tick in ticks {
                match instance.apply(tick) {
                    Some(TradeEvent::Opened { ref symbol, price, .. }) => {
                        info!(strategy = %id, symbol = %symbol, price, "position opened");
                    }
                    Some(TradeEvent::Closed {
                        ref symbol,
                        exit_price,
                        profit,
                        ..
                    }) => {
                        info!(
                            strategy = %id,
                            symbol = %symbol,
                            price = exit_price,
                            profit,
                            "position closed"
                        );
                    }
                    None => {}
                }
            }
        }
    }

    /// Read-only metrics view for one strategy.
    pub fn snapshot(&self, id: &str) -> Option<MetricsSnapshot> {
        self.instances.get(id).map(|i| i.metrics.snapshot())
    }

    /// Recent trades for one strategy, newest first. Unknown id yields
    /// an empty list.
    pub fn list_trades(&self, id: &str) -> Vec<TradeRecord> {
        self.instances
            .get(id)
            .map(|i| i.metrics.recent_trades())
            .unwrap_or_default()
    }

    /// Open positions across all symbols for one strategy.
    pub fn open_symbols(&self, id: &str) -> Vec<String> {
        let Some(instance) = self.instances.get(id) else {
            return Vec::new();
        };
        let mut symbols: Vec<String> = instance
            .positions
            .iter()
            .filter(|(_, position)| position.is_open())
            .map(|(symbol, _)| symbol.clone())
            .collect();
        symbols.sort();
        symbols
    }
}
