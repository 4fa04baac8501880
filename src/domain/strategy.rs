//! Strategy definition and structural validation.

use std::collections::HashMap;

use crate::domain::error::TickbotError;
use crate::domain::expr::{self, Expr};
use crate::domain::expr_parser;

/// An immutable trading strategy: a buy predicate, a sell predicate and
/// a parameter map. Parameters are fixed at creation time; they are
/// descriptive metadata, not live tuning knobs.
#[derive(Debug, Clone)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    pub buy: Expr,
    pub sell: Expr,
    pub params: HashMap<String, f64>,
}

impl Strategy {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        buy: Expr,
        sell: Expr,
        params: HashMap<String, f64>,
    ) -> Self {
        Strategy {
            id: id.into(),
            name: name.into(),
            buy,
            sell,
            params,
        }
    }

    /// Parse buy/sell condition strings into a strategy. Parse failures
    /// surface as [`TickbotError::InvalidStrategy`] naming the side.
    pub fn from_conditions(
        id: impl Into<String>,
        name: impl Into<String>,
        buy: &str,
        sell: &str,
        params: HashMap<String, f64>,
    ) -> Result<Self, TickbotError> {
        let id = id.into();
        let buy = expr_parser::parse(buy).map_err(|e| TickbotError::InvalidStrategy {
            id: id.clone(),
            reason: format!("buy condition: {e}"),
        })?;
        let sell = expr_parser::parse(sell).map_err(|e| TickbotError::InvalidStrategy {
            id: id.clone(),
            reason: format!("sell condition: {e}"),
        })?;
        Ok(Strategy::new(id, name, buy, sell, params))
    }

    /// Structural checks applied before a strategy enters the active
    /// set. Threshold semantics are deliberately not checked.
    pub fn validate(&self) -> Result<(), TickbotError> {
        if self.id.trim().is_empty() {
            return Err(TickbotError::InvalidStrategy {
                id: self.id.clone(),
                reason: "empty strategy id".into(),
            });
        }
        for (key, value) in &self.params {
            if !value.is_finite() {
                return Err(TickbotError::InvalidStrategy {
                    id: self.id.clone(),
                    reason: format!("param '{}' is not finite", key),
                });
            }
        }
        Ok(())
    }

    /// Price-window length needed to evaluate both predicates.
    pub fn required_history(&self) -> usize {
        expr::required_history(&self.buy).max(expr::required_history(&self.sell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_strategy() -> Strategy {
        Strategy::from_conditions(
            "sma-cross",
            "SMA Crossover",
            "price > sma20 && sma20 > sma50",
            "price < sma20",
            HashMap::from([("shortPeriod".to_string(), 20.0), ("longPeriod".to_string(), 50.0)]),
        )
        .unwrap()
    }

    #[test]
    fn from_conditions_parses_both_sides() {
        let strategy = sample_strategy();
        assert_eq!(strategy.id, "sma-cross");
        assert_eq!(strategy.name, "SMA Crossover");
        assert!(strategy.validate().is_ok());
    }

    #[test]
    fn from_conditions_rejects_bad_buy() {
        let err = Strategy::from_conditions("s1", "Bad", "price >", "price < 1", HashMap::new())
            .unwrap_err();
        match err {
            TickbotError::InvalidStrategy { id, reason } => {
                assert_eq!(id, "s1");
                assert!(reason.contains("buy condition"));
            }
            other => panic!("expected InvalidStrategy, got {other:?}"),
        }
    }

    #[test]
    fn from_conditions_rejects_bad_sell() {
        let err =
            Strategy::from_conditions("s1", "Bad", "price > 1", "nonsense < 1", HashMap::new())
                .unwrap_err();
        match err {
            TickbotError::InvalidStrategy { reason, .. } => {
                assert!(reason.contains("sell condition"));
            }
            other => panic!("expected InvalidStrategy, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_empty_id() {
        let mut strategy = sample_strategy();
        strategy.id = "  ".into();
        assert!(strategy.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_finite_param() {
        let mut strategy = sample_strategy();
        strategy.params.insert("bad".into(), f64::NAN);
        assert!(strategy.validate().is_err());
    }

    #[test]
    fn required_history_covers_both_predicates() {
        // Buy references sma50, sell only price.
        assert_eq!(sample_strategy().required_history(), 50);

        let short = Strategy::from_conditions(
            "scalp",
            "Scalp",
            "price < 100",
            "price > 110",
            HashMap::new(),
        )
        .unwrap();
        assert_eq!(short.required_history(), 1);
    }
}
