//! Predicate expression AST and evaluation.
//!
//! Strategies carry closed expression trees over a fixed variable
//! table, never host code. Evaluation resolves each operand to an
//! `Option<f64>`; a comparison with an unresolved side is `false`, so
//! insufficient indicator history can never abort a tick.

use std::fmt;

use crate::domain::indicator::{BOLLINGER_PERIOD, MACD_FAST, MACD_SLOW, RSI_PERIOD};
use crate::domain::snapshot::TickSnapshot;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    Price,
    PriceChange,
    Volume,
    Hour,
    Sma20,
    Sma50,
    Ema12,
    Ema26,
    Rsi,
    BollingerUpper,
    BollingerMiddle,
    BollingerLower,
    Macd,
}

impl Variable {
    /// Resolve a DSL identifier. Unknown names are rejected by the
    /// parser before a strategy can activate.
    pub fn from_name(name: &str) -> Option<Variable> {
        match name {
            "price" => Some(Variable::Price),
            "priceChange" => Some(Variable::PriceChange),
            "volume" => Some(Variable::Volume),
            "hour" => Some(Variable::Hour),
            "sma20" => Some(Variable::Sma20),
            "sma50" => Some(Variable::Sma50),
            "ema12" => Some(Variable::Ema12),
            "ema26" => Some(Variable::Ema26),
            "rsi" => Some(Variable::Rsi),
            "bollingerUpper" => Some(Variable::BollingerUpper),
            "bollingerMiddle" => Some(Variable::BollingerMiddle),
            "bollingerLower" => Some(Variable::BollingerLower),
            "macd" => Some(Variable::Macd),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variable::Price => "price",
            Variable::PriceChange => "priceChange",
            Variable::Volume => "volume",
            Variable::Hour => "hour",
            Variable::Sma20 => "sma20",
            Variable::Sma50 => "sma50",
            Variable::Ema12 => "ema12",
            Variable::Ema26 => "ema26",
            Variable::Rsi => "rsi",
            Variable::BollingerUpper => "bollingerUpper",
            Variable::BollingerMiddle => "bollingerMiddle",
            Variable::BollingerLower => "bollingerLower",
            Variable::Macd => "macd",
        }
    }

    /// Price-window length needed before the variable resolves.
    pub fn required_history(&self) -> usize {
        match self {
            Variable::Price | Variable::PriceChange | Variable::Volume | Variable::Hour => 1,
            Variable::Sma20 => 20,
            Variable::Sma50 => 50,
            Variable::Ema12 => MACD_FAST,
            Variable::Ema26 => MACD_SLOW,
            Variable::Rsi => RSI_PERIOD + 1,
            Variable::BollingerUpper | Variable::BollingerMiddle | Variable::BollingerLower => {
                BOLLINGER_PERIOD
            }
            Variable::Macd => MACD_SLOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(f64),
    Var(Variable),
    /// A variable times a constant factor, e.g. `sma20 * 0.95`.
    Scaled(Variable, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Compare { op: Cmp, left: Operand, right: Operand },
    All(Vec<Expr>),
    Any(Vec<Expr>),
    Not(Box<Expr>),
}

pub fn evaluate(expr: &Expr, snapshot: &TickSnapshot) -> bool {
    match expr {
        Expr::Compare { op, left, right } => {
            let (Some(left), Some(right)) = (resolve(left, snapshot), resolve(right, snapshot))
            else {
                return false;
            };
            match op {
                Cmp::Lt => left < right,
                Cmp::Le => left <= right,
                Cmp::Gt => left > right,
                Cmp::Ge => left >= right,
                Cmp::Eq => (left - right).abs() < EPSILON,
            }
        }
        Expr::All(exprs) => {
            for e in exprs {
                if !evaluate(e, snapshot) {
                    return false;
                }
            }
            true
        }
        Expr::Any(exprs) => {
            for e in exprs {
                if evaluate(e, snapshot) {
                    return true;
                }
            }
            false
        }
        Expr::Not(inner) => !evaluate(inner, snapshot),
    }
}

/// True when every variable the expression references resolves against
/// the snapshot. Used for warmup diagnostics, not for gating.
pub fn fully_resolved(expr: &Expr, snapshot: &TickSnapshot) -> bool {
    variables(expr)
        .iter()
        .all(|var| lookup(*var, snapshot).is_some())
}

/// Price-window length needed to evaluate the expression, floor 1.
pub fn required_history(expr: &Expr) -> usize {
    variables(expr)
        .iter()
        .map(Variable::required_history)
        .max()
        .unwrap_or(1)
}

/// All variables referenced by the expression, in first-seen order.
pub fn variables(expr: &Expr) -> Vec<Variable> {
    let mut found = Vec::new();
    collect_variables(expr, &mut found);
    found
}

fn collect_variables(expr: &Expr, found: &mut Vec<Variable>) {
    match expr {
        Expr::Compare { left, right, .. } => {
            collect_operand(left, found);
            collect_operand(right, found);
        }
        Expr::All(exprs) | Expr::Any(exprs) => {
            for e in exprs {
                collect_variables(e, found);
            }
        }
        Expr::Not(inner) => collect_variables(inner, found),
    }
}

fn collect_operand(operand: &Operand, found: &mut Vec<Variable>) {
    let var = match operand {
        Operand::Literal(_) => return,
        Operand::Var(var) | Operand::Scaled(var, _) => *var,
    };
    if !found.contains(&var) {
        found.push(var);
    }
}

fn resolve(operand: &Operand, snapshot: &TickSnapshot) -> Option<f64> {
    match operand {
        Operand::Literal(value) => Some(*value),
        Operand::Var(var) => lookup(*var, snapshot),
        Operand::Scaled(var, factor) => lookup(*var, snapshot).map(|value| value * factor),
    }
}

fn lookup(var: Variable, snapshot: &TickSnapshot) -> Option<f64> {
    match var {
        Variable::Price => Some(snapshot.price),
        Variable::PriceChange => Some(snapshot.price_change),
        Variable::Volume => Some(snapshot.volume),
        Variable::Hour => Some(snapshot.hour as f64),
        Variable::Sma20 => snapshot.indicators.sma20,
        Variable::Sma50 => snapshot.indicators.sma50,
        Variable::Ema12 => snapshot.indicators.ema12,
        Variable::Ema26 => snapshot.indicators.ema26,
        Variable::Rsi => snapshot.indicators.rsi,
        Variable::BollingerUpper => snapshot.indicators.bollinger.map(|b| b.upper),
        Variable::BollingerMiddle => snapshot.indicators.bollinger.map(|b| b.middle),
        Variable::BollingerLower => snapshot.indicators.bollinger.map(|b| b.lower),
        Variable::Macd => snapshot.indicators.macd,
    }
}

impl fmt::Display for Cmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Cmp::Lt => "<",
            Cmp::Le => "<=",
            Cmp::Gt => ">",
            Cmp::Ge => ">=",
            Cmp::Eq => "==",
        };
        write!(f, "{}", op)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::Var(var) => write!(f, "{}", var.name()),
            Operand::Scaled(var, factor) => write!(f, "{} * {}", var.name(), factor),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Compare { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Expr::All(exprs) => write_joined(f, exprs, " && "),
            Expr::Any(exprs) => write_joined(f, exprs, " || "),
            Expr::Not(inner) => write!(f, "!({})", inner),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, exprs: &[Expr], sep: &str) -> fmt::Result {
    for (i, e) in exprs.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        match e {
            Expr::All(_) | Expr::Any(_) => write!(f, "({})", e)?,
            _ => write!(f, "{}", e)?,
        }
    }
    Ok(())
}
