//! Predicate DSL parser.
//!
//! Recursive descent over the infix condition syntax used by strategy
//! definitions and presets, e.g. `price < bollingerLower && rsi < 40`.
//! Produces the closed [`Expr`] AST; errors carry a character offset.
//!
//! Grammar:
//! ```text
//! expression := and ( "||" and )*
//! and        := unary ( "&&" unary )*
//! unary      := "!" unary | "(" expression ")" | comparison
//! comparison := operand ( "<" | "<=" | ">" | ">=" | "==" ) operand
//! operand    := number | variable ( "*" number )?
//! ```
//!
//! Unknown identifiers are rejected here, so a malformed predicate can
//! never reach the evaluator.

use crate::domain::error::ParseError;
use crate::domain::expr::{Cmp, Expr, Operand, Variable};

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError {
                message: format!("expected '{}', found '{}'", expected, ch),
                position: self.pos,
            }),
            None => Err(ParseError {
                message: format!("expected '{}', found end of input", expected),
                position: self.pos,
            }),
        }
    }

    fn consume_exact(&mut self, s: &str) -> bool {
        if self.remaining().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn peek_word(&self) -> String {
        let mut word = String::new();
        for ch in self.remaining().chars() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
            } else {
                break;
            }
        }
        if word.is_empty() {
            self.peek()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "end of input".to_string())
        } else {
            word
        }
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut has_dot = false;
        let mut digits = 0;

        if self.peek() == Some('-') {
            self.advance();
        }

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits += 1;
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        if digits == 0 {
            return Err(ParseError {
                message: "expected number".to_string(),
                position: start,
            });
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<f64>().map_err(|_| ParseError {
            message: format!("invalid number: {}", num_str),
            position: start,
        })
    }

    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        self.skip_whitespace();

        if self
            .peek()
            .is_some_and(|ch| ch.is_ascii_digit() || ch == '-' || ch == '.')
        {
            return Ok(Operand::Literal(self.parse_number()?));
        }

        let start = self.pos;
        let word = self.peek_word();
        let Some(variable) = Variable::from_name(&word) else {
            return Err(ParseError {
                message: format!("unknown variable '{}'", word),
                position: start,
            });
        };
        self.pos += word.len();

        self.skip_whitespace();
        if self.peek() == Some('*') {
            self.advance();
            let factor = self.parse_number()?;
            return Ok(Operand::Scaled(variable, factor));
        }

        Ok(Operand::Var(variable))
    }

    fn parse_comparison_op(&mut self) -> Result<Cmp, ParseError> {
        self.skip_whitespace();
        if self.consume_exact("<=") {
            return Ok(Cmp::Le);
        }
        if self.consume_exact(">=") {
            return Ok(Cmp::Ge);
        }
        if self.consume_exact("==") {
            return Ok(Cmp::Eq);
        }
        if self.consume_exact("<") {
            return Ok(Cmp::Lt);
        }
        if self.consume_exact(">") {
            return Ok(Cmp::Gt);
        }
        let found = self.peek_word();
        Err(ParseError {
            message: format!("expected comparison operator, found '{}'", found),
            position: self.pos,
        })
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_operand()?;
        let op = self.parse_comparison_op()?;
        let right = self.parse_operand()?;
        Ok(Expr::Compare { op, left, right })
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();

        if self.peek() == Some('!') {
            let start = self.pos;
            self.advance();
            if self.peek() == Some('=') {
                return Err(ParseError {
                    message: "unsupported operator '!=', use '!( == )'".to_string(),
                    position: start,
                });
            }
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }

        if self.peek() == Some('(') {
            self.advance();
            let inner = self.parse_expression()?;
            self.expect_char(')')?;
            return Ok(inner);
        }

        self.parse_comparison()
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut exprs = vec![self.parse_unary()?];

        loop {
            self.skip_whitespace();
            if self.remaining().starts_with("&&") {
                self.pos += 2;
                exprs.push(self.parse_unary()?);
            } else if self.peek() == Some('&') {
                return Err(ParseError {
                    message: "expected '&&'".to_string(),
                    position: self.pos,
                });
            } else {
                break;
            }
        }

        if exprs.len() == 1 {
            Ok(exprs.swap_remove(0))
        } else {
            Ok(Expr::All(exprs))
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let mut exprs = vec![self.parse_and()?];

        loop {
            self.skip_whitespace();
            if self.remaining().starts_with("||") {
                self.pos += 2;
                exprs.push(self.parse_and()?);
            } else if self.peek() == Some('|') {
                return Err(ParseError {
                    message: "expected '||'".to_string(),
                    position: self.pos,
                });
            } else {
                break;
            }
        }

        if exprs.len() == 1 {
            Ok(exprs.swap_remove(0))
        } else {
            Ok(Expr::Any(exprs))
        }
    }

    fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(ParseError {
                message: format!("unexpected trailing input '{}'", self.remaining()),
                position: self.pos,
            });
        }
        Ok(expr)
    }
}

pub fn parse(input: &str) -> Result<Expr, ParseError> {
    Parser::new(input).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_comparison() {
        let expr = parse("price < 100").unwrap();
        assert_eq!(
            expr,
            Expr::Compare {
                op: Cmp::Lt,
                left: Operand::Var(Variable::Price),
                right: Operand::Literal(100.0),
            }
        );
    }

    #[test]
    fn parse_all_comparison_operators() {
        assert!(matches!(
            parse("rsi <= 30").unwrap(),
            Expr::Compare { op: Cmp::Le, .. }
        ));
        assert!(matches!(
            parse("rsi >= 70").unwrap(),
            Expr::Compare { op: Cmp::Ge, .. }
        ));
        assert!(matches!(
            parse("hour == 9").unwrap(),
            Expr::Compare { op: Cmp::Eq, .. }
        ));
        assert!(matches!(
            parse("macd > 0").unwrap(),
            Expr::Compare { op: Cmp::Gt, .. }
        ));
    }

    #[test]
    fn parse_negative_literal() {
        let expr = parse("priceChange < -2").unwrap();
        assert_eq!(
            expr,
            Expr::Compare {
                op: Cmp::Lt,
                left: Operand::Var(Variable::PriceChange),
                right: Operand::Literal(-2.0),
            }
        );
    }

    #[test]
    fn parse_scaled_variable() {
        let expr = parse("price < sma20 * 0.95").unwrap();
        assert_eq!(
            expr,
            Expr::Compare {
                op: Cmp::Lt,
                left: Operand::Var(Variable::Price),
                right: Operand::Scaled(Variable::Sma20, 0.95),
            }
        );
    }

    #[test]
    fn parse_and_chain() {
        let expr = parse("price > sma20 && sma20 > sma50 && priceChange > 0").unwrap();
        match expr {
            Expr::All(exprs) => assert_eq!(exprs.len(), 3),
            other => panic!("expected All, got {:?}", other),
        }
    }

    #[test]
    fn parse_or_binds_looser_than_and() {
        // a && b || c parses as (a && b) || c, matching the original
        // infix semantics.
        let expr = parse("price < sma20 && sma20 < sma50 || priceChange < -2").unwrap();
        match expr {
            Expr::Any(exprs) => {
                assert_eq!(exprs.len(), 2);
                assert!(matches!(exprs[0], Expr::All(_)));
                assert!(matches!(exprs[1], Expr::Compare { .. }));
            }
            other => panic!("expected Any, got {:?}", other),
        }
    }

    #[test]
    fn parse_parentheses_override_precedence() {
        let expr = parse("price < sma20 && (sma20 < sma50 || priceChange < -2)").unwrap();
        match expr {
            Expr::All(exprs) => {
                assert_eq!(exprs.len(), 2);
                assert!(matches!(exprs[1], Expr::Any(_)));
            }
            other => panic!("expected All, got {:?}", other),
        }
    }

    #[test]
    fn parse_not() {
        let expr = parse("!(rsi > 70)").unwrap();
        assert!(matches!(expr, Expr::Not(_)));
    }

    #[test]
    fn parse_unknown_variable_is_rejected() {
        let err = parse("price > smaa20").unwrap_err();
        assert!(err.message.contains("unknown variable 'smaa20'"));
        assert_eq!(err.position, 8);
    }

    #[test]
    fn parse_missing_operator() {
        let err = parse("price 100").unwrap_err();
        assert!(err.message.contains("expected comparison operator"));
    }

    #[test]
    fn parse_single_ampersand_is_rejected() {
        let err = parse("price > 1 & rsi < 30").unwrap_err();
        assert!(err.message.contains("expected '&&'"));
    }

    #[test]
    fn parse_bang_equals_is_rejected() {
        let err = parse("price != 100").unwrap_err();
        assert!(err.message.contains("'!='"));
    }

    #[test]
    fn parse_trailing_input_is_rejected() {
        let err = parse("price > 100 extra").unwrap_err();
        assert!(err.message.contains("trailing input"));
    }

    #[test]
    fn parse_unclosed_paren() {
        let err = parse("(price > 100").unwrap_err();
        assert!(err.message.contains("expected ')'"));
    }

    #[test]
    fn parse_error_caret_context() {
        let input = "price >> 100";
        let err = parse(input).unwrap_err();
        let display = err.display_with_context(input);
        assert!(display.starts_with(input));
        assert!(display.contains('^'));
    }

    #[test]
    fn parse_literal_on_left() {
        let expr = parse("100 < price").unwrap();
        assert_eq!(
            expr,
            Expr::Compare {
                op: Cmp::Lt,
                left: Operand::Literal(100.0),
                right: Operand::Var(Variable::Price),
            }
        );
    }

    #[test]
    fn parse_whitespace_tolerant() {
        assert_eq!(parse("price<100").unwrap(), parse("  price  <  100  ").unwrap());
    }
}
