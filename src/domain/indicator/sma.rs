//! Simple Moving Average.
//!
//! Mean of the most recent `period` prices.

pub fn sma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }
    let window = &prices[prices.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sma_basic() {
        assert_relative_eq!(sma(&[10.0, 20.0, 30.0], 3).unwrap(), 20.0);
    }

    #[test]
    fn sma_uses_most_recent_window() {
        // Only the last 2 prices count.
        assert_relative_eq!(sma(&[1000.0, 10.0, 20.0], 2).unwrap(), 15.0);
    }

    #[test]
    fn sma_constant_series() {
        let prices = vec![42.0; 10];
        assert_relative_eq!(sma(&prices, 10).unwrap(), 42.0);
    }

    #[test]
    fn sma_insufficient_history() {
        assert_eq!(sma(&[1.0, 2.0], 3), None);
        assert_eq!(sma(&[], 1), None);
    }

    #[test]
    fn sma_zero_period() {
        assert_eq!(sma(&[1.0, 2.0, 3.0], 0), None);
    }
}
