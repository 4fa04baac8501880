//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the SMA of the oldest n prices, then
//! EMA = price*k + EMA*(1-k) forward over the rest of the window.

pub fn ema(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = prices[..period].iter().sum::<f64>() / period as f64;
    for &price in &prices[period..] {
        ema = price * k + ema * (1.0 - k);
    }
    Some(ema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_seed_is_sma() {
        // Window exactly one period long: EMA is the plain average.
        assert_relative_eq!(ema(&[10.0, 20.0, 30.0], 3).unwrap(), 20.0);
    }

    #[test]
    fn ema_iterates_past_seed() {
        // seed = 20, k = 0.5: 40*0.5 + 20*0.5 = 30
        assert_relative_eq!(ema(&[10.0, 20.0, 30.0, 40.0], 3).unwrap(), 30.0);
    }

    #[test]
    fn ema_period_1_tracks_last_price() {
        assert_relative_eq!(ema(&[10.0, 20.0, 30.0], 1).unwrap(), 30.0);
    }

    #[test]
    fn ema_constant_series() {
        let prices = vec![55.5; 30];
        assert_relative_eq!(ema(&prices, 12).unwrap(), 55.5, epsilon = 1e-9);
    }

    #[test]
    fn ema_insufficient_history() {
        assert_eq!(ema(&[1.0, 2.0], 3), None);
    }

    #[test]
    fn ema_zero_period() {
        assert_eq!(ema(&[1.0, 2.0], 0), None);
    }

    #[test]
    fn ema_weights_recent_prices_more_than_sma() {
        // seed = 10, k = 0.4: 50*0.4 + 10*0.6 = 26; SMA of last 4 = 20.
        let prices = [10.0, 10.0, 10.0, 10.0, 50.0];
        let ema_val = ema(&prices, 4).unwrap();
        let sma_val = super::super::sma::sma(&prices, 4).unwrap();
        assert_relative_eq!(ema_val, 26.0, epsilon = 1e-9);
        assert!(ema_val > sma_val);
    }
}
