//! Bounded per-symbol price history.

/// Ordered price window, oldest first. Once capacity is reached every
/// push evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    prices: Vec<f64>,
    capacity: usize,
}

impl PriceHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        PriceHistory {
            prices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, price: f64) {
        if self.prices.len() == self.capacity {
            self.prices.remove(0);
        }
        self.prices.push(price);
    }

    /// The current window, oldest first.
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
