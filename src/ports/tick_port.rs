//! Tick feed port trait.

use crate::domain::error::TickbotError;
use crate::domain::tick::PriceTick;

/// Pull-based tick supplier. The core never fetches, parses or retries
/// by itself; a feed adapter hands it ready batches.
pub trait TickSource {
    /// Next batch of ticks in time order, or `None` once exhausted.
    fn next_batch(&mut self) -> Result<Option<Vec<PriceTick>>, TickbotError>;
}
