//! CSV tick feed replay adapter.
//!
//! Columns: `timestamp,symbol,price,percent_change_24h,volume_24h`
//! with an RFC 3339 timestamp. Rows sharing a timestamp form one
//! batch, so a polling cycle that observed every symbol at once
//! replays as a single `apply_batch` call. Malformed rows are skipped
//! with a warning, never fatal.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::error::TickbotError;
use crate::domain::tick::PriceTick;
use crate::ports::tick_port::TickSource;

#[derive(Debug)]
pub struct CsvFeedAdapter {
    batches: Vec<Vec<PriceTick>>,
    next: usize,
}

impl CsvFeedAdapter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TickbotError> {
        let mut reader = csv::Reader::from_path(&path).map_err(|e| TickbotError::Feed {
            reason: format!("failed to open {}: {}", path.as_ref().display(), e),
        })?;

        let mut ticks = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|e| TickbotError::Feed {
                reason: format!("CSV parse error: {}", e),
            })?;
            match parse_row(&record) {
                Ok(tick) => ticks.push(tick),
                Err(reason) => {
                    warn!(row = row + 1, %reason, "skipping malformed feed row");
                }
            }
        }

        Ok(Self {
            batches: group_by_timestamp(ticks),
            next: 0,
        })
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }
}

impl TickSource for CsvFeedAdapter {
    fn next_batch(&mut self) -> Result<Option<Vec<PriceTick>>, TickbotError> {
        if self.next >= self.batches.len() {
            return Ok(None);
        }
        let batch = self.batches[self.next].clone();
        self.next += 1;
        Ok(Some(batch))
    }
}

fn parse_row(record: &csv::StringRecord) -> Result<PriceTick, String> {
    let timestamp_str = record.get(0).ok_or("missing timestamp column")?;
    let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(timestamp_str)
        .map_err(|e| format!("invalid timestamp '{}': {}", timestamp_str, e))?
        .with_timezone(&Utc);

    let symbol = record
        .get(1)
        .filter(|s| !s.trim().is_empty())
        .ok_or("missing or empty symbol column")?
        .trim()
        .to_string();

    let price: f64 = record
        .get(2)
        .ok_or("missing price column")?
        .parse()
        .map_err(|e| format!("invalid price value: {}", e))?;

    let percent_change_24h: f64 = record
        .get(3)
        .ok_or("missing percent_change_24h column")?
        .parse()
        .map_err(|e| format!("invalid percent_change_24h value: {}", e))?;

    let volume_24h: f64 = record
        .get(4)
        .ok_or("missing volume_24h column")?
        .parse()
        .map_err(|e| format!("invalid volume_24h value: {}", e))?;

    Ok(PriceTick {
        symbol,
        price,
        percent_change_24h,
        volume_24h,
        timestamp,
    })
}

/// Consecutive rows with an identical timestamp become one batch; rows
/// are kept in file order.
fn group_by_timestamp(ticks: Vec<PriceTick>) -> Vec<Vec<PriceTick>> {
    let mut batches: Vec<Vec<PriceTick>> = Vec::new();
    for tick in ticks {
        match batches.last_mut() {
            Some(batch) if batch[0].timestamp == tick.timestamp => batch.push(tick),
            _ => batches.push(vec![tick]),
        }
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "timestamp,symbol,price,percent_change_24h,volume_24h\n";

    fn write_feed(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}{}", HEADER, content).unwrap();
        file
    }

    #[test]
    fn rows_group_into_batches_by_timestamp() {
        let file = write_feed(
            "2024-03-01T10:00:00Z,btc,42000.0,1.5,1000000\n\
             2024-03-01T10:00:00Z,eth,3000.0,-0.5,500000\n\
             2024-03-01T10:00:30Z,btc,42100.0,1.6,1000000\n",
        );
        let mut feed = CsvFeedAdapter::from_path(file.path()).unwrap();
        assert_eq!(feed.batch_count(), 2);

        let first = feed.next_batch().unwrap().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].symbol, "btc");
        assert_eq!(first[1].symbol, "eth");

        let second = feed.next_batch().unwrap().unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].price, 42100.0);

        assert!(feed.next_batch().unwrap().is_none());
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let file = write_feed(
            "2024-03-01T10:00:00Z,btc,42000.0,1.5,1000000\n\
             not-a-timestamp,eth,3000.0,-0.5,500000\n\
             2024-03-01T10:00:00Z,sol,oops,0.1,100\n\
             2024-03-01T10:00:30Z,btc,42100.0,1.6,1000000\n",
        );
        let mut feed = CsvFeedAdapter::from_path(file.path()).unwrap();
        assert_eq!(feed.batch_count(), 2);
        assert_eq!(feed.next_batch().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn empty_feed_is_exhausted_immediately() {
        let file = write_feed("");
        let mut feed = CsvFeedAdapter::from_path(file.path()).unwrap();
        assert_eq!(feed.batch_count(), 0);
        assert!(feed.next_batch().unwrap().is_none());
    }

    #[test]
    fn missing_file_is_a_feed_error() {
        let err = CsvFeedAdapter::from_path("/nonexistent/feed.csv").unwrap_err();
        assert!(matches!(err, TickbotError::Feed { .. }));
    }

    #[test]
    fn timestamps_convert_to_utc() {
        let file = write_feed("2024-03-01T12:00:00+02:00,btc,42000.0,1.5,1000000\n");
        let mut feed = CsvFeedAdapter::from_path(file.path()).unwrap();
        let batch = feed.next_batch().unwrap().unwrap();
        assert_eq!(batch[0].hour(), 10);
    }
}
