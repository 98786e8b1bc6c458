use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::logbook::models::LogEntry;

/// In-memory log history, newest first, bounded to `limit` entries.
///
/// Only the HTTP layer writes here, after a submission has fully succeeded.
#[derive(Clone)]
pub struct LogHistory {
    entries: Arc<RwLock<VecDeque<LogEntry>>>,
    limit: usize,
}

impl LogHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            limit,
        }
    }

    pub async fn record(&self, entry: LogEntry) {
        let mut entries = self.entries.write().await;
        entries.push_front(entry);
        entries.truncate(self.limit);
    }

    pub async fn newest_first(&self) -> Vec<LogEntry> {
        self.entries.read().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ComparisonResult;
    use chrono::Utc;

    fn entry(manual: f64) -> LogEntry {
        LogEntry::assemble(
            Utc::now(),
            manual,
            120,
            None,
            &ComparisonResult {
                discrepancy_detected: false,
                discrepancy_explanation: "fine".to_string(),
                suggested_action: "none".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_newest_entry_comes_first() {
        let history = LogHistory::new(10);
        history.record(entry(100.0)).await;
        history.record(entry(200.0)).await;

        let entries = history.newest_first().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].manual_value, 200.0);
        assert_eq!(entries[1].manual_value, 100.0);
    }

    #[tokio::test]
    async fn test_oldest_entries_drop_past_limit() {
        let history = LogHistory::new(2);
        for manual in [100.0, 110.0, 120.0] {
            history.record(entry(manual)).await;
        }

        let entries = history.newest_first().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].manual_value, 120.0);
        assert_eq!(entries[1].manual_value, 110.0);
    }
}
