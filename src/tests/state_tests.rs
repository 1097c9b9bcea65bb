#[cfg(test)]
mod tests {
    use crate::models::Row;
    use crate::state::{log_progress, FetchStatus, StateTracker};

    fn row(sig: &str) -> Row {
        Row {
            timestamp: None,
            signature: Some(sig.to_string()),
            slot: None,
            fee_lamports: 0,
            error: None,
        }
    }

    #[test]
    fn test_advance_never_moves_backwards() {
        let mut tracker = StateTracker::new();
        tracker.advance(40);
        tracker.advance(20);
        assert_eq!(tracker.state().progress, 40);

        tracker.advance(45);
        assert_eq!(tracker.state().progress, 45);
    }

    #[test]
    fn test_advance_clamps_at_100() {
        let mut tracker = StateTracker::new();
        tracker.advance(250);
        assert_eq!(tracker.state().progress, 100);
    }

    #[test]
    fn test_fail_keeps_progress_and_rows() {
        let mut tracker = StateTracker::new();
        tracker.advance(45);
        tracker.rows_mut().push(row("a"));
        tracker.fail("HTTP error: status 500 Internal Server Error".to_string());

        assert_eq!(tracker.state().progress, 45);
        assert_eq!(tracker.row_count(), 1);
        assert!(tracker.state().status.is_terminal());
    }

    #[test]
    fn test_finish_and_reset() {
        let mut tracker = StateTracker::new();
        let rx = tracker.subscribe();
        tracker.rows_mut().push(row("a"));
        tracker.finish();

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.status, FetchStatus::Done);
        assert_eq!(snapshot.progress, 100);
        assert_eq!(snapshot.row_count, 1);

        tracker.reset();
        assert_eq!(tracker.state().status, FetchStatus::Idle);
        assert_eq!(tracker.state().progress, 0);
        assert_eq!(tracker.row_count(), 0);
        assert_eq!(rx.borrow().progress, 0);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(FetchStatus::FetchingBalanceChanges.to_string(), "fetching balance changes");
        assert_eq!(FetchStatus::Failed("x".to_string()).to_string(), "failed: x");
        assert!(!FetchStatus::FetchingTransactions.is_terminal());
    }

    #[tokio::test]
    async fn test_progress_logger_stops_on_terminal_status() {
        let mut tracker = StateTracker::new();
        let logger = tokio::spawn(log_progress(tracker.subscribe()));

        tracker.set_status(FetchStatus::FetchingTransactions);
        tracker.advance(45);
        tracker.fail("fetch cancelled".to_string());

        let last = logger.await.unwrap();
        assert_eq!(last.status, FetchStatus::Failed("fetch cancelled".to_string()));
        assert_eq!(last.progress, 45);
    }

    #[tokio::test]
    async fn test_progress_logger_stops_when_tracker_dropped() {
        let mut tracker = StateTracker::new();
        let logger = tokio::spawn(log_progress(tracker.subscribe()));

        tracker.advance(20);
        drop(tracker);

        let last = logger.await.unwrap();
        assert!(!last.status.is_terminal());
        assert!(last.progress <= 20);
    }
}
