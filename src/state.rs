use crate::models::{AccountSummary, Row};
use std::fmt;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    FetchingAccount,
    FetchingBalanceChanges,
    FetchingTransactions,
    Done,
    Failed(String),
}

impl FetchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchStatus::Done | FetchStatus::Failed(_))
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Idle => write!(f, "idle"),
            FetchStatus::FetchingAccount => write!(f, "fetching account"),
            FetchStatus::FetchingBalanceChanges => write!(f, "fetching balance changes"),
            FetchStatus::FetchingTransactions => write!(f, "fetching transactions"),
            FetchStatus::Done => write!(f, "done"),
            FetchStatus::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

/// Everything the presentation layer reads after (or during) a fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    pub status: FetchStatus,
    pub progress: u8,
    pub account: Option<AccountSummary>,
    pub rows: Vec<Row>,
}

/// Lightweight view pushed to subscribers on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub status: FetchStatus,
    pub progress: u8,
    pub row_count: usize,
}

/// Owns the fetch state and broadcasts progress over a watch channel.
pub struct StateTracker {
    state: FetchState,
    sender: watch::Sender<ProgressSnapshot>,
}

impl StateTracker {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ProgressSnapshot::default());
        Self {
            state: FetchState::default(),
            sender,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.sender.subscribe()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.state.rows
    }

    pub fn row_count(&self) -> usize {
        self.state.rows.len()
    }

    /// Drop everything from the previous fetch.
    pub fn reset(&mut self) {
        self.state = FetchState::default();
        self.publish();
    }

    pub fn set_status(&mut self, status: FetchStatus) {
        self.state.status = status;
        self.publish();
    }

    pub fn set_account(&mut self, account: Option<AccountSummary>) {
        self.state.account = account;
    }

    /// Progress never moves backwards.
    pub fn advance(&mut self, progress: u8) {
        self.state.progress = self.state.progress.max(progress.min(100));
        self.publish();
    }

    pub fn finish(&mut self) {
        self.state.status = FetchStatus::Done;
        self.state.progress = 100;
        self.publish();
    }

    /// Progress and rows are left as they are.
    pub fn fail(&mut self, message: String) {
        self.state.status = FetchStatus::Failed(message);
        self.publish();
    }

    pub fn publish(&self) {
        self.sender.send_replace(ProgressSnapshot {
            status: self.state.status.clone(),
            progress: self.state.progress,
            row_count: self.state.rows.len(),
        });
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Log each published snapshot until the fetch reaches a terminal status or
/// the tracker goes away. Returns the last snapshot seen.
pub async fn log_progress(mut progress: watch::Receiver<ProgressSnapshot>) -> ProgressSnapshot {
    let mut last = progress.borrow().clone();
    while progress.changed().await.is_ok() {
        last = progress.borrow_and_update().clone();
        info!("[{:>3}%] {} ({} rows)", last.progress, last.status, last.row_count);
        if last.status.is_terminal() {
            break;
        }
    }
    last
}
