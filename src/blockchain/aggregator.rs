use crate::blockchain::client::{BalanceChangeQuery, ClientError, HistorySource};
use crate::blockchain::models::extract_rows;
use crate::blockchain::paginator::TransactionPaginator;
use crate::config::{Config, BALANCE_CHANGE_PAGE_SIZE};
use crate::models::DateRange;
use crate::state::{FetchState, FetchStatus, ProgressSnapshot, StateTracker};
use crate::validation::{is_solana_address, validate_fetch_input, validate_max_rows, ValidationError};
use chrono::Utc;
use futures::TryStreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

// Progress milestones
const PROGRESS_VALIDATED: u8 = 5;
const PROGRESS_ACCOUNT: u8 = 15;
const PROGRESS_BALANCE_START: u8 = 20;
const PROGRESS_BALANCE_MAX: u8 = 35;
const PROGRESS_TX_START: u8 = 40;
const PROGRESS_TX_MAX: u8 = 95;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("fetch cancelled")]
    Cancelled,
}

/// Input for one fetch. The key lives only as long as the request.
#[derive(Clone)]
pub struct FetchRequest {
    pub api_key: String,
    pub address: String,
    pub range: DateRange,
    pub max_rows: usize,
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub request_delay: Duration,
    pub tx_page_limit: u32,
    pub balance_page_size: u32,
    /// Truncate the final set to `max_rows` instead of allowing one batch of overshoot.
    pub strict_row_cap: bool,
}

impl From<&Config> for FetchSettings {
    fn from(config: &Config) -> Self {
        Self {
            request_delay: config.request_delay,
            tx_page_limit: config.tx_page_limit,
            balance_page_size: BALANCE_CHANGE_PAGE_SIZE,
            strict_row_cap: config.strict_row_cap,
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

fn ensure_not_cancelled(token: &Option<CancellationToken>) -> Result<(), FetchError> {
    match token {
        Some(token) if token.is_cancelled() => Err(FetchError::Cancelled),
        _ => Ok(()),
    }
}

/// Drives account lookup, the optional balance-change prefetch and the
/// transaction crawl into a single result set.
pub struct Aggregator<S> {
    source: S,
    settings: FetchSettings,
    tracker: StateTracker,
    cancel: Option<CancellationToken>,
}

impl<S: HistorySource> Aggregator<S> {
    pub fn new(source: S, settings: FetchSettings) -> Self {
        Self {
            source,
            settings,
            tracker: StateTracker::new(),
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.tracker.subscribe()
    }

    pub fn state(&self) -> &FetchState {
        self.tracker.state()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run a complete fetch, replacing the previous result set.
    ///
    /// On failure the status becomes `Failed` with the error text and any rows
    /// gathered so far stay readable through [`Aggregator::state`].
    pub async fn fetch(&mut self, request: &FetchRequest) -> Result<&FetchState, FetchError> {
        self.tracker.reset();

        match self.run(request).await {
            Ok(()) => {
                self.tracker.finish();
                info!(
                    "Fetch for {} finished with {} rows",
                    request.address,
                    self.tracker.row_count()
                );
                Ok(self.tracker.state())
            }
            Err(e) => {
                error!("Fetch for {} failed: {}", request.address, e);
                self.tracker.fail(e.to_string());
                Err(e)
            }
        }
    }

    async fn run(&mut self, request: &FetchRequest) -> Result<(), FetchError> {
        validate_fetch_input(&request.api_key, &request.address)?;
        validate_max_rows(request.max_rows)?;
        if !is_solana_address(&request.address) {
            warn!("Address {} does not look like a Solana public key", request.address);
        }
        self.tracker.advance(PROGRESS_VALIDATED);

        self.tracker.set_status(FetchStatus::FetchingAccount);
        ensure_not_cancelled(&self.cancel)?;
        let detail = self
            .source
            .get_account_detail(&request.address, &request.api_key)
            .await?;
        if detail.account.is_none() {
            debug!("Account detail for {} returned no data", request.address);
        }
        self.tracker.set_account(detail.account);
        self.tracker.advance(PROGRESS_ACCOUNT);

        if request.range.is_bounded() {
            self.fetch_balance_changes(request).await?;
        }

        self.fetch_transactions(request).await?;

        if self.settings.strict_row_cap && self.tracker.row_count() > request.max_rows {
            debug!("Truncating {} rows to cap {}", self.tracker.row_count(), request.max_rows);
            self.tracker.rows_mut().truncate(request.max_rows);
        }

        Ok(())
    }

    async fn fetch_balance_changes(&mut self, request: &FetchRequest) -> Result<(), FetchError> {
        self.tracker.set_status(FetchStatus::FetchingBalanceChanges);
        self.tracker.advance(PROGRESS_BALANCE_START);

        let from_time = request.range.start.unwrap_or(0);
        let to_time = request.range.end.unwrap_or_else(|| Utc::now().timestamp());
        info!(
            "Fetching balance changes for {} between {} and {}",
            request.address, from_time, to_time
        );

        let mut page = 1u32;
        while self.tracker.row_count() < request.max_rows {
            ensure_not_cancelled(&self.cancel)?;

            let query = BalanceChangeQuery {
                from_time,
                to_time,
                page,
                page_size: self.settings.balance_page_size,
            };
            let result = self
                .source
                .get_balance_changes(&request.address, &request.api_key, query)
                .await?;

            if result.items.is_empty() {
                debug!("Balance change page {} is empty", page);
                break;
            }

            // The endpoint already applies the time range
            self.tracker.rows_mut().extend(extract_rows(&result.items));

            let step = page.saturating_mul(2).min(u32::from(PROGRESS_BALANCE_MAX - PROGRESS_BALANCE_START));
            self.tracker.advance(PROGRESS_BALANCE_START + step as u8);
            debug!(
                "Balance change page {} added {} rows ({} total)",
                page,
                result.items.len(),
                self.tracker.row_count()
            );

            page += 1;
            sleep(self.settings.request_delay).await;
        }

        if self.tracker.row_count() >= request.max_rows {
            info!("Row cap {} reached during balance change prefetch", request.max_rows);
        }
        self.tracker.advance(PROGRESS_BALANCE_MAX);
        Ok(())
    }

    async fn fetch_transactions(&mut self, request: &FetchRequest) -> Result<(), FetchError> {
        self.tracker.set_status(FetchStatus::FetchingTransactions);
        self.tracker.advance(PROGRESS_TX_START);

        let tx_start = self.tracker.row_count();
        let paginator = TransactionPaginator::new(
            &self.source,
            &request.address,
            &request.api_key,
            self.settings.tx_page_limit,
        );
        let batches = paginator.into_stream();
        futures::pin_mut!(batches);

        let mut batch_count = 0usize;
        loop {
            if self.tracker.row_count() >= request.max_rows {
                info!("Row cap {} reached, stopping transaction crawl", request.max_rows);
                break;
            }
            ensure_not_cancelled(&self.cancel)?;

            let Some(batch) = batches.try_next().await? else {
                break;
            };
            batch_count += 1;

            // Re-filter the whole transaction-phase tail every batch
            let rows = self.tracker.rows_mut();
            let mut phase = rows.split_off(tx_start);
            phase.extend(extract_rows(&batch));
            phase.retain(|row| request.range.contains(row.timestamp));
            rows.extend(phase);

            let step = (batch_count * 5).min(usize::from(PROGRESS_TX_MAX - PROGRESS_TX_START));
            self.tracker.advance(PROGRESS_TX_START + step as u8);
            debug!(
                "Transaction batch {} had {} items ({} rows total)",
                batch_count,
                batch.len(),
                self.tracker.row_count()
            );

            sleep(self.settings.request_delay).await;
        }

        Ok(())
    }
}
