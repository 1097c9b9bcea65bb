//! tests/fake.rs - In-memory history source that records every request

use crate::blockchain::client::{
    AccountDetailResponse, BalanceChangePage, BalanceChangeQuery, ClientError, HistorySource,
    TransactionPage,
};
use crate::models::AccountSummary;
use crate::state::ProgressSnapshot;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Account { address: String, api_key: String },
    BalanceChanges(BalanceChangeQuery),
    Transactions { limit: u32, cursor: Option<String> },
}

/// A page is either a list of items or an HTTP status to fail with.
pub type FakePage = Result<Vec<Value>, u16>;

#[derive(Default)]
pub struct FakeSource {
    pub account: Option<Value>,
    pub account_status: Option<u16>,
    /// Page `n` is served from index `n - 1`; later pages are empty.
    pub balance_pages: Vec<FakePage>,
    tx_pages: Mutex<VecDeque<FakePage>>,
    calls: Mutex<Vec<Call>>,
    progress: Mutex<Option<watch::Receiver<ProgressSnapshot>>>,
    seen_progress: Mutex<Vec<u8>>,
}

fn http_error(status: u16) -> ClientError {
    ClientError::Http {
        status: StatusCode::from_u16(status).unwrap(),
    }
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            account: Some(json!({ "account": "acct", "lamports": 2_500_000_000u64, "type": "system_account" })),
            ..Default::default()
        }
    }

    pub fn with_tx_pages(self, pages: Vec<FakePage>) -> Self {
        *self.tx_pages.lock().unwrap() = pages.into();
        self
    }

    pub fn with_balance_pages(mut self, pages: Vec<FakePage>) -> Self {
        self.balance_pages = pages;
        self
    }

    pub fn with_account_status(mut self, status: u16) -> Self {
        self.account_status = Some(status);
        self
    }

    /// Record the published progress each time a request is made.
    pub fn observe(&self, progress: watch::Receiver<ProgressSnapshot>) {
        *self.progress.lock().unwrap() = Some(progress);
    }

    pub fn seen_progress(&self) -> Vec<u8> {
        self.seen_progress.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        if let Some(rx) = self.progress.lock().unwrap().as_ref() {
            self.seen_progress.lock().unwrap().push(rx.borrow().progress);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tx_calls(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Transactions { cursor, .. } => Some(cursor),
                _ => None,
            })
            .collect()
    }

    pub fn balance_calls(&self) -> Vec<BalanceChangeQuery> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::BalanceChanges(query) => Some(query),
                _ => None,
            })
            .collect()
    }
}

impl HistorySource for FakeSource {
    async fn get_account_detail(
        &self,
        address: &str,
        api_key: &str,
    ) -> Result<AccountDetailResponse, ClientError> {
        self.record(Call::Account {
            address: address.to_string(),
            api_key: api_key.to_string(),
        });
        if let Some(status) = self.account_status {
            return Err(http_error(status));
        }
        Ok(AccountDetailResponse {
            account: self.account.clone().map(AccountSummary),
        })
    }

    async fn get_balance_changes(
        &self,
        _address: &str,
        _api_key: &str,
        query: BalanceChangeQuery,
    ) -> Result<BalanceChangePage, ClientError> {
        self.record(Call::BalanceChanges(query));
        let page = self
            .balance_pages
            .get(query.page as usize - 1)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()));
        page.map(|items| BalanceChangePage { items }).map_err(http_error)
    }

    async fn get_transaction_page(
        &self,
        _address: &str,
        _api_key: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<TransactionPage, ClientError> {
        self.record(Call::Transactions {
            limit,
            cursor: cursor.map(str::to_string),
        });
        let page = self
            .tx_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()));
        page.map(|items| TransactionPage { items }).map_err(http_error)
    }
}

/// Transaction-endpoint shaped item.
pub fn tx(hash: &str, block_time: Option<i64>) -> Value {
    match block_time {
        Some(t) => json!({ "tx_hash": hash, "block_time": t, "slot": 100, "fee": 5000, "status": "Success" }),
        None => json!({ "tx_hash": hash, "slot": 100, "fee": 5000, "status": "Success" }),
    }
}

/// Balance-change shaped item.
pub fn balance_change(hash: &str, block_time: i64) -> Value {
    json!({ "txHash": hash, "blockTime": block_time, "block_id": 200, "feeLamports": 10000, "amount": -15000 })
}

pub fn txs(prefix: &str, count: usize, block_time: i64) -> Vec<Value> {
    (0..count)
        .map(|i| tx(&format!("{}{}", prefix, i), Some(block_time - i as i64)))
        .collect()
}
