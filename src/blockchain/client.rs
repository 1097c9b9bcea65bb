use crate::config::Config;
use crate::models::AccountSummary;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

const TOKEN_HEADER: &str = "token";
const ACCOUNT_DETAIL_PATH: &str = "/v2.0/account/detail";
const BALANCE_CHANGE_PATH: &str = "/v2.0/account/balance_change";
const TRANSACTIONS_PATH: &str = "/v2.0/account/transactions";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: status {status}")]
    Http { status: StatusCode },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// `{ "success": ..., "data": ... }` wrapper shared by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Value,
}

impl Envelope {
    fn into_items(self) -> Vec<Value> {
        match self.data {
            Value::Array(items) => items,
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccountDetailResponse {
    pub account: Option<AccountSummary>,
}

#[derive(Debug, Clone, Default)]
pub struct BalanceChangePage {
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionPage {
    pub items: Vec<Value>,
}

/// Balance-change query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChangeQuery {
    pub from_time: i64,
    pub to_time: i64,
    pub page: u32,
    pub page_size: u32,
}

/// The three remote calls the controller depends on.
#[allow(async_fn_in_trait)]
pub trait HistorySource {
    async fn get_account_detail(
        &self,
        address: &str,
        api_key: &str,
    ) -> Result<AccountDetailResponse, ClientError>;

    async fn get_balance_changes(
        &self,
        address: &str,
        api_key: &str,
        query: BalanceChangeQuery,
    ) -> Result<BalanceChangePage, ClientError>;

    async fn get_transaction_page(
        &self,
        address: &str,
        api_key: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<TransactionPage, ClientError>;
}

/// HTTP client for the Solscan Pro API. The key is supplied per call and never stored.
#[derive(Clone)]
pub struct SolscanClient {
    http: Client,
    base_url: String,
}

impl SolscanClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        info!("Initializing Solscan client with endpoint: {}", config.api_url);

        let http = Client::builder().timeout(config.http_timeout).build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_envelope(
        &self,
        path: &str,
        api_key: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http { status });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl HistorySource for SolscanClient {
    async fn get_account_detail(
        &self,
        address: &str,
        api_key: &str,
    ) -> Result<AccountDetailResponse, ClientError> {
        let envelope = self
            .get_envelope(ACCOUNT_DETAIL_PATH, api_key, &[("address", address.to_string())])
            .await?;

        let account = match envelope.data {
            Value::Null => None,
            data => Some(AccountSummary(data)),
        };

        Ok(AccountDetailResponse { account })
    }

    async fn get_balance_changes(
        &self,
        address: &str,
        api_key: &str,
        query: BalanceChangeQuery,
    ) -> Result<BalanceChangePage, ClientError> {
        let params = [
            ("address", address.to_string()),
            ("from_time", query.from_time.to_string()),
            ("to_time", query.to_time.to_string()),
            ("page", query.page.to_string()),
            ("page_size", query.page_size.to_string()),
        ];
        let envelope = self.get_envelope(BALANCE_CHANGE_PATH, api_key, &params).await?;

        Ok(BalanceChangePage {
            items: envelope.into_items(),
        })
    }

    async fn get_transaction_page(
        &self,
        address: &str,
        api_key: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<TransactionPage, ClientError> {
        let mut params = vec![
            ("address", address.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(before) = cursor {
            params.push(("beforeHash", before.to_string()));
        }
        let envelope = self.get_envelope(TRANSACTIONS_PATH, api_key, &params).await?;

        Ok(TransactionPage {
            items: envelope.into_items(),
        })
    }
}
