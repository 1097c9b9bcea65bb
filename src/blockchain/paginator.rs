use crate::blockchain::client::{ClientError, HistorySource};
use crate::blockchain::models::extract_signature;
use futures::Stream;
use serde_json::Value;
use tracing::{debug, warn};

/// Cursor-driven walk over the transaction endpoint, newest first.
///
/// Each batch's last item supplies the `beforeHash` cursor for the next request.
/// The walk ends on an empty page, on a last item without a hash, or after the
/// first request error. It cannot be restarted.
pub struct TransactionPaginator<'a, S> {
    source: &'a S,
    address: &'a str,
    api_key: &'a str,
    limit: u32,
    cursor: Option<String>,
    exhausted: bool,
    pages_fetched: usize,
}

impl<'a, S: HistorySource> TransactionPaginator<'a, S> {
    pub fn new(source: &'a S, address: &'a str, api_key: &'a str, limit: u32) -> Self {
        Self {
            source,
            address,
            api_key,
            limit,
            cursor: None,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Fetch the next batch, or `None` once the sequence has ended.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<Value>>, ClientError> {
        if self.exhausted {
            return Ok(None);
        }

        let page = match self
            .source
            .get_transaction_page(self.address, self.api_key, self.limit, self.cursor.as_deref())
            .await
        {
            Ok(page) => page,
            Err(e) => {
                self.exhausted = true;
                return Err(e);
            }
        };
        self.pages_fetched += 1;

        if page.items.is_empty() {
            debug!("Transaction pages exhausted for {} after {} pages", self.address, self.pages_fetched);
            self.exhausted = true;
            return Ok(None);
        }

        match page.items.last().and_then(extract_signature) {
            Some(next) => self.cursor = Some(next),
            None => {
                warn!("Last transaction on page {} has no hash; stopping pagination", self.pages_fetched);
                self.exhausted = true;
            }
        }

        Ok(Some(page.items))
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<Value>, ClientError>> + 'a
    where
        S: 'a,
    {
        futures::stream::try_unfold(self, |mut pager| async move {
            let batch = pager.next_batch().await?;
            Ok::<_, ClientError>(batch.map(|batch| (batch, pager)))
        })
    }
}
