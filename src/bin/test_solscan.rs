use solscan_history::blockchain::client::{BalanceChangeQuery, HistorySource};
use solscan_history::blockchain::models::extract_rows;
use solscan_history::blockchain::TransactionPaginator;
use solscan_history::{config::Config, SolscanClient};
use chrono::Utc;
use tracing::{error, info, Level};

// Manual check against the live API; needs SOLSCAN_API_KEY
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = Config::from_env();
    let Some(api_key) = config.api_key.clone() else {
        error!("SOLSCAN_API_KEY is not set");
        return Ok(());
    };
    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "9ii1FEiWSgDzXAbwj2oTmJXzkfCw78mnHwPQv9WQ5iTn".to_string());

    let client = SolscanClient::new(&config)?;

    info!("1. Account detail for {}", address);
    let detail = client.get_account_detail(&address, &api_key).await?;
    match &detail.account {
        Some(account) => info!(
            "✅ lamports={:?} type={:?}",
            account.lamports(),
            account.account_type()
        ),
        None => info!("⚠️ No account data returned"),
    }

    info!("2. First balance change page (last 7 days)");
    let now = Utc::now().timestamp();
    let page = client
        .get_balance_changes(
            &address,
            &api_key,
            BalanceChangeQuery {
                from_time: now - 7 * 86_400,
                to_time: now,
                page: 1,
                page_size: 100,
            },
        )
        .await?;
    info!("✅ {} balance changes", page.items.len());

    info!("3. Two transaction pages");
    let mut pager = TransactionPaginator::new(&client, &address, &api_key, config.tx_page_limit);
    for n in 1..=2 {
        match pager.next_batch().await? {
            Some(batch) => {
                let rows = extract_rows(&batch);
                info!(
                    "✅ page {}: {} rows, first={:?}, next cursor={:?}",
                    n,
                    rows.len(),
                    rows.first().and_then(|r| r.signature.as_deref()),
                    pager.cursor()
                );
            }
            None => {
                info!("No more pages after {}", n - 1);
                break;
            }
        }
        tokio::time::sleep(config.request_delay).await;
    }

    info!("All live checks completed");
    Ok(())
}
