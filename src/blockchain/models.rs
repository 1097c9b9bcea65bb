// Maps the differently-shaped balance-change and transaction objects onto `Row`

use crate::models::Row;
use serde_json::Value;

pub const TIMESTAMP_ALIASES: &[&str] = &["blockTime", "block_time", "blockTimeUnix"];
pub const SIGNATURE_ALIASES: &[&str] = &["txHash", "tx_hash"];
pub const SLOT_ALIASES: &[&str] = &["slot", "block_id"];
pub const FEE_ALIASES: &[&str] = &["fee", "feeLamports"];
pub const ERROR_ALIASES: &[&str] = &["err", "error"];

/// First non-null value among `aliases`, checked in order.
fn first_present<'a>(item: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|name| item.get(*name))
        .find(|value| !value.is_null())
}

fn as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn as_u64(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

pub fn extract_signature(item: &Value) -> Option<String> {
    match first_present(item, SIGNATURE_ALIASES)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Normalize one raw API object into a canonical row.
pub fn extract_row(item: &Value) -> Row {
    Row {
        timestamp: first_present(item, TIMESTAMP_ALIASES).and_then(as_i64),
        signature: extract_signature(item),
        slot: first_present(item, SLOT_ALIASES).and_then(as_u64),
        fee_lamports: first_present(item, FEE_ALIASES)
            .and_then(as_u64)
            .unwrap_or(0),
        error: first_present(item, ERROR_ALIASES).cloned(),
    }
}

pub fn extract_rows(items: &[Value]) -> Vec<Row> {
    items.iter().map(extract_row).collect()
}
