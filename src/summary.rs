// Totals and per-day buckets behind the KPI and chart views

use crate::models::Row;
use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyBucket {
    pub count: usize,
    pub failed: usize,
    pub fee_lamports: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub total: usize,
    pub failed: usize,
    pub total_fee_lamports: u64,
    pub earliest: Option<i64>,
    pub latest: Option<i64>,
    /// Keyed by UTC day. Rows with an unknown time are not bucketed.
    pub daily: BTreeMap<NaiveDate, DailyBucket>,
}

impl HistorySummary {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut summary = Self::default();

        for row in rows {
            summary.total += 1;
            summary.total_fee_lamports = summary.total_fee_lamports.saturating_add(row.fee_lamports);
            if row.is_failed() {
                summary.failed += 1;
            }

            let Some(ts) = row.timestamp else {
                continue;
            };
            summary.earliest = Some(summary.earliest.map_or(ts, |e| e.min(ts)));
            summary.latest = Some(summary.latest.map_or(ts, |l| l.max(ts)));

            if let Some(day) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) {
                let bucket = summary.daily.entry(day).or_default();
                bucket.count += 1;
                bucket.fee_lamports = bucket.fee_lamports.saturating_add(row.fee_lamports);
                if row.is_failed() {
                    bucket.failed += 1;
                }
            }
        }

        summary
    }

    pub fn succeeded(&self) -> usize {
        self.total - self.failed
    }
}
