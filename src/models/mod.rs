// Canonical row model shared by the normalizer, the controller and the exporters

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::ValidationError;

/// One normalized transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Seconds since epoch; `None` means the time is unknown.
    pub timestamp: Option<i64>,
    pub signature: Option<String>,
    pub slot: Option<u64>,
    pub fee_lamports: u64,
    /// Raw error payload as returned by the API.
    pub error: Option<Value>,
}

impl Row {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Passthrough of the account-detail `data` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary(pub Value);

impl AccountSummary {
    pub fn lamports(&self) -> Option<u64> {
        let value = self.0.get("lamports")?;
        value
            .as_u64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
    }

    pub fn account_type(&self) -> Option<&str> {
        self.0
            .get("type")
            .or_else(|| self.0.get("account_type"))
            .and_then(Value::as_str)
    }
}

/// Inclusive time window in epoch seconds; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl DateRange {
    pub fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self { start, end }
    }

    /// Start is midnight UTC of the start date, end is the last second of the end date.
    pub fn from_dates(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ValidationError::InvalidRange);
            }
        }

        let start = start.map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)).timestamp());
        let end = end.map(|d| {
            Utc.from_utc_datetime(&d.and_hms_opt(23, 59, 59).unwrap_or(d.and_time(NaiveTime::MIN)))
                .timestamp()
        });

        Ok(Self { start, end })
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Rows with an unknown timestamp always pass.
    pub fn contains(&self, timestamp: Option<i64>) -> bool {
        let Some(ts) = timestamp else {
            return true;
        };
        if self.start.is_some_and(|start| ts < start) {
            return false;
        }
        if self.end.is_some_and(|end| ts > end) {
            return false;
        }
        true
    }
}
