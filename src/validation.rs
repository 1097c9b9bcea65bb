use bs58;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid date: {0}. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start date must not be after end date")]
    InvalidRange,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Both the key and the address must be present before any request is made.
pub fn validate_fetch_input(api_key: &str, address: &str) -> Result<(), ValidationError> {
    if api_key.trim().is_empty() {
        return Err(ValidationError::MissingParameter("api_key".to_string()));
    }

    if address.trim().is_empty() {
        return Err(ValidationError::MissingParameter("address".to_string()));
    }

    Ok(())
}

/// Returns true when the address decodes to a 32-byte base58 key.
pub fn is_solana_address(address: &str) -> bool {
    match bs58::decode(address.trim()).into_vec() {
        Ok(bytes) => bytes.len() == 32,
        Err(_) => false,
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

pub fn validate_max_rows(max_rows: usize) -> Result<usize, ValidationError> {
    if max_rows == 0 {
        return Err(ValidationError::InvalidParameter(
            "max_rows must be greater than 0".to_string(),
        ));
    }
    Ok(max_rows)
}
