use std::result::Result as StdResult;

use thiserror::Error;

use crate::currency::Money;

/// Unified error type for distributor, recorder, and storage layers.
#[derive(Error, Debug)]
pub enum QuotaError {
    #[error("Voucher number is required")]
    MissingVoucher,
    #[error("Payment exceeds remaining balance of {remaining}")]
    ExcessPayment { remaining: Money },
    #[error("Unknown distribution policy: {0}")]
    InvalidPolicy(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Quota has no participants")]
    NoParticipants,
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
    #[error("Quota not found: {0}")]
    QuotaNotFound(String),
    #[error("Version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, QuotaError>;

impl From<std::io::Error> for QuotaError {
    fn from(err: std::io::Error) -> Self {
        QuotaError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for QuotaError {
    fn from(err: serde_json::Error) -> Self {
        QuotaError::Storage(err.to_string())
    }
}
