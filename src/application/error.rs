use thiserror::Error;

use crate::domain::{Cents, format_cents};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Per-transaction limit is {}", fmt_cents(.limit))]
    PerTxLimitExceeded { limit: Cents },

    #[error("Insufficient funds: balance {}, required {}", fmt_cents(.balance), fmt_cents(.required))]
    InsufficientFunds { balance: Cents, required: Cents },

    #[error("Daily limit exceeded. You can still withdraw up to {} today", fmt_cents(.remaining))]
    DailyLimitExceeded { remaining: Cents },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Cannot transfer to the same account")]
    SelfTransfer,

    #[error("Invalid account or PIN")]
    AuthFailure,

    #[error("PINs do not match")]
    PinMismatch,

    #[error("PIN must be 4 to 6 digits")]
    InvalidPinFormat,

    #[error("No active session")]
    InvalidSessionState,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] anyhow::Error),
}

fn fmt_cents(cents: &Cents) -> String {
    format_cents(*cents)
}
