use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Cents, TransactionKind, TransactionLog, serde_cents};

/// Accounts are keyed by a short caller-visible identifier such as "1001".
pub type AccountId = String;

/// One ledger account. The id is the key of the store's account map, not a
/// field of the record, so the persisted document stays `id -> record`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub pin: String,
    #[serde(with = "serde_cents")]
    pub balance: Cents,
    #[serde(with = "serde_cents")]
    pub daily_withdrawn: Cents,
    pub withdraw_date: NaiveDate,
    #[serde(default)]
    pub transactions: TransactionLog,
}

impl Account {
    pub fn new(name: impl Into<String>, pin: impl Into<String>, balance: Cents, today: NaiveDate) -> Self {
        Self {
            name: name.into(),
            pin: pin.into(),
            balance,
            daily_withdrawn: 0,
            withdraw_date: today,
            transactions: TransactionLog::new(),
        }
    }

    /// Roll the daily-withdrawal counter forward the first time an operation
    /// observes a calendar date newer than the counter's date. Never resets
    /// mid-day.
    pub fn reconcile_daily_counter(&mut self, today: NaiveDate) {
        if self.withdraw_date != today {
            self.withdraw_date = today;
            self.daily_withdrawn = 0;
        }
    }

    /// Append a history entry against the current balance. Call after the
    /// triggering mutation so the entry captures the resulting balance.
    pub fn record(
        &mut self,
        time: NaiveDateTime,
        kind: TransactionKind,
        amount: Cents,
        meta: impl Into<String>,
    ) {
        let balance = self.balance;
        self.transactions.append(time, kind, amount, balance, meta);
    }
}

/// A valid PIN is 4 to 6 ASCII digits.
pub fn is_valid_pin(pin: &str) -> bool {
    (4..=6).contains(&pin.len()) && pin.chars().all(|c| c.is_ascii_digit())
}
