use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Cents, serde_cents};

/// Maximum number of transactions retained per account. Older entries are
/// evicted from the front; this is the storage cap, independent of the
/// mini-statement display window.
pub const HISTORY_CAP: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money added to the account from outside
    Deposit,
    /// Money dispensed from the account
    Withdrawal,
    /// Debit leg of a transfer to another account
    TransferOut,
    /// Credit leg of a transfer from another account
    TransferIn,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::TransferOut => "transfer_out",
            TransactionKind::TransferIn => "transfer_in",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(TransactionKind::Deposit),
            "withdrawal" => Some(TransactionKind::Withdrawal),
            "transfer_out" => Some(TransactionKind::TransferOut),
            "transfer_in" => Some(TransactionKind::TransferIn),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single history entry. Immutable once recorded - corrections happen as
/// new movements, never by editing history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// When the movement happened, second resolution
    #[serde(with = "second_resolution")]
    pub time: NaiveDateTime,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Magnitude of the movement (always positive)
    #[serde(with = "serde_cents")]
    pub amount: Cents,
    /// Owner's balance immediately after this movement
    #[serde(with = "serde_cents")]
    pub balance: Cents,
    /// Free-text annotation, e.g. the counterparty account id for transfers
    #[serde(default)]
    pub meta: String,
}

/// Append-only, bounded transaction history.
/// Serialized transparently as the plain list of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a movement. `balance` is the owner's balance after the
    /// triggering mutation has been applied. Evicts from the front once the
    /// cap is exceeded; cannot fail.
    pub fn append(
        &mut self,
        time: NaiveDateTime,
        kind: TransactionKind,
        amount: Cents,
        balance: Cents,
        meta: impl Into<String>,
    ) {
        self.entries.push(Transaction {
            time,
            kind,
            amount,
            balance,
            meta: meta.into(),
        });
        if self.entries.len() > HISTORY_CAP {
            let excess = self.entries.len() - HISTORY_CAP;
            self.entries.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    /// The most recent `n` entries, oldest first.
    pub fn last_n(&self, n: usize) -> &[Transaction] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }
}

mod second_resolution {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
