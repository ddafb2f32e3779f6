use std::path::PathBuf;

use crate::domain::{
    Account, AccountId, Cents, Clock, SystemClock, Transaction, TransactionKind, is_valid_pin,
};
use crate::storage::AccountStore;

use super::AppError;

/// Maximum amount permitted in a single withdrawal. Process-wide policy,
/// not per-account.
pub const PER_TX_WITHDRAW_LIMIT: Cents = 10_000_00;

/// Maximum cumulative amount withdrawable per calendar date per account.
pub const DAILY_WITHDRAW_LIMIT: Cents = 20_000_00;

/// Display window for snapshots: how many recent transactions a mini
/// statement shows. Independent of the storage cap.
pub const MINI_STATEMENT_LEN: usize = 10;

/// Application service enforcing every business rule of the ledger.
/// This is the sole authority for mutating balances; each mutation is
/// validated, recorded in history, and persisted before it returns.
pub struct LedgerService {
    store: AccountStore,
    clock: Box<dyn Clock>,
}

/// Display snapshot of an account.
#[derive(Debug)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub name: String,
    pub balance: Cents,
    /// Mini statement: the most recent transactions, oldest first
    pub recent: Vec<Transaction>,
}

/// Result of a completed transfer.
#[derive(Debug)]
pub struct TransferReceipt {
    pub amount: Cents,
    pub source_balance: Cents,
    pub dest_balance: Cents,
}

impl LedgerService {
    /// Create a service over an already-open store, using the system clock.
    pub fn new(store: AccountStore) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    /// Create a service with an injected clock. Tests use this to simulate
    /// date rollover deterministically.
    pub fn with_clock(store: AccountStore, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Open (or seed) the store at the given path with the system clock.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let clock = SystemClock;
        let store = AccountStore::open(path, clock.today())?;
        Ok(Self::with_clock(store, Box::new(clock)))
    }

    // ========================
    // Lookups
    // ========================

    fn account(&self, id: &str) -> Result<&Account, AppError> {
        self.store
            .get(id)
            .ok_or_else(|| AppError::AccountNotFound(id.to_string()))
    }

    fn account_mut(&mut self, id: &str) -> Result<&mut Account, AppError> {
        self.store
            .get_mut(id)
            .ok_or_else(|| AppError::AccountNotFound(id.to_string()))
    }

    /// True if the account exists and its stored PIN matches.
    pub fn verify_pin(&self, id: &str, pin: &str) -> bool {
        self.store.get(id).is_some_and(|account| account.pin == pin)
    }

    /// Display snapshot: id, name, balance and the mini statement.
    pub fn snapshot(&self, id: &str) -> Result<AccountSnapshot, AppError> {
        let account = self.account(id)?;
        Ok(AccountSnapshot {
            id: id.to_string(),
            name: account.name.clone(),
            balance: account.balance,
            recent: account.transactions.last_n(MINI_STATEMENT_LEN).to_vec(),
        })
    }

    /// Full stored history for an account (bounded by the storage cap).
    pub fn history(&self, id: &str) -> Result<&[Transaction], AppError> {
        Ok(self.account(id)?.transactions.entries())
    }

    // ========================
    // Mutations
    // ========================

    /// Add a positive amount to the account balance.
    pub fn deposit(&mut self, id: &str, amount: Cents) -> Result<Cents, AppError> {
        ensure_positive(amount)?;

        let now = self.clock.timestamp();
        let account = self.account_mut(id)?;
        let prior = account.clone();

        account.balance += amount;
        account.record(now, TransactionKind::Deposit, amount, "");
        let balance = account.balance;

        self.commit(vec![(id, prior)])?;
        Ok(balance)
    }

    /// Withdraw from the account, enforcing the per-transaction limit, the
    /// balance, and the daily limit - in that order. The daily counter is
    /// rolled over first if the calendar date changed since its last update.
    pub fn withdraw(&mut self, id: &str, amount: Cents) -> Result<Cents, AppError> {
        ensure_positive(amount)?;

        let now = self.clock.timestamp();
        let today = self.clock.today();
        let account = self.account_mut(id)?;
        let prior = account.clone();

        account.reconcile_daily_counter(today);

        let violation = if amount > PER_TX_WITHDRAW_LIMIT {
            Some(AppError::PerTxLimitExceeded {
                limit: PER_TX_WITHDRAW_LIMIT,
            })
        } else if amount > account.balance {
            Some(AppError::InsufficientFunds {
                balance: account.balance,
                required: amount,
            })
        } else if account.daily_withdrawn + amount > DAILY_WITHDRAW_LIMIT {
            Some(AppError::DailyLimitExceeded {
                remaining: DAILY_WITHDRAW_LIMIT - account.daily_withdrawn,
            })
        } else {
            None
        };

        if let Some(err) = violation {
            // A rejected withdrawal leaves no trace, not even the counter
            // roll - the next operation reconciles again from disk state.
            *account = prior;
            return Err(err);
        }

        account.balance -= amount;
        account.daily_withdrawn += amount;
        account.record(now, TransactionKind::Withdrawal, amount, "");
        let balance = account.balance;

        self.commit(vec![(id, prior)])?;
        Ok(balance)
    }

    /// Move funds between two distinct accounts as a single unit: both
    /// balances change and both histories grow, then the store is persisted
    /// once. If persistence fails, neither account keeps the transfer.
    /// No per-transaction or daily limit applies.
    pub fn transfer(
        &mut self,
        source_id: &str,
        dest_id: &str,
        amount: Cents,
    ) -> Result<TransferReceipt, AppError> {
        ensure_positive(amount)?;

        let prior_dest = self.account(dest_id)?.clone();
        if dest_id == source_id {
            return Err(AppError::SelfTransfer);
        }
        let prior_source = self.account(source_id)?.clone();
        if amount > prior_source.balance {
            return Err(AppError::InsufficientFunds {
                balance: prior_source.balance,
                required: amount,
            });
        }

        let now = self.clock.timestamp();

        let source = self.account_mut(source_id)?;
        source.balance -= amount;
        source.record(now, TransactionKind::TransferOut, amount, format!("to {dest_id}"));
        let source_balance = source.balance;

        let dest = self.account_mut(dest_id)?;
        dest.balance += amount;
        dest.record(now, TransactionKind::TransferIn, amount, format!("from {source_id}"));
        let dest_balance = dest.balance;

        self.commit(vec![(source_id, prior_source), (dest_id, prior_dest)])?;

        Ok(TransferReceipt {
            amount,
            source_balance,
            dest_balance,
        })
    }

    /// Replace the account PIN. Requires the current PIN, a matching
    /// confirmation, and a 4-6 digit new PIN. No history entry is appended.
    pub fn change_pin(
        &mut self,
        id: &str,
        current: &str,
        new_pin: &str,
        confirm: &str,
    ) -> Result<(), AppError> {
        let account = self.account_mut(id)?;
        if account.pin != current {
            return Err(AppError::AuthFailure);
        }
        if new_pin != confirm {
            return Err(AppError::PinMismatch);
        }
        if !is_valid_pin(new_pin) {
            return Err(AppError::InvalidPinFormat);
        }

        let prior = account.clone();
        account.pin = new_pin.to_string();

        self.commit(vec![(id, prior)])?;
        Ok(())
    }

    /// Persist the current state. Mutating operations already persist before
    /// returning; this is for session teardown.
    pub fn persist(&self) -> Result<(), AppError> {
        Ok(self.store.save()?)
    }

    /// Persist the store; on failure restore the pre-mutation snapshots so
    /// in-memory state never silently diverges from disk.
    fn commit(&mut self, rollback: Vec<(&str, Account)>) -> Result<(), AppError> {
        match self.store.save() {
            Ok(()) => Ok(()),
            Err(err) => {
                for (id, prior) in rollback {
                    if let Some(account) = self.store.get_mut(id) {
                        *account = prior;
                    }
                }
                Err(AppError::StorageUnavailable(err))
            }
        }
    }
}

fn ensure_positive(amount: Cents) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::InvalidAmount(
            "amount must be positive".to_string(),
        ));
    }
    Ok(())
}
