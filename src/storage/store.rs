use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::domain::{Account, AccountId};

/// Durable store for the full account map.
///
/// The whole document is loaded into memory on open and rewritten on every
/// save via write-temp-then-rename, so a crash mid-write never corrupts the
/// previously committed state. A leftover temp file from a crashed write is
/// ignored on the next open and overwritten by the next save.
pub struct AccountStore {
    path: PathBuf,
    accounts: BTreeMap<AccountId, Account>,
}

impl AccountStore {
    /// Open the store at `path`. If no document exists yet, the demo seed
    /// dataset is created and persisted before returning; `today` becomes
    /// the seed accounts' initial withdrawal-counter date.
    pub fn open(path: impl Into<PathBuf>, today: NaiveDate) -> Result<Self> {
        let path = path.into();

        if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read account store at {}", path.display()))?;
            let accounts = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse account store at {}", path.display()))?;
            Ok(Self { path, accounts })
        } else {
            let store = Self {
                path,
                accounts: seed_accounts(today),
            };
            store.save()?;
            Ok(store)
        }
    }

    /// Persist the entire account map durably. The document is written to a
    /// sibling temp file first and atomically renamed over the target.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.accounts)
            .context("Failed to serialize account store")?;

        let tmp = temp_path(&self.path);
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write account store at {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| {
            format!("Failed to commit account store at {}", self.path.display())
        })?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.get_mut(id)
    }

    pub fn accounts(&self) -> &BTreeMap<AccountId, Account> {
        &self.accounts
    }
}

/// Demo dataset written on first run.
fn seed_accounts(today: NaiveDate) -> BTreeMap<AccountId, Account> {
    let mut accounts = BTreeMap::new();
    accounts.insert(
        "1001".to_string(),
        Account::new("Alice", "1234", 100_000_00, today),
    );
    accounts.insert(
        "1002".to_string(),
        Account::new("Bob", "4321", 50_000_00, today),
    );
    accounts
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("accounts.json")
    }

    #[test]
    fn test_open_seeds_demo_accounts_on_first_run() {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::open(store_path(&dir), today()).unwrap();

        assert!(store.contains("1001"));
        assert!(store.contains("1002"));
        assert_eq!(store.get("1001").unwrap().balance, 100_000_00);
        assert_eq!(store.get("1002").unwrap().balance, 50_000_00);
        // The seed is persisted before open returns
        assert!(store_path(&dir).exists());
    }

    #[test]
    fn test_save_then_open_roundtrips_all_business_data() {
        let dir = TempDir::new().unwrap();
        let mut store = AccountStore::open(store_path(&dir), today()).unwrap();

        {
            let account = store.get_mut("1001").unwrap();
            account.balance = 99_500_00;
            account.daily_withdrawn = 500_00;
            account.record(
                today().and_hms_opt(10, 15, 0).unwrap(),
                crate::domain::TransactionKind::Withdrawal,
                500_00,
                "",
            );
        }
        store.save().unwrap();

        let reloaded = AccountStore::open(store_path(&dir), today()).unwrap();
        assert_eq!(reloaded.accounts(), store.accounts());
    }

    #[test]
    fn test_open_fails_on_unparsable_document() {
        let dir = TempDir::new().unwrap();
        std::fs::write(store_path(&dir), "not json{").unwrap();

        let result = AccountStore::open(store_path(&dir), today());
        assert!(result.is_err());
    }

    #[test]
    fn test_stale_temp_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        // A crashed write leaves a partial temp file behind
        std::fs::write(temp_path(&path), "{ partial garbage").unwrap();

        let store = AccountStore::open(&path, today()).unwrap();
        assert!(store.contains("1001"));

        // The next save simply overwrites the stale temp file
        store.save().unwrap();
        let reloaded = AccountStore::open(&path, today()).unwrap();
        assert!(reloaded.contains("1001"));
    }

    #[test]
    fn test_save_replaces_previous_document_atomically() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let mut store = AccountStore::open(&path, today()).unwrap();

        store.get_mut("1002").unwrap().balance = 50_500_00;
        store.save().unwrap();

        // No temp file lingers after a successful save
        assert!(!temp_path(&path).exists());
        let reloaded = AccountStore::open(&path, today()).unwrap();
        assert_eq!(reloaded.get("1002").unwrap().balance, 50_500_00);
    }
}
