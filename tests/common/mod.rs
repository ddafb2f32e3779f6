// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;
use teller::application::{LedgerService, SessionGate};
use teller::domain::{Clock, FixedClock};
use teller::storage::AccountStore;

/// Build a calendar date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Default date for fixed-clock tests
pub fn test_date() -> NaiveDate {
    date(2024, 6, 1)
}

/// Helper to create a test service with a temporary store, pinned to the
/// default test date. Keep the TempDir alive for the duration of the test.
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = service_on(&temp_dir, test_date())?;
    Ok((service, temp_dir))
}

/// Open (or reopen) the store in `temp_dir` with a clock pinned to `date`.
/// Reopening on a later date simulates a session after a date rollover.
pub fn service_on(temp_dir: &TempDir, date: NaiveDate) -> Result<LedgerService> {
    let clock = FixedClock::on_date(date);
    let store = AccountStore::open(temp_dir.path().join("accounts.json"), clock.today())?;
    Ok(LedgerService::with_clock(store, Box::new(clock)))
}

/// Helper to create a session gate over a fresh test service
pub fn test_session() -> Result<(SessionGate, TempDir)> {
    let (service, temp_dir) = test_service()?;
    Ok((SessionGate::new(service), temp_dir))
}

/// Seed accounts from the demo dataset
pub const ALICE: &str = "1001";
pub const ALICE_PIN: &str = "1234";
pub const BOB: &str = "1002";
pub const BOB_PIN: &str = "4321";
