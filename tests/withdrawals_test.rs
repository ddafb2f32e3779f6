mod common;

use anyhow::Result;
use common::{ALICE, BOB, date, service_on, test_service};
use teller::application::{AppError, PER_TX_WITHDRAW_LIMIT};
use teller::domain::TransactionKind;

#[test]
fn test_withdrawal_updates_balance_and_history() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    let balance = service.withdraw(ALICE, 500_00)?;

    assert_eq!(balance, 99_500_00);
    let history = service.history(ALICE)?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, TransactionKind::Withdrawal);
    assert_eq!(history[0].amount, 500_00);
    assert_eq!(history[0].balance, 99_500_00);

    Ok(())
}

#[test]
fn test_per_transaction_limit_rejected_without_state_change() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    // One cent over the per-transaction limit
    let err = service.withdraw(ALICE, 10_000_01).unwrap_err();

    assert!(matches!(
        err,
        AppError::PerTxLimitExceeded {
            limit: PER_TX_WITHDRAW_LIMIT
        }
    ));
    let snapshot = service.snapshot(ALICE)?;
    assert_eq!(snapshot.balance, 100_000_00);
    assert!(snapshot.recent.is_empty());

    Ok(())
}

#[test]
fn test_per_transaction_limit_checked_before_funds() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    // Violates both the per-transaction limit and Bob's balance; the
    // per-transaction limit is surfaced first
    let err = service.withdraw(BOB, 60_000_00).unwrap_err();

    assert!(matches!(err, AppError::PerTxLimitExceeded { .. }));

    Ok(())
}

#[test]
fn test_insufficient_funds_checked_before_daily_limit() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    // Exhaust the daily allowance, then drain the balance via a transfer
    // (transfers are not limited)
    service.withdraw(BOB, 10_000_00)?;
    service.withdraw(BOB, 10_000_00)?;
    service.transfer(BOB, ALICE, 29_000_00)?;

    // 2000.00 now violates both the balance (1000.00 left) and the daily
    // limit; the balance check is surfaced first
    let err = service.withdraw(BOB, 2_000_00).unwrap_err();

    assert!(matches!(
        err,
        AppError::InsufficientFunds {
            balance: 1_000_00,
            required: 2_000_00
        }
    ));

    Ok(())
}

#[test]
fn test_daily_limit_reports_remaining_allowance() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    // Two 8000.00 withdrawals succeed, the third exceeds the 20000.00 daily
    // limit and reports the exact remaining allowance
    service.withdraw(ALICE, 8_000_00)?;
    service.withdraw(ALICE, 8_000_00)?;
    let err = service.withdraw(ALICE, 8_000_00).unwrap_err();

    assert!(matches!(
        err,
        AppError::DailyLimitExceeded {
            remaining: 4_000_00
        }
    ));
    // Balance reflects only the two successful withdrawals
    assert_eq!(service.snapshot(ALICE)?.balance, 84_000_00);
    assert_eq!(service.history(ALICE)?.len(), 2);

    Ok(())
}

#[test]
fn test_daily_limit_error_is_displayable() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    service.withdraw(ALICE, 8_000_00)?;
    service.withdraw(ALICE, 8_000_00)?;
    let err = service.withdraw(ALICE, 8_000_00).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Daily limit exceeded. You can still withdraw up to 4000.00 today"
    );

    Ok(())
}

#[test]
fn test_daily_counter_resets_on_new_date() -> Result<()> {
    let (mut service, temp) = test_service()?;

    // Day one: 16000.00 withdrawn
    service.withdraw(ALICE, 8_000_00)?;
    service.withdraw(ALICE, 8_000_00)?;
    drop(service);

    // Day two: the counter starts fresh, so 19000.00 is available again
    let mut service = service_on(&temp, date(2024, 6, 2))?;
    service.withdraw(ALICE, 9_000_00)?;
    service.withdraw(ALICE, 10_000_00)?;

    // And the new day's own limit still applies
    let err = service.withdraw(ALICE, 2_000_00).unwrap_err();
    assert!(matches!(
        err,
        AppError::DailyLimitExceeded {
            remaining: 1_000_00
        }
    ));

    Ok(())
}

#[test]
fn test_counter_never_resets_mid_day() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    service.withdraw(ALICE, 10_000_00)?;
    service.withdraw(ALICE, 10_000_00)?;

    // The full allowance is spent; nothing more today
    let err = service.withdraw(ALICE, 0_01).unwrap_err();
    assert!(matches!(err, AppError::DailyLimitExceeded { remaining: 0 }));

    Ok(())
}

#[test]
fn test_withdrawal_rejects_non_positive_amounts() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    assert!(matches!(
        service.withdraw(ALICE, 0).unwrap_err(),
        AppError::InvalidAmount(_)
    ));
    assert!(matches!(
        service.withdraw(ALICE, -500_00).unwrap_err(),
        AppError::InvalidAmount(_)
    ));
    assert_eq!(service.snapshot(ALICE)?.balance, 100_000_00);

    Ok(())
}

#[test]
fn test_deposit_updates_balance_and_history() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    let balance = service.deposit(ALICE, 2_500_50)?;

    assert_eq!(balance, 102_500_50);
    let history = service.history(ALICE)?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, TransactionKind::Deposit);
    assert_eq!(history[0].amount, 2_500_50);
    assert_eq!(history[0].balance, 102_500_50);

    Ok(())
}

#[test]
fn test_deposit_rejects_non_positive_amounts() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    assert!(matches!(
        service.deposit(ALICE, 0).unwrap_err(),
        AppError::InvalidAmount(_)
    ));
    assert_eq!(service.snapshot(ALICE)?.balance, 100_000_00);

    Ok(())
}

#[test]
fn test_deposit_does_not_consume_daily_allowance() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    service.deposit(ALICE, 50_000_00)?;

    // The full daily withdrawal allowance is still available
    service.withdraw(ALICE, 10_000_00)?;
    service.withdraw(ALICE, 10_000_00)?;

    assert_eq!(service.snapshot(ALICE)?.balance, 130_000_00);

    Ok(())
}
