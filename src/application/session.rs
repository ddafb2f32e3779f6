use crate::domain::{AccountId, Cents};

use super::{AccountSnapshot, AppError, LedgerService, TransferReceipt};

/// Binds a caller to exactly one active account for the duration of a
/// session: Unauthenticated -> authenticate -> Active(id) -> end_session ->
/// Unauthenticated. Every account-scoped operation goes through here, so the
/// presentation layer never picks the account on its own.
pub struct SessionGate {
    service: LedgerService,
    active: Option<AccountId>,
}

impl SessionGate {
    pub fn new(service: LedgerService) -> Self {
        Self {
            service,
            active: None,
        }
    }

    /// Authenticate against an account id / PIN pair. On success the account
    /// becomes active; on failure the session state is unchanged. No lockout
    /// or attempt counting.
    pub fn authenticate(&mut self, id: &str, pin: &str) -> bool {
        if self.service.verify_pin(id, pin) {
            self.active = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_account(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Persist any in-memory state and return to the unauthenticated state.
    pub fn end_session(&mut self) -> Result<(), AppError> {
        if self.active.take().is_some() {
            self.service.persist()?;
        }
        Ok(())
    }

    fn require_active(&self) -> Result<AccountId, AppError> {
        self.active.clone().ok_or(AppError::InvalidSessionState)
    }

    // ========================
    // Session-scoped operations
    // ========================

    pub fn deposit(&mut self, amount: Cents) -> Result<Cents, AppError> {
        let id = self.require_active()?;
        self.service.deposit(&id, amount)
    }

    pub fn withdraw(&mut self, amount: Cents) -> Result<Cents, AppError> {
        let id = self.require_active()?;
        self.service.withdraw(&id, amount)
    }

    pub fn transfer(&mut self, dest_id: &str, amount: Cents) -> Result<TransferReceipt, AppError> {
        let id = self.require_active()?;
        self.service.transfer(&id, dest_id, amount)
    }

    pub fn change_pin(
        &mut self,
        current: &str,
        new_pin: &str,
        confirm: &str,
    ) -> Result<(), AppError> {
        let id = self.require_active()?;
        self.service.change_pin(&id, current, new_pin, confirm)
    }

    /// Snapshot of the active account for display.
    pub fn snapshot(&self) -> Result<AccountSnapshot, AppError> {
        let id = self.require_active()?;
        self.service.snapshot(&id)
    }

    /// Read access to the underlying service, e.g. for exporters.
    pub fn service(&self) -> &LedgerService {
        &self.service
    }
}
