//! Value held by a single escrow instance.

use serde::{Deserialize, Serialize};
use trustlock_types::{EscrowError, Result};

/// The balance an escrow instance holds between `fund` and settlement.
///
/// Only `fund` deposits into a vault and only [`settle`](crate::settle)
/// empties it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    balance: u64,
}

impl Vault {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the held balance.
    ///
    /// # Errors
    /// [`EscrowError::BalanceOverflow`] if the balance would exceed `u64::MAX`.
    pub fn deposit(&mut self, amount: u64) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(EscrowError::BalanceOverflow)?;
        Ok(())
    }

    #[must_use]
    pub fn balance(&self) -> u64 {
        self.balance
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balance == 0
    }

    /// Empty the vault, returning what it held.
    pub fn take_all(&mut self) -> u64 {
        std::mem::take(&mut self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_and_take_all() {
        let mut vault = Vault::new();
        assert!(vault.is_empty());
        vault.deposit(700).unwrap();
        assert_eq!(vault.balance(), 700);
        assert_eq!(vault.take_all(), 700);
        assert!(vault.is_empty());
        assert_eq!(vault.take_all(), 0);
    }

    #[test]
    fn overflow_rejected_without_change() {
        let mut vault = Vault::new();
        vault.deposit(u64::MAX).unwrap();
        let err = vault.deposit(1).unwrap_err();
        assert_eq!(err, EscrowError::BalanceOverflow);
        assert_eq!(vault.balance(), u64::MAX);
    }
}
