//! Supply conservation for the reference ledger.
//!
//! ```text
//! minted - withdrawn == Σ(address balances) + Σ(escrow-held)
//! ```
//!
//! Value only enters through `mint` and leaves through `withdraw`. Funding,
//! settling, and returning a rejected call's value move it around without
//! changing the total.

use trustlock_types::{EscrowError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupplyConservation {
    minted: u128,
    withdrawn: u128,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mint(&mut self, amount: u64) {
        self.minted += u128::from(amount);
    }

    pub fn record_withdrawal(&mut self, amount: u64) {
        self.withdrawn += u128::from(amount);
    }

    #[must_use]
    pub fn expected_supply(&self) -> u128 {
        self.minted - self.withdrawn
    }

    #[must_use]
    pub fn total_minted(&self) -> u128 {
        self.minted
    }

    #[must_use]
    pub fn total_withdrawn(&self) -> u128 {
        self.withdrawn
    }

    /// # Errors
    /// [`EscrowError::SupplyInvariantViolation`] if `actual` differs from
    /// the expected supply.
    pub fn verify(&self, actual: u128) -> Result<()> {
        let expected = self.expected_supply();
        if actual != expected {
            return Err(EscrowError::SupplyInvariantViolation {
                reason: format!(
                    "actual supply {actual} != expected {expected} \
                     (minted={}, withdrawn={})",
                    self.minted, self.withdrawn
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_supply_is_zero() {
        let sc = SupplyConservation::new();
        assert_eq!(sc.expected_supply(), 0);
        assert!(sc.verify(0).is_ok());
    }

    #[test]
    fn mint_and_withdraw() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(1_000);
        sc.record_mint(500);
        sc.record_withdrawal(300);
        assert_eq!(sc.expected_supply(), 1_200);
        assert_eq!(sc.total_minted(), 1_500);
        assert_eq!(sc.total_withdrawn(), 300);
        assert!(sc.verify(1_200).is_ok());
    }

    #[test]
    fn imbalance_detected() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(10);
        let err = sc.verify(11).unwrap_err();
        assert!(matches!(err, EscrowError::SupplyInvariantViolation { .. }));
    }

    #[test]
    fn no_overflow_past_u64() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(u64::MAX);
        sc.record_mint(u64::MAX);
        assert_eq!(sc.expected_supply(), u128::from(u64::MAX) * 2);
    }
}
