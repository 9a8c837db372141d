//! Exactly-once guard for escrow payouts.
//!
//! Each escrow may pay out once. Recording the same [`EscrowId`] a second
//! time returns [`EscrowError::AlreadySettled`].
//!
//! The log is a bounded FIFO set so memory stays predictable for a
//! long-lived ledger.

use std::collections::{HashSet, VecDeque};

use trustlock_types::{EscrowError, EscrowId, Result};

/// Bounded set of escrow ids that have already been paid out.
#[derive(Debug, Clone)]
pub struct SettlementLog {
    settled: HashSet<EscrowId>,
    /// Insertion order for eviction (front = oldest).
    order: VecDeque<EscrowId>,
    capacity: usize,
}

impl SettlementLog {
    /// # Panics
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "SettlementLog capacity must be > 0");
        Self {
            settled: HashSet::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Fail if `escrow` has already been recorded, without recording it.
    pub fn check(&self, escrow: EscrowId) -> Result<()> {
        if self.settled.contains(&escrow) {
            return Err(EscrowError::AlreadySettled(escrow));
        }
        Ok(())
    }

    /// Record a payout for `escrow`.
    ///
    /// # Errors
    /// [`EscrowError::AlreadySettled`] if it was recorded before.
    pub fn record(&mut self, escrow: EscrowId) -> Result<()> {
        self.check(escrow)?;

        if self.settled.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.settled.remove(&oldest);
            }
        }

        self.settled.insert(escrow);
        self.order.push_back(escrow);
        Ok(())
    }

    #[must_use]
    pub fn is_settled(&self, escrow: EscrowId) -> bool {
        self.settled.contains(&escrow)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.settled.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_record_ok() {
        let mut log = SettlementLog::new(10);
        log.record(EscrowId(0)).unwrap();
        assert!(log.is_settled(EscrowId(0)));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn second_record_blocked() {
        let mut log = SettlementLog::new(10);
        log.record(EscrowId(4)).unwrap();
        let err = log.record(EscrowId(4)).unwrap_err();
        assert!(
            matches!(err, EscrowError::AlreadySettled(id) if id == EscrowId(4)),
            "Expected AlreadySettled, got: {err:?}"
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn check_does_not_record() {
        let mut log = SettlementLog::new(10);
        log.check(EscrowId(1)).unwrap();
        assert!(log.is_empty());
        log.record(EscrowId(1)).unwrap();
        assert!(log.check(EscrowId(1)).is_err());
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut log = SettlementLog::new(2);
        log.record(EscrowId(1)).unwrap();
        log.record(EscrowId(2)).unwrap();
        log.record(EscrowId(3)).unwrap();
        assert_eq!(log.len(), 2);
        assert!(!log.is_settled(EscrowId(1)));
        assert!(log.is_settled(EscrowId(2)));
        assert!(log.is_settled(EscrowId(3)));
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn zero_capacity_panics() {
        let _ = SettlementLog::new(0);
    }
}
