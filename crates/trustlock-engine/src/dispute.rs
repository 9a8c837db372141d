//! Dispute record of a multi-party escrow.
//!
//! `NONE → PENDING → RESOLVED`. Raising a dispute only flags the escrow for
//! the arbiter; it never blocks voting or the timeout path. The resolution
//! deadline is reported, not enforced.

use serde::{Deserialize, Serialize};
use trustlock_types::{Address, DisputeState, EscrowError, Result, Ruling, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeRecord {
    state: DisputeState,
    reason: Option<String>,
    opened_at: Timestamp,
    resolution_deadline: Timestamp,
    resolver: Option<Address>,
    outcome: Option<Ruling>,
}

impl DisputeRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> DisputeState {
        self.state
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    #[must_use]
    pub fn opened_at(&self) -> Timestamp {
        self.opened_at
    }

    #[must_use]
    pub fn resolution_deadline(&self) -> Timestamp {
        self.resolution_deadline
    }

    #[must_use]
    pub fn resolver(&self) -> Option<Address> {
        self.resolver
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Ruling> {
        self.outcome
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state == DisputeState::Pending
    }

    /// Pending and past its resolution deadline.
    #[must_use]
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        self.is_pending() && now >= self.resolution_deadline
    }

    /// Check that a dispute could be opened with `reason`, without opening it.
    pub(crate) fn check_open(&self, reason: &str) -> Result<()> {
        if reason.trim().is_empty() {
            return Err(EscrowError::InvalidParameters {
                reason: "dispute reason must not be empty".into(),
            });
        }
        if self.is_pending() {
            return Err(EscrowError::DisputeAlreadyPending);
        }
        Ok(())
    }

    pub(crate) fn open(
        &mut self,
        reason: &str,
        now: Timestamp,
        timeout_seconds: u64,
    ) -> Result<()> {
        self.check_open(reason)?;
        self.state = DisputeState::Pending;
        self.reason = Some(reason.to_string());
        self.opened_at = now;
        self.resolution_deadline = now.plus_seconds(timeout_seconds);
        self.resolver = None;
        self.outcome = None;
        Ok(())
    }

    pub(crate) fn resolve(&mut self, arbiter: Address, ruling: Ruling) -> Result<()> {
        if !self.is_pending() {
            return Err(EscrowError::DisputeNotPending);
        }
        self.state = DisputeState::Resolved;
        self.resolver = Some(arbiter);
        self.outcome = Some(ruling);
        Ok(())
    }

    /// Drop the per-dispute details once the escrow is terminal. A resolved
    /// dispute keeps its state, resolver, and outcome for audit; an
    /// unresolved one goes back to NONE.
    pub(crate) fn clear_on_terminal(&mut self) {
        if self.state != DisputeState::Resolved {
            self.state = DisputeState::None;
            self.resolver = None;
            self.outcome = None;
        }
        self.reason = None;
        self.opened_at = Timestamp::ZERO;
        self.resolution_deadline = Timestamp::ZERO;
    }
}
