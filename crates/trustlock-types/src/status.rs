//! Read-only status snapshots.
//!
//! These are what UIs, CLIs, and auditors see. They are derived purely from
//! instance state plus the caller-supplied `now`; computing one never
//! mutates anything.

use serde::{Deserialize, Serialize};

use crate::{Address, DisputeState, EscrowId, EscrowKind, EscrowState, Ruling, Timestamp, Vote};

/// Current votes of a multi-party escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub depositor: Vote,
    pub beneficiary: Vote,
    pub arbiter: Vote,
    pub release_votes: u8,
    pub refund_votes: u8,
    pub votes_needed: u8,
}

impl VoteTally {
    #[must_use]
    pub fn release_reached(&self) -> bool {
        self.release_votes >= self.votes_needed
    }

    #[must_use]
    pub fn refund_reached(&self) -> bool {
        self.refund_votes >= self.votes_needed
    }
}

/// Multi-party extras of an [`EscrowStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiPartyStatus {
    pub tally: VoteTally,
    pub dispute_state: DisputeState,
    pub resolution_deadline: Timestamp,
    /// A dispute is pending and its resolution deadline has passed.
    pub dispute_overdue: bool,
    pub resolver: Option<Address>,
    pub outcome: Option<Ruling>,
    pub can_vote: bool,
    pub can_raise_dispute: bool,
}

/// Full snapshot of one escrow instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowStatus {
    pub id: EscrowId,
    pub kind: EscrowKind,
    pub state: EscrowState,
    pub state_name: String,
    pub depositor: Address,
    pub beneficiary: Address,
    pub arbiter: Option<Address>,
    pub amount: u64,
    /// Value currently held by the instance.
    pub balance: u64,
    pub funded_at: Timestamp,
    pub deadline: Timestamp,
    pub is_funded: bool,
    pub is_terminal: bool,
    pub is_timeout_expired: bool,
    /// The depositor could release right now.
    pub can_release: bool,
    /// The depositor could refund right now.
    pub can_refund: bool,
    /// Anyone could force a refund right now.
    pub can_force_refund: bool,
    pub multi: Option<MultiPartyStatus>,
}

impl EscrowStatus {
    /// Serialize for display or export.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
