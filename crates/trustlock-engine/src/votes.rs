//! The fixed three-slot vote record of a multi-party escrow.
//!
//! One slot per [`Role`]. Changing a vote moves at most one counter up and
//! one down, so `release_votes` and `refund_votes` always equal the number
//! of slots holding that choice.

use serde::{Deserialize, Serialize};
use trustlock_types::{constants, Role, Ruling, Vote, VoteTally};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteBook {
    depositor: Vote,
    beneficiary: Vote,
    arbiter: Vote,
    release_votes: u8,
    refund_votes: u8,
    /// Set before a terminal settlement runs; cleared with the rest of the
    /// book once the escrow is terminal.
    consensus_executed: bool,
}

impl VoteBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, role: Role) -> Vote {
        match role {
            Role::Depositor => self.depositor,
            Role::Beneficiary => self.beneficiary,
            Role::Arbiter => self.arbiter,
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Vote {
        match role {
            Role::Depositor => &mut self.depositor,
            Role::Beneficiary => &mut self.beneficiary,
            Role::Arbiter => &mut self.arbiter,
        }
    }

    /// Record `role`'s vote. Returns `false` if it already held that vote.
    pub(crate) fn cast(&mut self, role: Role, choice: Ruling) -> bool {
        let new = Vote::from(choice);
        let previous = std::mem::replace(self.slot_mut(role), new);
        if previous == new {
            return false;
        }
        match previous {
            Vote::Release => self.release_votes -= 1,
            Vote::Refund => self.refund_votes -= 1,
            Vote::Unset => {}
        }
        match new {
            Vote::Release => self.release_votes += 1,
            Vote::Refund => self.refund_votes += 1,
            Vote::Unset => {}
        }
        true
    }

    /// Release is checked first; both cannot reach two among three slots.
    #[must_use]
    pub fn consensus(&self) -> Option<Ruling> {
        if self.release_votes >= constants::VOTES_REQUIRED {
            Some(Ruling::Release)
        } else if self.refund_votes >= constants::VOTES_REQUIRED {
            Some(Ruling::Refund)
        } else {
            None
        }
    }

    #[must_use]
    pub fn release_votes(&self) -> u8 {
        self.release_votes
    }

    #[must_use]
    pub fn refund_votes(&self) -> u8 {
        self.refund_votes
    }

    #[must_use]
    pub fn is_consensus_executed(&self) -> bool {
        self.consensus_executed
    }

    pub(crate) fn mark_consensus_executed(&mut self) {
        self.consensus_executed = true;
    }

    /// Wipe every slot, counter, and the consensus flag once the escrow is
    /// terminal.
    pub(crate) fn clear(&mut self) {
        self.depositor = Vote::Unset;
        self.beneficiary = Vote::Unset;
        self.arbiter = Vote::Unset;
        self.release_votes = 0;
        self.refund_votes = 0;
        self.consensus_executed = false;
    }

    #[must_use]
    pub fn tally(&self) -> VoteTally {
        VoteTally {
            depositor: self.depositor,
            beneficiary: self.beneficiary,
            arbiter: self.arbiter,
            release_votes: self.release_votes,
            refund_votes: self.refund_votes,
            votes_needed: constants::VOTES_REQUIRED,
        }
    }
}
