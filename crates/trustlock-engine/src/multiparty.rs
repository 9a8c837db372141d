//! Multi-party escrow: 2-of-3 consensus with arbiter dispute resolution.
//!
//! Depositor, beneficiary, and arbiter each hold one vote. The first
//! choice to collect two matching votes settles the escrow. Depositor or
//! beneficiary may raise a dispute, and the arbiter may then settle it with
//! a ruling. Voting stays open while a dispute is pending; whichever path
//! settles first wins, and the other is refused because the escrow is no
//! longer FUNDED.
//!
//! There is no unilateral release or refund. The permissionless
//! `force_refund` after the deadline is the liveness guarantee.

use serde::{Deserialize, Serialize};
use trustlock_settlement::ValueTransfer;
use trustlock_types::{
    Address, CallContext, EscrowError, EscrowId, EscrowKind, EscrowPolicy, EscrowState,
    EscrowStatus, EscrowTerms, MultiPartyStatus, Result, Role, Ruling, Settlement, Timestamp,
    VoteTally,
};

use crate::dispute::DisputeRecord;
use crate::lifecycle::Lifecycle;
use crate::validators;
use crate::votes::VoteBook;

/// What a vote call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Vote stored; no consensus yet.
    Recorded(VoteTally),
    /// This vote completed a consensus and the escrow settled.
    Settled(Settlement),
}

impl VoteOutcome {
    #[must_use]
    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            Self::Settled(s) => Some(s),
            Self::Recorded(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiPartyEscrow {
    core: Lifecycle,
    votes: VoteBook,
    dispute: DisputeRecord,
    dispute_timeout_seconds: u64,
}

impl MultiPartyEscrow {
    /// # Errors
    /// `InvalidParameters` if `terms` has no arbiter, otherwise the first
    /// failing validator.
    pub fn new(id: EscrowId, terms: EscrowTerms, policy: &EscrowPolicy) -> Result<Self> {
        let Some(arbiter) = terms.arbiter else {
            return Err(EscrowError::InvalidParameters {
                reason: "multi-party escrow requires an arbiter".into(),
            });
        };
        validators::validate_terms(&terms, policy)?;
        tracing::info!(
            escrow = %id,
            depositor = %terms.depositor,
            beneficiary = %terms.beneficiary,
            arbiter = %arbiter,
            amount = terms.amount,
            timeout_seconds = terms.timeout_seconds,
            "Multi-party escrow created"
        );
        Ok(Self {
            core: Lifecycle::new(id, terms),
            votes: VoteBook::new(),
            dispute: DisputeRecord::new(),
            dispute_timeout_seconds: policy.dispute_timeout_seconds,
        })
    }

    #[must_use]
    pub fn id(&self) -> EscrowId {
        self.core.id()
    }

    #[must_use]
    pub fn terms(&self) -> &EscrowTerms {
        self.core.terms()
    }

    #[must_use]
    pub fn state(&self) -> EscrowState {
        self.core.state()
    }

    #[must_use]
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.core
    }

    #[must_use]
    pub fn votes(&self) -> &VoteBook {
        &self.votes
    }

    #[must_use]
    pub fn dispute(&self) -> &DisputeRecord {
        &self.dispute
    }

    #[must_use]
    pub fn tally(&self) -> VoteTally {
        self.votes.tally()
    }

    pub fn fund(&mut self, ctx: &CallContext) -> Result<()> {
        self.core.fund(ctx)
    }

    pub fn vote_release<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<VoteOutcome> {
        self.vote(ctx, Ruling::Release, transfer)
    }

    pub fn vote_refund<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<VoteOutcome> {
        self.vote(ctx, Ruling::Refund, transfer)
    }

    fn vote<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        choice: Ruling,
        transfer: &mut T,
    ) -> Result<VoteOutcome> {
        self.core.require_funded()?;
        let role = self.require_party(ctx, "vote")?;
        if self.votes.is_consensus_executed() {
            return Err(EscrowError::TerminalState(self.core.state()));
        }

        let snapshot = self.votes.clone();
        let changed = self.votes.cast(role, choice);
        tracing::debug!(
            escrow = %self.id(),
            voter = %ctx.caller,
            role = %role,
            choice = %choice,
            changed,
            release_votes = self.votes.release_votes(),
            refund_votes = self.votes.refund_votes(),
            "Vote recorded"
        );

        let Some(ruling) = self.votes.consensus() else {
            return Ok(VoteOutcome::Recorded(self.votes.tally()));
        };

        self.votes.mark_consensus_executed();
        match self.core.settle(ruling.terminal_state(), ctx.now, transfer) {
            Ok(settlement) => {
                tracing::info!(escrow = %self.id(), ruling = %ruling, "Consensus reached");
                self.finish_terminal();
                Ok(VoteOutcome::Settled(settlement))
            }
            Err(err) => {
                self.votes = snapshot;
                Err(err)
            }
        }
    }

    /// Depositor or beneficiary flags the escrow for the arbiter.
    pub fn raise_dispute(&mut self, ctx: &CallContext, reason: &str) -> Result<()> {
        self.core.require_funded()?;
        let role = self.require_party(ctx, "raise a dispute")?;
        if role == Role::Arbiter {
            return Err(self.unauthorized(ctx, "raise a dispute"));
        }
        self.dispute.open(reason, ctx.now, self.dispute_timeout_seconds)?;
        tracing::info!(
            escrow = %self.id(),
            raised_by = %ctx.caller,
            reason,
            resolution_deadline = %self.dispute.resolution_deadline(),
            "Dispute raised"
        );
        Ok(())
    }

    /// Arbiter settles a pending dispute with `ruling`.
    pub fn resolve_dispute<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        ruling: Ruling,
        transfer: &mut T,
    ) -> Result<Settlement> {
        if self.core.terms().role_of(&ctx.caller) != Some(Role::Arbiter) {
            return Err(self.unauthorized(ctx, "resolve a dispute"));
        }
        if !self.dispute.is_pending() {
            return Err(EscrowError::DisputeNotPending);
        }
        self.core.require_funded()?;

        let votes_snapshot = self.votes.clone();
        let dispute_snapshot = self.dispute.clone();
        self.dispute.resolve(ctx.caller, ruling)?;
        self.votes.mark_consensus_executed();

        match self.core.settle(ruling.terminal_state(), ctx.now, transfer) {
            Ok(settlement) => {
                tracing::info!(
                    escrow = %self.id(),
                    arbiter = %ctx.caller,
                    ruling = %ruling,
                    "Dispute resolved"
                );
                self.finish_terminal();
                Ok(settlement)
            }
            Err(err) => {
                self.votes = votes_snapshot;
                self.dispute = dispute_snapshot;
                Err(err)
            }
        }
    }

    /// [`resolve_dispute`](Self::resolve_dispute) taking the wire outcome
    /// code (`0` = release, `1` = refund).
    pub fn resolve_dispute_code<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        code: u8,
        transfer: &mut T,
    ) -> Result<Settlement> {
        let ruling = Ruling::from_code(code)?;
        self.resolve_dispute(ctx, ruling, transfer)
    }

    pub fn force_refund<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<Settlement> {
        let settlement = self.core.force_refund(ctx, transfer)?;
        self.finish_terminal();
        Ok(settlement)
    }

    pub fn reject_direct_value(&self, ctx: &CallContext) -> Result<()> {
        self.core.reject_direct_value(ctx)
    }

    #[must_use]
    pub fn status(&self, now: Timestamp) -> EscrowStatus {
        let funded = self.core.is_funded();
        let mut status = self.core.base_status(EscrowKind::MultiParty, now);
        status.multi = Some(MultiPartyStatus {
            tally: self.votes.tally(),
            dispute_state: self.dispute.state(),
            resolution_deadline: self.dispute.resolution_deadline(),
            dispute_overdue: funded && self.dispute.is_overdue(now),
            resolver: self.dispute.resolver(),
            outcome: self.dispute.outcome(),
            can_vote: funded && !self.votes.is_consensus_executed(),
            can_raise_dispute: funded && !self.dispute.is_pending(),
        });
        status
    }

    fn require_party(&self, ctx: &CallContext, operation: &'static str) -> Result<Role> {
        self.core
            .terms()
            .role_of(&ctx.caller)
            .ok_or_else(|| self.unauthorized(ctx, operation))
    }

    fn unauthorized(&self, ctx: &CallContext, operation: &'static str) -> EscrowError {
        tracing::warn!(escrow = %self.id(), caller = %ctx.caller, operation, "Unauthorized caller");
        EscrowError::Unauthorized {
            caller: ctx.caller,
            operation,
        }
    }

    fn finish_terminal(&mut self) {
        self.votes.clear();
        self.dispute.clear_on_terminal();
    }

    /// The arbiter named in the terms.
    #[must_use]
    pub fn arbiter(&self) -> Option<Address> {
        self.core.terms().arbiter
    }
}
