//! Closed set of escrow variants.
//!
//! Callers that do not care which variant they hold go through [`Escrow`];
//! every operation dispatches exhaustively, so adding a variant is a
//! compile error everywhere it matters.

use serde::{Deserialize, Serialize};
use trustlock_settlement::ValueTransfer;
use trustlock_types::{
    CallContext, EscrowError, EscrowId, EscrowKind, EscrowPolicy, EscrowState, EscrowStatus,
    EscrowTerms, Result, Settlement, Timestamp,
};

use crate::{MultiPartyEscrow, SimpleEscrow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Escrow {
    Simple(SimpleEscrow),
    MultiParty(MultiPartyEscrow),
}

impl Escrow {
    /// Build the variant matching `terms.kind()`.
    pub fn from_terms(id: EscrowId, terms: EscrowTerms, policy: &EscrowPolicy) -> Result<Self> {
        match terms.kind() {
            EscrowKind::Simple => SimpleEscrow::new(id, terms, policy).map(Self::Simple),
            EscrowKind::MultiParty => {
                MultiPartyEscrow::new(id, terms, policy).map(Self::MultiParty)
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> EscrowKind {
        match self {
            Self::Simple(_) => EscrowKind::Simple,
            Self::MultiParty(_) => EscrowKind::MultiParty,
        }
    }

    #[must_use]
    pub fn id(&self) -> EscrowId {
        match self {
            Self::Simple(e) => e.id(),
            Self::MultiParty(e) => e.id(),
        }
    }

    #[must_use]
    pub fn state(&self) -> EscrowState {
        match self {
            Self::Simple(e) => e.state(),
            Self::MultiParty(e) => e.state(),
        }
    }

    #[must_use]
    pub fn terms(&self) -> &EscrowTerms {
        match self {
            Self::Simple(e) => e.terms(),
            Self::MultiParty(e) => e.terms(),
        }
    }

    pub fn fund(&mut self, ctx: &CallContext) -> Result<()> {
        match self {
            Self::Simple(e) => e.fund(ctx),
            Self::MultiParty(e) => e.fund(ctx),
        }
    }

    /// Unilateral release. Multi-party escrows only release by consensus
    /// or ruling, so they refuse this with `Unauthorized`.
    pub fn release<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<Settlement> {
        match self {
            Self::Simple(e) => e.release(ctx, transfer),
            Self::MultiParty(_) => Err(EscrowError::Unauthorized {
                caller: ctx.caller,
                operation: "release",
            }),
        }
    }

    /// Unilateral refund. Refused by multi-party escrows like [`Self::release`].
    pub fn refund<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<Settlement> {
        match self {
            Self::Simple(e) => e.refund(ctx, transfer),
            Self::MultiParty(_) => Err(EscrowError::Unauthorized {
                caller: ctx.caller,
                operation: "refund",
            }),
        }
    }

    pub fn force_refund<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<Settlement> {
        match self {
            Self::Simple(e) => e.force_refund(ctx, transfer),
            Self::MultiParty(e) => e.force_refund(ctx, transfer),
        }
    }

    pub fn reject_direct_value(&self, ctx: &CallContext) -> Result<()> {
        match self {
            Self::Simple(e) => e.reject_direct_value(ctx),
            Self::MultiParty(e) => e.reject_direct_value(ctx),
        }
    }

    #[must_use]
    pub fn status(&self, now: Timestamp) -> EscrowStatus {
        match self {
            Self::Simple(e) => e.status(now),
            Self::MultiParty(e) => e.status(now),
        }
    }

    #[must_use]
    pub fn as_multi_party(&self) -> Option<&MultiPartyEscrow> {
        match self {
            Self::MultiParty(e) => Some(e),
            Self::Simple(_) => None,
        }
    }

    pub fn as_multi_party_mut(&mut self) -> Option<&mut MultiPartyEscrow> {
        match self {
            Self::MultiParty(e) => Some(e),
            Self::Simple(_) => None,
        }
    }
}

impl From<SimpleEscrow> for Escrow {
    fn from(e: SimpleEscrow) -> Self {
        Self::Simple(e)
    }
}

impl From<MultiPartyEscrow> for Escrow {
    fn from(e: MultiPartyEscrow) -> Self {
        Self::MultiParty(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustlock_settlement::Ledger;
    use trustlock_types::Address;

    fn fund_both() -> (Escrow, Escrow, Ledger) {
        let policy = EscrowPolicy::default();
        let mut simple = Escrow::from_terms(EscrowId(0), EscrowTerms::fixture(), &policy).unwrap();
        let mut multi =
            Escrow::from_terms(EscrowId(1), EscrowTerms::multi_party_fixture(), &policy).unwrap();
        let depositor = Address::from_label("depositor");
        let mut ledger = Ledger::default();
        ledger.mint(depositor, 2_000_000).unwrap();
        for escrow in [&mut simple, &mut multi] {
            let ctx = CallContext::with_value(depositor, 1_000_000, Timestamp(10));
            let id = escrow.id();
            ledger
                .with_attached(id, depositor, ctx.value, || escrow.fund(&ctx))
                .unwrap();
        }
        (simple, multi, ledger)
    }

    #[test]
    fn from_terms_picks_variant() {
        let (simple, multi, _) = fund_both();
        assert_eq!(simple.kind(), EscrowKind::Simple);
        assert_eq!(multi.kind(), EscrowKind::MultiParty);
        assert!(multi.as_multi_party().is_some());
        assert!(simple.as_multi_party().is_none());
        assert_eq!(simple.state(), EscrowState::Funded);
        assert_eq!(multi.state(), EscrowState::Funded);
    }

    #[test]
    fn multi_party_refuses_unilateral_exits() {
        let (_, mut multi, mut ledger) = fund_both();
        let depositor = CallContext::call(Address::from_label("depositor"), Timestamp(11));
        let before = multi.clone();
        assert_eq!(multi.release(&depositor, &mut ledger).unwrap_err().code(), "UNAUTHORIZED");
        assert_eq!(multi.refund(&depositor, &mut ledger).unwrap_err().code(), "UNAUTHORIZED");
        assert_eq!(multi, before);
    }

    #[test]
    fn dispatch_reaches_simple() {
        let (mut simple, _, mut ledger) = fund_both();
        let depositor = CallContext::call(Address::from_label("depositor"), Timestamp(11));
        simple.release(&depositor, &mut ledger).unwrap();
        assert_eq!(simple.state(), EscrowState::Released);
        assert!(simple.status(Timestamp(12)).is_terminal);
    }

    #[test]
    fn escrow_serializes() {
        let (simple, multi, _) = fund_both();
        for escrow in [simple, multi] {
            let json = serde_json::to_string(&escrow).unwrap();
            let back: Escrow = serde_json::from_str(&json).unwrap();
            assert_eq!(back, escrow);
        }
    }
}
