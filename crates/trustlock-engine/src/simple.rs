//! Simple escrow: depositor-controlled release with timeout recovery.
//!
//! | Operation      | Caller     | Requires                     | Result   |
//! |----------------|------------|------------------------------|----------|
//! | `fund`         | depositor  | INIT, value == amount        | FUNDED   |
//! | `release`      | depositor  | FUNDED, now < deadline       | RELEASED |
//! | `refund`       | depositor  | FUNDED                       | REFUNDED |
//! | `force_refund` | anyone     | FUNDED, now >= deadline      | REFUNDED |
//!
//! At `now == deadline` only `force_refund` is open.

use serde::{Deserialize, Serialize};
use trustlock_settlement::ValueTransfer;
use trustlock_types::{
    CallContext, EscrowError, EscrowId, EscrowKind, EscrowPolicy, EscrowState, EscrowStatus,
    EscrowTerms, Result, Settlement, Timestamp,
};

use crate::lifecycle::Lifecycle;
use crate::validators;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleEscrow {
    core: Lifecycle,
}

impl SimpleEscrow {
    /// Validate `terms` against `policy` and build an instance in INIT.
    ///
    /// # Errors
    /// `InvalidParameters` if `terms` names an arbiter, otherwise the first
    /// failing validator.
    pub fn new(id: EscrowId, terms: EscrowTerms, policy: &EscrowPolicy) -> Result<Self> {
        if terms.arbiter.is_some() {
            return Err(EscrowError::InvalidParameters {
                reason: "simple escrow takes no arbiter".into(),
            });
        }
        validators::validate_terms(&terms, policy)?;
        tracing::info!(
            escrow = %id,
            depositor = %terms.depositor,
            beneficiary = %terms.beneficiary,
            amount = terms.amount,
            timeout_seconds = terms.timeout_seconds,
            "Simple escrow created"
        );
        Ok(Self {
            core: Lifecycle::new(id, terms),
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

    pub fn fund(&mut self, ctx: &CallContext) -> Result<()> {
        self.core.fund(ctx)
    }

    /// Depositor pays the beneficiary before the deadline.
    pub fn release<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<Settlement> {
        self.core.require_funded()?;
        self.core.require_depositor(ctx, "release")?;
        if ctx.now >= self.core.deadline() {
            return Err(EscrowError::DeadlinePassed {
                deadline: self.core.deadline(),
                now: ctx.now,
            });
        }
        self.core.settle(EscrowState::Released, ctx.now, transfer)
    }

    /// Depositor takes the deposit back. Allowed at any time while funded.
    pub fn refund<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<Settlement> {
        self.core.require_funded()?;
        self.core.require_depositor(ctx, "refund")?;
        self.core.settle(EscrowState::Refunded, ctx.now, transfer)
    }

    /// Anyone returns the deposit to the depositor once the deadline is reached.
    pub fn force_refund<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<Settlement> {
        self.core.force_refund(ctx, transfer)
    }

    pub fn reject_direct_value(&self, ctx: &CallContext) -> Result<()> {
        self.core.reject_direct_value(ctx)
    }

    #[must_use]
    pub fn status(&self, now: Timestamp) -> EscrowStatus {
        let mut status = self.core.base_status(EscrowKind::Simple, now);
        status.can_release = self.core.is_funded() && now < self.core.deadline();
        status.can_refund = self.core.is_funded();
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustlock_settlement::Ledger;
    use trustlock_types::Address;

    const T0: u64 = 1_700_000_000;
    const TIMEOUT: u64 = 86_400;

    fn depositor() -> Address {
        Address::from_label("depositor")
    }

    fn beneficiary() -> Address {
        Address::from_label("beneficiary")
    }

    fn funded() -> (SimpleEscrow, Ledger) {
        let mut escrow =
            SimpleEscrow::new(EscrowId(0), EscrowTerms::fixture(), &EscrowPolicy::default())
                .unwrap();
        let mut ledger = Ledger::default();
        ledger.mint(depositor(), 1_000_000).unwrap();
        ledger.lock(EscrowId(0), depositor(), 1_000_000).unwrap();
        escrow
            .fund(&CallContext::with_value(depositor(), 1_000_000, Timestamp(T0)))
            .unwrap();
        (escrow, ledger)
    }

    #[test]
    fn rejects_arbiter() {
        let err = SimpleEscrow::new(
            EscrowId(0),
            EscrowTerms::multi_party_fixture(),
            &EscrowPolicy::default(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMETERS");
    }

    #[test]
    fn release_pays_beneficiary() {
        let (mut escrow, mut ledger) = funded();
        let receipt = escrow
            .release(&CallContext::call(depositor(), Timestamp(T0 + 10)), &mut ledger)
            .unwrap();
        assert_eq!(escrow.state(), EscrowState::Released);
        assert_eq!(receipt.recipient, beneficiary());
        assert_eq!(ledger.balance(&beneficiary()), 1_000_000);
    }

    #[test]
    fn only_depositor_releases() {
        let (mut escrow, mut ledger) = funded();
        let before = escrow.clone();
        let err = escrow
            .release(&CallContext::call(beneficiary(), Timestamp(T0 + 10)), &mut ledger)
            .unwrap_err();
        assert_eq!(err, EscrowError::NotDepositor(beneficiary()));
        assert_eq!(escrow, before);
    }

    #[test]
    fn release_closes_at_deadline() {
        let (mut escrow, mut ledger) = funded();
        let at_deadline = CallContext::call(depositor(), Timestamp(T0 + TIMEOUT));
        assert!(matches!(
            escrow.release(&at_deadline, &mut ledger),
            Err(EscrowError::DeadlinePassed { .. })
        ));
        // Force refund opens at exactly the same instant.
        let anyone = CallContext::call(Address::from_label("anyone"), Timestamp(T0 + TIMEOUT));
        escrow.force_refund(&anyone, &mut ledger).unwrap();
        assert_eq!(escrow.state(), EscrowState::Refunded);
        assert_eq!(ledger.balance(&depositor()), 1_000_000);
    }

    #[test]
    fn force_refund_before_deadline_rejected() {
        let (mut escrow, mut ledger) = funded();
        let early = CallContext::call(depositor(), Timestamp(T0 + TIMEOUT - 1));
        assert_eq!(
            escrow.force_refund(&early, &mut ledger),
            Err(EscrowError::TimeoutNotExpired {
                deadline: Timestamp(T0 + TIMEOUT),
                now: Timestamp(T0 + TIMEOUT - 1),
            })
        );
    }

    #[test]
    fn refund_ignores_deadline() {
        let (mut escrow, mut ledger) = funded();
        escrow
            .refund(&CallContext::call(depositor(), Timestamp(T0 + 10 * TIMEOUT)), &mut ledger)
            .unwrap();
        assert_eq!(escrow.state(), EscrowState::Refunded);
    }

    #[test]
    fn beneficiary_cannot_refund() {
        let (mut escrow, mut ledger) = funded();
        let err = escrow
            .refund(&CallContext::call(beneficiary(), Timestamp(T0)), &mut ledger)
            .unwrap_err();
        assert_eq!(err.code(), "NOT_DEPOSITOR");
    }

    #[test]
    fn terminal_is_permanent() {
        let (mut escrow, mut ledger) = funded();
        escrow
            .refund(&CallContext::call(depositor(), Timestamp(T0)), &mut ledger)
            .unwrap();
        let later = Timestamp(T0 + 2 * TIMEOUT);
        assert_eq!(
            escrow.release(&CallContext::call(depositor(), later), &mut ledger),
            Err(EscrowError::NotFunded(EscrowState::Refunded))
        );
        assert!(escrow.force_refund(&CallContext::call(depositor(), later), &mut ledger).is_err());
        assert_eq!(
            escrow.fund(&CallContext::with_value(depositor(), 1_000_000, later)),
            Err(EscrowError::AlreadyFunded(EscrowState::Refunded))
        );
    }

    #[test]
    fn status_reflects_windows() {
        let (escrow, _) = funded();
        let before = escrow.status(Timestamp(T0 + 1));
        assert!(before.is_funded);
        assert!(before.can_release);
        assert!(before.can_refund);
        assert!(!before.can_force_refund);
        assert!(before.multi.is_none());

        let after = escrow.status(Timestamp(T0 + TIMEOUT));
        assert!(!after.can_release);
        assert!(after.can_refund);
        assert!(after.can_force_refund);
        assert!(after.is_timeout_expired);
        assert_eq!(after.state_name, "FUNDED");
    }

    #[test]
    fn fund_requires_exact_amount() {
        for value in [999_999, 1_000_001] {
            let mut escrow =
                SimpleEscrow::new(EscrowId(0), EscrowTerms::fixture(), &EscrowPolicy::default())
                    .unwrap();
            let mut ledger = Ledger::default();
            ledger.mint(depositor(), 2_000_000).unwrap();
            let before = escrow.clone();

            let ctx = CallContext::with_value(depositor(), value, Timestamp(T0));
            let err = ledger
                .with_attached(EscrowId(0), depositor(), value, || escrow.fund(&ctx))
                .unwrap_err();
            assert_eq!(
                err,
                EscrowError::AmountMismatch {
                    expected: 1_000_000,
                    received: value
                }
            );
            assert_eq!(escrow, before);
            assert_eq!(ledger.balance(&depositor()), 2_000_000);
            assert_eq!(ledger.held(EscrowId(0)), 0);
        }
    }

    #[test]
    fn direct_value_always_rejected() {
        let (escrow, _) = funded();
        let err = escrow
            .reject_direct_value(&CallContext::with_value(depositor(), 5, Timestamp(T0)))
            .unwrap_err();
        assert_eq!(err, EscrowError::DirectTransferRejected(5));
    }
}
