//! Shared core of both escrow variants.
//!
//! [`Lifecycle`] owns the immutable terms and the mutable FSM fields
//! (`state`, `funded_at`, `deadline`, vault). Both [`SimpleEscrow`] and
//! [`MultiPartyEscrow`] wrap one and add their own authorization on top.
//!
//! Every method checks all of its guards before touching any field, so a
//! rejected call leaves the instance exactly as it was.
//!
//! [`SimpleEscrow`]: crate::SimpleEscrow
//! [`MultiPartyEscrow`]: crate::MultiPartyEscrow

use serde::{Deserialize, Serialize};
use trustlock_settlement::{settle, ValueTransfer, Vault};
use trustlock_types::{
    Address, CallContext, EscrowError, EscrowId, EscrowKind, EscrowState, EscrowStatus,
    EscrowTerms, Result, Settlement, Timestamp,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    id: EscrowId,
    terms: EscrowTerms,
    state: EscrowState,
    /// Zero until funded.
    funded_at: Timestamp,
    /// `funded_at + timeout_seconds`. Zero until funded.
    deadline: Timestamp,
    vault: Vault,
}

impl Lifecycle {
    /// A fresh instance in INIT. Terms must already be validated.
    #[must_use]
    pub(crate) fn new(id: EscrowId, terms: EscrowTerms) -> Self {
        Self {
            id,
            terms,
            state: EscrowState::Init,
            funded_at: Timestamp::ZERO,
            deadline: Timestamp::ZERO,
            vault: Vault::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> EscrowId {
        self.id
    }

    #[must_use]
    pub fn terms(&self) -> &EscrowTerms {
        &self.terms
    }

    #[must_use]
    pub fn state(&self) -> EscrowState {
        self.state
    }

    #[must_use]
    pub fn funded_at(&self) -> Timestamp {
        self.funded_at
    }

    #[must_use]
    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    #[must_use]
    pub fn balance(&self) -> u64 {
        self.vault.balance()
    }

    #[must_use]
    pub fn is_funded(&self) -> bool {
        self.state == EscrowState::Funded
    }

    /// Funded and `now >= deadline`.
    #[must_use]
    pub fn is_timeout_expired(&self, now: Timestamp) -> bool {
        self.is_funded() && now >= self.deadline
    }

    /// Depositor deposits exactly `amount`; INIT → FUNDED.
    pub(crate) fn fund(&mut self, ctx: &CallContext) -> Result<()> {
        if self.state != EscrowState::Init {
            return Err(EscrowError::AlreadyFunded(self.state));
        }
        self.require_depositor(ctx, "fund")?;
        if ctx.value != self.terms.amount {
            return Err(EscrowError::AmountMismatch {
                expected: self.terms.amount,
                received: ctx.value,
            });
        }

        self.vault.deposit(ctx.value)?;
        self.state = EscrowState::Funded;
        self.funded_at = ctx.now;
        self.deadline = ctx.now.plus_seconds(self.terms.timeout_seconds);

        tracing::info!(
            escrow = %self.id,
            depositor = %ctx.caller,
            amount = ctx.value,
            deadline = %self.deadline,
            "Escrow funded"
        );
        Ok(())
    }

    /// Permissionless refund once the deadline has been reached.
    pub(crate) fn force_refund<T: ValueTransfer + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<Settlement> {
        self.require_funded()?;
        if ctx.now < self.deadline {
            return Err(EscrowError::TimeoutNotExpired {
                deadline: self.deadline,
                now: ctx.now,
            });
        }
        tracing::info!(escrow = %self.id, caller = %ctx.caller, "Timeout recovery triggered");
        self.settle(EscrowState::Refunded, ctx.now, transfer)
    }

    /// Always refuses value sent outside `fund`.
    pub(crate) fn reject_direct_value(&self, ctx: &CallContext) -> Result<()> {
        tracing::warn!(
            escrow = %self.id,
            caller = %ctx.caller,
            value = ctx.value,
            "Direct value transfer rejected"
        );
        Err(EscrowError::DirectTransferRejected(ctx.value))
    }

    pub(crate) fn require_funded(&self) -> Result<()> {
        if self.state == EscrowState::Funded {
            Ok(())
        } else {
            Err(EscrowError::NotFunded(self.state))
        }
    }

    pub(crate) fn require_depositor(
        &self,
        ctx: &CallContext,
        operation: &'static str,
    ) -> Result<()> {
        if ctx.caller == self.terms.depositor {
            Ok(())
        } else {
            tracing::warn!(
                escrow = %self.id,
                caller = %ctx.caller,
                operation,
                "Caller is not the depositor"
            );
            Err(EscrowError::NotDepositor(ctx.caller))
        }
    }

    /// Recipient for a terminal state: beneficiary on release, depositor on refund.
    #[must_use]
    pub fn recipient_for(&self, terminal: EscrowState) -> Address {
        if terminal == EscrowState::Released {
            self.terms.beneficiary
        } else {
            self.terms.depositor
        }
    }

    /// Write `terminal`, then pay the full vault balance to its recipient.
    pub(crate) fn settle<T: ValueTransfer + ?Sized>(
        &mut self,
        terminal: EscrowState,
        now: Timestamp,
        transfer: &mut T,
    ) -> Result<Settlement> {
        let recipient = self.recipient_for(terminal);
        settle(
            self.id,
            &mut self.vault,
            &mut self.state,
            terminal,
            recipient,
            now,
            transfer,
        )
    }

    /// Status fields common to both variants. `can_release`/`can_refund`
    /// describe depositor-driven exits and are filled in by the variant.
    #[must_use]
    pub(crate) fn base_status(&self, kind: EscrowKind, now: Timestamp) -> EscrowStatus {
        let expired = self.is_timeout_expired(now);
        EscrowStatus {
            id: self.id,
            kind,
            state: self.state,
            state_name: self.state.name().to_string(),
            depositor: self.terms.depositor,
            beneficiary: self.terms.beneficiary,
            arbiter: self.terms.arbiter,
            amount: self.terms.amount,
            balance: self.vault.balance(),
            funded_at: self.funded_at,
            deadline: self.deadline,
            is_funded: self.is_funded(),
            is_terminal: self.state.is_terminal(),
            is_timeout_expired: expired,
            can_release: false,
            can_refund: false,
            can_force_refund: expired,
            multi: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustlock_settlement::Ledger;

    fn setup() -> (Lifecycle, Ledger) {
        let terms = EscrowTerms::fixture();
        let mut ledger = Ledger::default();
        ledger.mint(terms.depositor, terms.amount).unwrap();
        ledger.lock(EscrowId(0), terms.depositor, terms.amount).unwrap();
        (Lifecycle::new(EscrowId(0), terms), ledger)
    }

    fn fund_ctx(core: &Lifecycle, now: u64) -> CallContext {
        CallContext::with_value(core.terms().depositor, core.terms().amount, Timestamp(now))
    }

    #[test]
    fn fund_sets_deadline() {
        let (mut core, _) = setup();
        core.fund(&fund_ctx(&core, 1_000)).unwrap();
        assert_eq!(core.state(), EscrowState::Funded);
        assert_eq!(core.funded_at(), Timestamp(1_000));
        assert_eq!(core.deadline(), Timestamp(1_000 + 86_400));
        assert_eq!(core.balance(), 1_000_000);
    }

    #[test]
    fn fund_guard_order() {
        let (mut core, _) = setup();
        let stranger = CallContext::with_value(Address::from_label("x"), 1, Timestamp(1));
        // Wrong caller is reported before the wrong amount.
        assert!(matches!(core.fund(&stranger), Err(EscrowError::NotDepositor(_))));
        core.fund(&fund_ctx(&core, 1)).unwrap();
        // Already funded is reported before the wrong caller.
        assert_eq!(
            core.fund(&stranger),
            Err(EscrowError::AlreadyFunded(EscrowState::Funded))
        );
    }

    #[test]
    fn rejected_fund_changes_nothing() {
        let (mut core, _) = setup();
        let before = core.clone();
        let short = CallContext::with_value(core.terms().depositor, 999_999, Timestamp(1));
        assert_eq!(
            core.fund(&short),
            Err(EscrowError::AmountMismatch {
                expected: 1_000_000,
                received: 999_999
            })
        );
        assert_eq!(core, before);
    }

    #[test]
    fn overpayment_rejected() {
        let (mut core, _) = setup();
        let before = core.clone();
        let over = CallContext::with_value(core.terms().depositor, 1_000_001, Timestamp(1));
        assert_eq!(
            core.fund(&over),
            Err(EscrowError::AmountMismatch {
                expected: 1_000_000,
                received: 1_000_001
            })
        );
        assert_eq!(core, before);
        assert_eq!(core.state(), EscrowState::Init);
        assert_eq!(core.balance(), 0);
    }

    #[test]
    fn settle_pays_recipient_for_outcome() {
        let (mut core, mut ledger) = setup();
        core.fund(&fund_ctx(&core, 0)).unwrap();
        let receipt = core.settle(EscrowState::Refunded, Timestamp(5), &mut ledger).unwrap();
        assert_eq!(receipt.recipient, core.terms().depositor);
        assert_eq!(ledger.balance(&core.terms().depositor), 1_000_000);
        assert_eq!(core.balance(), 0);
    }

    #[test]
    fn timeout_expiry_starts_at_deadline() {
        let (mut core, _) = setup();
        assert!(!core.is_timeout_expired(Timestamp(u64::MAX)));
        core.fund(&fund_ctx(&core, 0)).unwrap();
        assert!(!core.is_timeout_expired(Timestamp(86_399)));
        assert!(core.is_timeout_expired(Timestamp(86_400)));
    }
}
