//! Immutable escrow terms, fixed when an instance is created.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, Role};

/// Which variant of the escrow state machine an instance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowKind {
    /// Depositor-controlled release with timeout recovery.
    Simple,
    /// 2-of-3 voting among depositor, beneficiary, and arbiter.
    MultiParty,
}

impl fmt::Display for EscrowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "SIMPLE"),
            Self::MultiParty => write!(f, "MULTI_PARTY"),
        }
    }
}

/// The parties, amount, and timeout of one escrow.
///
/// `arbiter` is `Some` exactly for multi-party escrows. Validation of the
/// terms happens once, at construction, against an
/// [`EscrowPolicy`](crate::EscrowPolicy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowTerms {
    pub depositor: Address,
    pub beneficiary: Address,
    pub arbiter: Option<Address>,
    /// Exact deposit required by `fund`, in base units.
    pub amount: u64,
    /// Seconds between funding and the deadline.
    pub timeout_seconds: u64,
}

impl EscrowTerms {
    #[must_use]
    pub fn simple(
        depositor: Address,
        beneficiary: Address,
        amount: u64,
        timeout_seconds: u64,
    ) -> Self {
        Self {
            depositor,
            beneficiary,
            arbiter: None,
            amount,
            timeout_seconds,
        }
    }

    #[must_use]
    pub fn multi_party(
        depositor: Address,
        beneficiary: Address,
        arbiter: Address,
        amount: u64,
        timeout_seconds: u64,
    ) -> Self {
        Self {
            depositor,
            beneficiary,
            arbiter: Some(arbiter),
            amount,
            timeout_seconds,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EscrowKind {
        if self.arbiter.is_some() {
            EscrowKind::MultiParty
        } else {
            EscrowKind::Simple
        }
    }

    /// Every named party, depositor first.
    #[must_use]
    pub fn parties(&self) -> Vec<Address> {
        let mut parties = vec![self.depositor, self.beneficiary];
        parties.extend(self.arbiter);
        parties
    }

    /// The role `addr` holds in this escrow, if any.
    #[must_use]
    pub fn role_of(&self, addr: &Address) -> Option<Role> {
        if *addr == self.depositor {
            Some(Role::Depositor)
        } else if *addr == self.beneficiary {
            Some(Role::Beneficiary)
        } else if self.arbiter.as_ref() == Some(addr) {
            Some(Role::Arbiter)
        } else {
            None
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl EscrowTerms {
    /// Simple terms between labelled parties, 1_000_000 units, one day.
    #[must_use]
    pub fn fixture() -> Self {
        Self::simple(
            Address::from_label("depositor"),
            Address::from_label("beneficiary"),
            1_000_000,
            86_400,
        )
    }

    /// Multi-party variant of [`EscrowTerms::fixture`].
    #[must_use]
    pub fn multi_party_fixture() -> Self {
        Self::multi_party(
            Address::from_label("depositor"),
            Address::from_label("beneficiary"),
            Address::from_label("arbiter"),
            1_000_000,
            86_400,
        )
    }
}
