//! # Escrow state machine vocabulary
//!
//! ## Lifecycle
//!
//! ```text
//!   ┌──────┐  fund   ┌────────┐  release / consensus / ruling  ┌──────────┐
//!   │ INIT ├────────▶│ FUNDED ├───────────────────────────────▶│ RELEASED │
//!   └──────┘         └───┬────┘                                └──────────┘
//!                        │ refund / force_refund / consensus / ruling
//!                        ▼
//!                   ┌──────────┐
//!                   │ REFUNDED │
//!                   └──────────┘
//! ```
//!
//! Transitions are **monotonic**. RELEASED and REFUNDED are terminal and
//! incomparable: no edge leads out of either.
//!
//! ## Disputes
//!
//! `NONE → PENDING → RESOLVED`, also monotonic.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EscrowError;

/// Lifecycle state of an escrow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowState {
    /// Created, awaiting the depositor's exact deposit.
    Init,
    /// Deposit held; awaiting release, refund, or timeout.
    Funded,
    /// Paid out to the beneficiary. **Terminal.**
    Released,
    /// Returned to the depositor. **Terminal.**
    Refunded,
}

impl EscrowState {
    /// Can this state transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Init, Self::Funded) | (Self::Funded, Self::Released | Self::Refunded)
        )
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Refunded)
    }

    /// Position in the lattice INIT < FUNDED < {RELEASED, REFUNDED}.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Init => 0,
            Self::Funded => 1,
            Self::Released | Self::Refunded => 2,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Funded => "FUNDED",
            Self::Released => "RELEASED",
            Self::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for EscrowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle of the (multi-party) dispute record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisputeState {
    #[default]
    None,
    Pending,
    Resolved,
}

impl fmt::Display for DisputeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Pending => write!(f, "PENDING"),
            Self::Resolved => write!(f, "RESOLVED"),
        }
    }
}

/// One party's slot in the 2-of-3 vote record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vote {
    #[default]
    Unset,
    Release,
    Refund,
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "UNSET"),
            Self::Release => write!(f, "RELEASE"),
            Self::Refund => write!(f, "REFUND"),
        }
    }
}

impl From<Ruling> for Vote {
    fn from(ruling: Ruling) -> Self {
        match ruling {
            Ruling::Release => Self::Release,
            Ruling::Refund => Self::Refund,
        }
    }
}

/// Final decision on where the held value goes: consensus result or
/// arbiter ruling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ruling {
    /// Pay the beneficiary.
    Release,
    /// Return to the depositor.
    Refund,
}

impl Ruling {
    /// Decode the wire representation (`0` = release, `1` = refund).
    pub fn from_code(code: u8) -> crate::Result<Self> {
        match code {
            0 => Ok(Self::Release),
            1 => Ok(Self::Refund),
            other => Err(EscrowError::DisputeOutcomeInvalid(other.to_string())),
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Release => 0,
            Self::Refund => 1,
        }
    }

    /// The terminal state this ruling settles into.
    #[must_use]
    pub fn terminal_state(self) -> EscrowState {
        match self {
            Self::Release => EscrowState::Released,
            Self::Refund => EscrowState::Refunded,
        }
    }
}

impl FromStr for Ruling {
    type Err = EscrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RELEASE" => Ok(Self::Release),
            "REFUND" => Ok(Self::Refund),
            _ => Err(EscrowError::DisputeOutcomeInvalid(s.to_string())),
        }
    }
}

impl fmt::Display for Ruling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release => write!(f, "RELEASE"),
            Self::Refund => write!(f, "REFUND"),
        }
    }
}

/// Role a caller holds in a particular escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Depositor,
    Beneficiary,
    Arbiter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Depositor => write!(f, "depositor"),
            Self::Beneficiary => write!(f, "beneficiary"),
            Self::Arbiter => write!(f, "arbiter"),
        }
    }
}
