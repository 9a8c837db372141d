//! Error types for the TrustLock escrow engine.
//!
//! All errors use the `TL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by kind:
//! - 1xx: State errors (wrong FSM state for the operation)
//! - 2xx: Authorization errors
//! - 3xx: Amount errors
//! - 4xx: Timing errors
//! - 5xx: Parameter errors
//! - 6xx: Dispute errors
//! - 7xx: Settlement errors
//! - 8xx: Registry errors
//! - 9xx: General / internal errors
//!
//! Every rejection is surfaced with its specific variant. Callers and
//! auditors rely on [`EscrowError::code`] to tell *why* a call was refused.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Address, EscrowId, EscrowState, Timestamp};

/// Central error enum for all TrustLock operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    // =================================================================
    // State Errors (1xx)
    // =================================================================
    /// `fund` was called on an escrow that is no longer in INIT.
    #[error("TL_ERR_100: Escrow already funded (state {0})")]
    AlreadyFunded(EscrowState),

    /// The operation needs a FUNDED escrow.
    #[error("TL_ERR_101: Escrow not funded (state {0})")]
    NotFunded(EscrowState),

    /// The escrow has already settled, or its consensus already fired.
    #[error("TL_ERR_102: Escrow is in terminal state {0}")]
    TerminalState(EscrowState),

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// Only the depositor may perform this operation.
    #[error("TL_ERR_200: Caller {0} is not the depositor")]
    NotDepositor(Address),

    /// The caller holds no role that permits this operation.
    #[error("TL_ERR_201: Caller {caller} is not authorized to {operation}")]
    Unauthorized {
        caller: Address,
        operation: &'static str,
    },

    // =================================================================
    // Amount Errors (3xx)
    // =================================================================
    /// Escrow amount must be strictly positive.
    #[error("TL_ERR_300: Escrow amount must be greater than zero")]
    ZeroAmount,

    /// Attached value differs from the required deposit.
    #[error("TL_ERR_301: Amount mismatch: expected {expected}, received {received}")]
    AmountMismatch { expected: u64, received: u64 },

    /// Escrow amount exceeds the policy maximum.
    #[error("TL_ERR_302: Amount {amount} exceeds maximum {max}")]
    AmountTooLarge { amount: u64, max: u64 },

    /// Value sent outside `fund` is never accepted.
    #[error("TL_ERR_303: Direct value transfer of {0} rejected")]
    DirectTransferRejected(u64),

    /// Held balance would overflow.
    #[error("TL_ERR_304: Balance overflow")]
    BalanceOverflow,

    // =================================================================
    // Timing Errors (4xx)
    // =================================================================
    /// Release window closed at the deadline.
    #[error("TL_ERR_400: Deadline {deadline} passed (now {now})")]
    DeadlinePassed { deadline: Timestamp, now: Timestamp },

    /// Permissionless refund opens only at the deadline.
    #[error("TL_ERR_401: Timeout not expired: deadline {deadline}, now {now}")]
    TimeoutNotExpired { deadline: Timestamp, now: Timestamp },

    /// Timeout shorter than the policy minimum.
    #[error("TL_ERR_402: Timeout {seconds}s shorter than minimum {min}s")]
    TimeoutTooShort { seconds: u64, min: u64 },

    /// Timeout longer than the policy maximum.
    #[error("TL_ERR_403: Timeout {seconds}s longer than maximum {max}s")]
    TimeoutTooLong { seconds: u64, max: u64 },

    // =================================================================
    // Parameter Errors (5xx)
    // =================================================================
    /// Two roles were given the same address.
    #[error("TL_ERR_500: Parties must be distinct")]
    SameParty,

    /// Any other malformed argument.
    #[error("TL_ERR_501: Invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    // =================================================================
    // Dispute Errors (6xx)
    // =================================================================
    /// Only one outstanding dispute at a time.
    #[error("TL_ERR_600: A dispute is already pending")]
    DisputeAlreadyPending,

    /// Resolution requires a pending dispute.
    #[error("TL_ERR_601: No dispute is pending")]
    DisputeNotPending,

    /// Outcome code other than RELEASE or REFUND.
    #[error("TL_ERR_602: Invalid dispute outcome: {0}")]
    DisputeOutcomeInvalid(String),

    // =================================================================
    // Settlement Errors (7xx)
    // =================================================================
    /// The value transfer collaborator refused the payout.
    #[error("TL_ERR_700: Settlement failed: {reason}")]
    SettlementFailed { reason: String },

    /// Not enough value to cover a transfer or attachment.
    #[error("TL_ERR_701: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u64, available: u64 },

    /// The escrow has already been paid out once.
    #[error("TL_ERR_702: Escrow already settled: {0}")]
    AlreadySettled(EscrowId),

    /// Ledger totals no longer add up.
    #[error("TL_ERR_703: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Registry Errors (8xx)
    // =================================================================
    /// No instance stored under this id.
    #[error("TL_ERR_800: Escrow not found: {0}")]
    EscrowNotFound(EscrowId),

    /// An instance with this id is already stored.
    #[error("TL_ERR_801: Escrow already exists: {0}")]
    DuplicateEscrow(EscrowId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TL_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid policy, missing fields, etc.).
    #[error("TL_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, EscrowError>;

/// Coarse classification of an [`EscrowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    State,
    Authorization,
    Amount,
    Timing,
    Parameter,
    Dispute,
    Settlement,
    Registry,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::State => "StateError",
            Self::Authorization => "AuthorizationError",
            Self::Amount => "AmountError",
            Self::Timing => "TimingError",
            Self::Parameter => "ParameterError",
            Self::Dispute => "DisputeError",
            Self::Settlement => "SettlementError",
            Self::Registry => "RegistryError",
            Self::Internal => "InternalError",
        };
        f.write_str(name)
    }
}

impl EscrowError {
    /// Which family of failure this is.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyFunded(_) | Self::NotFunded(_) | Self::TerminalState(_) => {
                ErrorKind::State
            }
            Self::NotDepositor(_) | Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::ZeroAmount
            | Self::AmountMismatch { .. }
            | Self::AmountTooLarge { .. }
            | Self::DirectTransferRejected(_)
            | Self::BalanceOverflow => ErrorKind::Amount,
            Self::DeadlinePassed { .. }
            | Self::TimeoutNotExpired { .. }
            | Self::TimeoutTooShort { .. }
            | Self::TimeoutTooLong { .. } => ErrorKind::Timing,
            Self::SameParty | Self::InvalidParameters { .. } => ErrorKind::Parameter,
            Self::DisputeAlreadyPending
            | Self::DisputeNotPending
            | Self::DisputeOutcomeInvalid(_) => ErrorKind::Dispute,
            Self::SettlementFailed { .. }
            | Self::InsufficientBalance { .. }
            | Self::AlreadySettled(_)
            | Self::SupplyInvariantViolation { .. } => ErrorKind::Settlement,
            Self::EscrowNotFound(_) | Self::DuplicateEscrow(_) => ErrorKind::Registry,
            Self::Internal(_) | Self::Serialization(_) | Self::Configuration(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Stable symbolic code, independent of the human-readable message.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyFunded(_) => "ALREADY_FUNDED",
            Self::NotFunded(_) => "NOT_FUNDED",
            Self::TerminalState(_) => "TERMINAL_STATE",
            Self::NotDepositor(_) => "NOT_DEPOSITOR",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            Self::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            Self::DirectTransferRejected(_) => "DIRECT_TRANSFER_REJECTED",
            Self::BalanceOverflow => "BALANCE_OVERFLOW",
            Self::DeadlinePassed { .. } => "DEADLINE_PASSED",
            Self::TimeoutNotExpired { .. } => "TIMEOUT_NOT_EXPIRED",
            Self::TimeoutTooShort { .. } => "TIMEOUT_TOO_SHORT",
            Self::TimeoutTooLong { .. } => "TIMEOUT_TOO_LONG",
            Self::SameParty => "SAME_PARTY",
            Self::InvalidParameters { .. } => "INVALID_PARAMETERS",
            Self::DisputeAlreadyPending => "DISPUTE_ALREADY_PENDING",
            Self::DisputeNotPending => "DISPUTE_NOT_PENDING",
            Self::DisputeOutcomeInvalid(_) => "DISPUTE_OUTCOME_INVALID",
            Self::SettlementFailed { .. } => "SETTLEMENT_FAILED",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::AlreadySettled(_) => "ALREADY_SETTLED",
            Self::SupplyInvariantViolation { .. } => "SUPPLY_INVARIANT_VIOLATION",
            Self::EscrowNotFound(_) => "ESCROW_NOT_FOUND",
            Self::DuplicateEscrow(_) => "DUPLICATE_ESCROW",
            Self::Internal(_) => "INTERNAL",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Configuration(_) => "CONFIGURATION",
        }
    }
}

impl From<serde_json::Error> for EscrowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = EscrowError::NotFunded(EscrowState::Init);
        let msg = format!("{err}");
        assert!(msg.starts_with("TL_ERR_101"), "Got: {msg}");
        assert!(msg.contains("INIT"));
    }

    #[test]
    fn amount_mismatch_display() {
        let err = EscrowError::AmountMismatch {
            expected: 1_000_000,
            received: 999_999,
        };
        let msg = format!("{err}");
        assert!(msg.contains("TL_ERR_301"));
        assert!(msg.contains("1000000"));
        assert!(msg.contains("999999"));
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            EscrowError::AlreadyFunded(EscrowState::Funded).kind(),
            ErrorKind::State
        );
        assert_eq!(
            EscrowError::NotDepositor(Address([1; 32])).kind(),
            ErrorKind::Authorization
        );
        assert_eq!(EscrowError::ZeroAmount.kind(), ErrorKind::Amount);
        assert_eq!(
            EscrowError::TimeoutTooShort { seconds: 1, min: 2 }.kind(),
            ErrorKind::Timing
        );
        assert_eq!(EscrowError::SameParty.kind(), ErrorKind::Parameter);
        assert_eq!(EscrowError::DisputeNotPending.kind(), ErrorKind::Dispute);
        assert_eq!(
            EscrowError::AlreadySettled(EscrowId(1)).kind(),
            ErrorKind::Settlement
        );
        assert_eq!(ErrorKind::Timing.to_string(), "TimingError");
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            EscrowError::DeadlinePassed {
                deadline: Timestamp(10),
                now: Timestamp(10),
            }
            .code(),
            "DEADLINE_PASSED"
        );
        assert_eq!(
            EscrowError::Unauthorized {
                caller: Address([0; 32]),
                operation: "vote",
            }
            .code(),
            "UNAUTHORIZED"
        );
    }

    #[test]
    fn all_errors_have_tl_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(EscrowError::ZeroAmount),
            Box::new(EscrowError::DisputeAlreadyPending),
            Box::new(EscrowError::TerminalState(EscrowState::Released)),
            Box::new(EscrowError::Internal("test".into())),
            Box::new(EscrowError::SettlementFailed {
                reason: "x".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("TL_ERR_"),
                "Error missing TL_ERR_ prefix: {msg}"
            );
        }
    }
}
