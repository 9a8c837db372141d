//! System-wide constants for the TrustLock escrow engine.

/// Minimum escrow timeout: one hour.
pub const MIN_TIMEOUT_SECONDS: u64 = 3_600;

/// Maximum escrow timeout: one year (365 days).
pub const MAX_TIMEOUT_SECONDS: u64 = 365 * 24 * 3_600;

/// Smallest escrow amount accepted (one base unit).
pub const MIN_AMOUNT: u64 = 1;

/// Largest escrow amount accepted by the default policy.
pub const MAX_AMOUNT: u64 = 100_000_000_000_000;

/// How long the arbiter has to resolve a dispute once raised (7 days).
///
/// Informational only: the escrow deadline is what bounds fund lock time.
pub const DISPUTE_TIMEOUT_SECONDS: u64 = 7 * 24 * 3_600;

/// Matching votes required for multi-party consensus (2-of-3).
pub const VOTES_REQUIRED: u8 = 2;

/// Settled escrow ids remembered by the reference ledger's exactly-once guard.
pub const SETTLEMENT_LOG_CAPACITY: usize = 500_000;

/// Domain separator for label-derived addresses.
pub const ADDRESS_LABEL_DOMAIN: &[u8] = b"trustlock:address:v1:";
