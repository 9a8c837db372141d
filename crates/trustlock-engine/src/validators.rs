//! Term validators.
//!
//! Pure predicates plus `require_*` wrappers that turn a failed predicate
//! into the specific [`EscrowError`] a caller needs to see. All checks run
//! once, when an instance is created; terms never change afterwards.

use trustlock_types::{constants, Address, EscrowError, EscrowPolicy, EscrowTerms, Result};

/// `MIN_AMOUNT <= amount <= max`.
#[must_use]
pub fn amount_in_bounds(amount: u64, max: u64) -> bool {
    (constants::MIN_AMOUNT..=max).contains(&amount)
}

/// `min <= seconds <= max`.
#[must_use]
pub fn timeout_in_bounds(seconds: u64, min: u64, max: u64) -> bool {
    (min..=max).contains(&seconds)
}

/// No address appears twice.
#[must_use]
pub fn addresses_distinct(addresses: &[Address]) -> bool {
    addresses
        .iter()
        .enumerate()
        .all(|(i, a)| addresses[i + 1..].iter().all(|b| a != b))
}

pub fn require_amount(amount: u64, max: u64) -> Result<()> {
    if amount == 0 {
        return Err(EscrowError::ZeroAmount);
    }
    if !amount_in_bounds(amount, max) {
        return Err(EscrowError::AmountTooLarge { amount, max });
    }
    Ok(())
}

pub fn require_timeout(seconds: u64, min: u64, max: u64) -> Result<()> {
    if seconds < min {
        return Err(EscrowError::TimeoutTooShort { seconds, min });
    }
    if !timeout_in_bounds(seconds, min, max) {
        return Err(EscrowError::TimeoutTooLong { seconds, max });
    }
    Ok(())
}

pub fn require_distinct(addresses: &[Address]) -> Result<()> {
    if addresses_distinct(addresses) {
        Ok(())
    } else {
        Err(EscrowError::SameParty)
    }
}

/// Run every creation check in order: parties, amount, timeout.
///
/// # Errors
/// The first failing check's error.
pub fn validate_terms(terms: &EscrowTerms, policy: &EscrowPolicy) -> Result<()> {
    require_distinct(&terms.parties())?;
    require_amount(terms.amount, policy.max_amount)?;
    require_timeout(
        terms.timeout_seconds,
        policy.min_timeout_seconds,
        policy.max_timeout_seconds,
    )
}
