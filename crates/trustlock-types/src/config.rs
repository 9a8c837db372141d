//! Policy and registry configuration.

use serde::{Deserialize, Serialize};

use crate::{constants, EscrowError};

/// Bounds applied to escrow terms at creation, plus the dispute window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscrowPolicy {
    pub min_timeout_seconds: u64,
    pub max_timeout_seconds: u64,
    /// Largest accepted escrow amount.
    pub max_amount: u64,
    /// Resolution window reported for a raised dispute.
    pub dispute_timeout_seconds: u64,
}

impl Default for EscrowPolicy {
    fn default() -> Self {
        Self {
            min_timeout_seconds: constants::MIN_TIMEOUT_SECONDS,
            max_timeout_seconds: constants::MAX_TIMEOUT_SECONDS,
            max_amount: constants::MAX_AMOUNT,
            dispute_timeout_seconds: constants::DISPUTE_TIMEOUT_SECONDS,
        }
    }
}

impl EscrowPolicy {
    /// Reject internally inconsistent bounds.
    pub fn validate(&self) -> crate::Result<()> {
        if self.min_timeout_seconds == 0 {
            return Err(EscrowError::Configuration(
                "min_timeout_seconds must be at least 1".into(),
            ));
        }
        if self.min_timeout_seconds > self.max_timeout_seconds {
            return Err(EscrowError::Configuration(format!(
                "min_timeout_seconds {} exceeds max_timeout_seconds {}",
                self.min_timeout_seconds, self.max_timeout_seconds
            )));
        }
        if self.max_amount < constants::MIN_AMOUNT {
            return Err(EscrowError::Configuration(
                "max_amount must be at least 1".into(),
            ));
        }
        if self.dispute_timeout_seconds == 0 {
            return Err(EscrowError::Configuration(
                "dispute_timeout_seconds must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON policy. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }
}

/// Configuration for an escrow registry and its reference ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub policy: EscrowPolicy,
    /// Settled escrow ids remembered by the exactly-once guard.
    pub settlement_log_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            policy: EscrowPolicy::default(),
            settlement_log_capacity: constants::SETTLEMENT_LOG_CAPACITY,
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> crate::Result<()> {
        self.policy.validate()?;
        if self.settlement_log_capacity == 0 {
            return Err(EscrowError::Configuration(
                "settlement_log_capacity must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
