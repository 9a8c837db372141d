//! Settlement receipts.
//!
//! Every terminal transition produces exactly one [`Settlement`], the
//! audit record of where the held value went.

use serde::{Deserialize, Serialize};

use crate::{Address, EscrowId, EscrowState, Timestamp};

/// Proof that an escrow paid out its full held balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub escrow: EscrowId,
    /// RELEASED or REFUNDED.
    pub outcome: EscrowState,
    pub recipient: Address,
    /// Held balance at settlement time (not necessarily the nominal amount).
    pub amount: u64,
    pub settled_at: Timestamp,
}

impl Settlement {
    #[must_use]
    pub fn is_release(&self) -> bool {
        self.outcome == EscrowState::Released
    }

    /// SHA-256 over the receipt fields, hex encoded. Stable across runs.
    #[must_use]
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.escrow.0.to_be_bytes());
        hasher.update(self.outcome.name().as_bytes());
        hasher.update(self.recipient.as_bytes());
        hasher.update(self.amount.to_be_bytes());
        hasher.update(self.settled_at.seconds().to_be_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_serde_roundtrip() {
        let s = Settlement {
            escrow: EscrowId(3),
            outcome: EscrowState::Released,
            recipient: Address::from_label("beneficiary"),
            amount: 500,
            settled_at: Timestamp(1_000),
        };
        assert!(s.is_release());
        assert_eq!(s.digest().len(), 64);
        assert_eq!(s.digest(), s.clone().digest());
        let refunded = Settlement {
            outcome: EscrowState::Refunded,
            ..s.clone()
        };
        assert_ne!(s.digest(), refunded.digest());
        let json = serde_json::to_string(&s).unwrap();
        let back: Settlement = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
