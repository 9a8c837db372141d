//! The invocation context every engine operation receives.

use serde::{Deserialize, Serialize};

use crate::{Address, Timestamp};

/// Who is calling, how much value they attached, and what time it is.
///
/// The engine never reads a clock or a global sender: all three are passed
/// in by the invoking environment on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
    /// Value attached to the call, in base units.
    pub value: u64,
    pub now: Timestamp,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: Address, value: u64, now: Timestamp) -> Self {
        Self { caller, value, now }
    }

    /// A call with no attached value.
    #[must_use]
    pub fn call(caller: Address, now: Timestamp) -> Self {
        Self::new(caller, 0, now)
    }

    /// A call carrying `value`.
    #[must_use]
    pub fn with_value(caller: Address, value: u64, now: Timestamp) -> Self {
        Self::new(caller, value, now)
    }
}
