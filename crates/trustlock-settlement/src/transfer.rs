//! The value transfer seam.

use trustlock_types::{Address, EscrowId, Result};

/// Moves value held on behalf of an escrow to a recipient.
///
/// Implementations must either move exactly `amount` and return `Ok`, or
/// move nothing and return an error. The engine relies on this to keep
/// settlement all-or-nothing.
pub trait ValueTransfer {
    fn transfer(&mut self, escrow: EscrowId, recipient: Address, amount: u64) -> Result<()>;
}

impl<T: ValueTransfer + ?Sized> ValueTransfer for &mut T {
    fn transfer(&mut self, escrow: EscrowId, recipient: Address, amount: u64) -> Result<()> {
        (**self).transfer(escrow, recipient, amount)
    }
}
