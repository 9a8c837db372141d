//! The settlement primitive.
//!
//! Settling an escrow is two steps in a fixed order:
//! 1. Write the terminal state (RELEASED or REFUNDED)
//! 2. Transfer the **full** vault balance to the recipient
//!
//! The state is committed before any value leaves, so nothing observing the
//! transfer can see a FUNDED escrow with an empty vault. If the transfer
//! fails the prior state is restored and the vault is left untouched.

use trustlock_types::{Address, EscrowError, EscrowId, EscrowState, Result, Settlement, Timestamp};

use crate::{ValueTransfer, Vault};

/// Move `state` to `terminal` and pay the vault out to `recipient`.
///
/// # Errors
/// - `TerminalState` if `state` is already terminal
/// - `NotFunded` if `state` cannot reach `terminal` (e.g. still INIT)
/// - `Internal` if `terminal` is not a terminal state
/// - whatever `transfer` returns; in that case nothing has changed
pub fn settle<T: ValueTransfer + ?Sized>(
    escrow: EscrowId,
    vault: &mut Vault,
    state: &mut EscrowState,
    terminal: EscrowState,
    recipient: Address,
    now: Timestamp,
    transfer: &mut T,
) -> Result<Settlement> {
    if !terminal.is_terminal() {
        return Err(EscrowError::Internal(format!(
            "settlement target {terminal} is not terminal"
        )));
    }
    if !state.can_transition_to(terminal) {
        return Err(if state.is_terminal() {
            EscrowError::TerminalState(*state)
        } else {
            EscrowError::NotFunded(*state)
        });
    }

    let prior = *state;
    *state = terminal;

    let amount = vault.balance();
    if let Err(err) = transfer.transfer(escrow, recipient, amount) {
        *state = prior;
        tracing::warn!(
            escrow = %escrow,
            recipient = %recipient,
            amount,
            error = %err,
            "Settlement transfer failed, state restored"
        );
        return Err(err);
    }
    vault.take_all();

    tracing::info!(
        escrow = %escrow,
        outcome = %terminal,
        recipient = %recipient,
        amount,
        "Escrow settled"
    );

    Ok(Settlement {
        escrow,
        outcome: terminal,
        recipient,
        amount,
        settled_at: now,
    })
}
