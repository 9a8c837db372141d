//! In-memory reference ledger.
//!
//! Implements [`ValueTransfer`] over plain per-address balances so the
//! engine can be driven end to end without a real value layer. Value
//! attached to a call is *locked* into the escrow-held pool for the
//! duration of the call. If the call is rejected it is *unlocked* back to
//! the caller; if it is accepted it stays held until the escrow settles.
//!
//! Every payout is recorded in a [`SettlementLog`], so a second payout for
//! the same escrow fails with `AlreadySettled` even if the engine asked.

use std::collections::HashMap;

use trustlock_types::{constants, Address, EscrowError, EscrowId, RegistryConfig, Result};

use crate::{SettlementLog, SupplyConservation, ValueTransfer};

pub struct Ledger {
    balances: HashMap<Address, u64>,
    /// Value held on behalf of each escrow.
    held: HashMap<EscrowId, u64>,
    log: SettlementLog,
    supply: SupplyConservation,
}

impl Ledger {
    #[must_use]
    pub fn new(settlement_log_capacity: usize) -> Self {
        Self {
            balances: HashMap::new(),
            held: HashMap::new(),
            log: SettlementLog::new(settlement_log_capacity),
            supply: SupplyConservation::new(),
        }
    }

    /// Ledger sized from registry configuration.
    ///
    /// # Errors
    /// `Configuration` if `config` fails validation.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.settlement_log_capacity))
    }

    /// Create value out of thin air for `owner`. Test and demo funding.
    pub fn mint(&mut self, owner: Address, amount: u64) -> Result<()> {
        let entry = self.balances.entry(owner).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(EscrowError::BalanceOverflow)?;
        self.supply.record_mint(amount);
        Ok(())
    }

    /// Remove value from the system.
    pub fn withdraw(&mut self, owner: Address, amount: u64) -> Result<()> {
        self.debit(owner, amount)?;
        self.supply.record_withdrawal(amount);
        Ok(())
    }

    /// Move `amount` from `from` into the pool held for `escrow`.
    pub fn lock(&mut self, escrow: EscrowId, from: Address, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let held = self.held.get(&escrow).copied().unwrap_or(0);
        let new_held = held.checked_add(amount).ok_or(EscrowError::BalanceOverflow)?;
        self.debit(from, amount)?;
        self.held.insert(escrow, new_held);
        Ok(())
    }

    /// Return `amount` from the pool held for `escrow` to `to`.
    pub fn unlock(&mut self, escrow: EscrowId, to: Address, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        self.release_held(escrow, amount)?;
        self.credit(to, amount)
    }

    /// Lock `value` for `escrow`, run `call`, and unlock it again if the
    /// call is rejected.
    ///
    /// This is how an invoking environment attaches value to an escrow
    /// operation: the operation either keeps all of it or none of it.
    pub fn with_attached<R>(
        &mut self,
        escrow: EscrowId,
        from: Address,
        value: u64,
        call: impl FnOnce() -> Result<R>,
    ) -> Result<R> {
        self.lock(escrow, from, value)?;
        match call() {
            Ok(out) => Ok(out),
            Err(err) => {
                self.unlock(escrow, from, value)?;
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn balance(&self, owner: &Address) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn held(&self, escrow: EscrowId) -> u64 {
        self.held.get(&escrow).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_held(&self) -> u128 {
        self.held.values().map(|v| u128::from(*v)).sum()
    }

    #[must_use]
    pub fn settlement_log(&self) -> &SettlementLog {
        &self.log
    }

    /// Check `minted - withdrawn == Σ balances + held`.
    pub fn verify_supply(&self) -> Result<()> {
        let balances: u128 = self.balances.values().map(|v| u128::from(*v)).sum();
        self.supply.verify(balances + self.total_held())
    }

    fn debit(&mut self, owner: Address, amount: u64) -> Result<()> {
        let available = self.balance(&owner);
        if available < amount {
            return Err(EscrowError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.balances.insert(owner, available - amount);
        Ok(())
    }

    fn credit(&mut self, owner: Address, amount: u64) -> Result<()> {
        let entry = self.balances.entry(owner).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(EscrowError::BalanceOverflow)?;
        Ok(())
    }

    fn release_held(&mut self, escrow: EscrowId, amount: u64) -> Result<()> {
        let available = self.held(escrow);
        if available < amount {
            return Err(EscrowError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if available == amount {
            self.held.remove(&escrow);
        } else {
            self.held.insert(escrow, available - amount);
        }
        Ok(())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(constants::SETTLEMENT_LOG_CAPACITY)
    }
}

impl ValueTransfer for Ledger {
    fn transfer(&mut self, escrow: EscrowId, recipient: Address, amount: u64) -> Result<()> {
        self.log.check(escrow)?;
        let current = self.balance(&recipient);
        if current.checked_add(amount).is_none() {
            return Err(EscrowError::BalanceOverflow);
        }
        self.release_held(escrow, amount)?;
        self.credit(recipient, amount)?;
        self.log.record(escrow)?;
        tracing::debug!(escrow = %escrow, recipient = %recipient, amount, "Ledger payout");
        Ok(())
    }
}
