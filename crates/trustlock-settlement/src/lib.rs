//! # trustlock-settlement
//!
//! Moves held value out of an escrow exactly once.
//!
//! ## Pieces
//!
//! - [`Vault`]: the value one escrow instance currently holds
//! - [`ValueTransfer`]: the seam to whatever actually moves value
//! - [`settle`]: the settlement primitive. Writes the terminal state,
//!   then pays out the full vault balance, all-or-nothing
//! - [`Ledger`]: in-memory reference [`ValueTransfer`] with per-address
//!   balances, an escrow-held pool, and supply accounting
//! - [`SettlementLog`]: exactly-once guard keyed by escrow id
//! - [`SupplyConservation`]: `minted - withdrawn == Σ balances + held`

pub mod ledger;
pub mod primitive;
pub mod settlement_log;
pub mod supply_conservation;
pub mod transfer;
pub mod vault;

pub use ledger::Ledger;
pub use primitive::settle;
pub use settlement_log::SettlementLog;
pub use supply_conservation::SupplyConservation;
pub use transfer::ValueTransfer;
pub use vault::Vault;
