//! # trustlock-engine
//!
//! The escrow decision engine: the state machines that decide when held
//! value is released to the beneficiary or returned to the depositor.
//!
//! ## Variants
//!
//! - [`SimpleEscrow`]: depositor-controlled release, depositor refund, and
//!   a permissionless refund once the deadline is reached
//! - [`MultiPartyEscrow`]: 2-of-3 voting among depositor, beneficiary, and
//!   arbiter, with a dispute the arbiter can settle by ruling
//!
//! Both share one [`Lifecycle`] core (`INIT → FUNDED → RELEASED | REFUNDED`)
//! and are wrapped by the closed [`Escrow`] enum.
//!
//! ## Conventions
//!
//! - Every operation takes an explicit [`CallContext`](trustlock_types::CallContext)
//!   (caller, attached value, current time). Nothing reads a clock.
//! - Guards run before any mutation; a rejected call changes nothing.
//! - Terminal transitions write the terminal state first, then move the
//!   full held balance through a [`ValueTransfer`](trustlock_settlement::ValueTransfer).

pub mod dispute;
pub mod escrow;
pub mod lifecycle;
pub mod multiparty;
pub mod simple;
pub mod validators;
pub mod votes;

pub use dispute::DisputeRecord;
pub use escrow::Escrow;
pub use lifecycle::Lifecycle;
pub use multiparty::{MultiPartyEscrow, VoteOutcome};
pub use simple::SimpleEscrow;
pub use votes::VoteBook;
