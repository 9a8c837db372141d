//! # trustlock-types
//!
//! Shared types, errors, and configuration for the **TrustLock** escrow engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`EscrowId`], [`Timestamp`]
//! - **State model**: [`EscrowState`], [`DisputeState`], [`Vote`], [`Ruling`], [`Role`]
//! - **Terms**: [`EscrowTerms`], [`EscrowKind`]
//! - **Invocation**: [`CallContext`]
//! - **Views**: [`EscrowStatus`], [`MultiPartyStatus`], [`VoteTally`]
//! - **Settlement receipts**: [`Settlement`]
//! - **Configuration**: [`EscrowPolicy`], [`RegistryConfig`]
//! - **Errors**: [`EscrowError`] with `TL_ERR_` prefix codes, [`ErrorKind`]
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod ids;
pub mod settlement;
pub mod state;
pub mod status;
pub mod terms;

// Re-export all primary types at crate root for ergonomic imports:
//   use trustlock_types::{Address, EscrowId, EscrowState, ...};

pub use config::*;
pub use context::*;
pub use error::*;
pub use ids::*;
pub use settlement::*;
pub use state::*;
pub use status::*;
pub use terms::*;

// Constants are accessed via `trustlock_types::constants::FOO`
// (not re-exported to avoid name collisions).
