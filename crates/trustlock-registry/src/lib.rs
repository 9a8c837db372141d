//! # trustlock-registry
//!
//! The factory side of TrustLock. [`EscrowRegistry`] validates terms,
//! assigns ids, builds instances in INIT, and indexes them by party. It
//! never holds funds and never calls `fund`, `release`, or `refund`: those
//! are invoked by the parties themselves on the stored instance.
//!
//! Instances live in an [`EscrowStore`]; [`MemoryStore`] is the in-process
//! implementation. [`telemetry`] installs the `tracing` subscriber.

pub mod registry;
pub mod store;
pub mod telemetry;

pub use registry::{
    CreateEscrowParams, EscrowRegistry, RegistryEntry, RegistrySnapshot, RegistryStats,
};
pub use store::{EscrowStore, MemoryStore};
pub use telemetry::{init_tracing, LogFormat};
