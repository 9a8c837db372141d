//! Escrow factory and party index.
//!
//! The registry is append-only. Creating an escrow validates the terms,
//! assigns the next id, stores the instance in INIT, and adds index
//! entries. Nothing already recorded is ever modified.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use trustlock_engine::Escrow;
use trustlock_types::{
    Address, CallContext, EscrowError, EscrowId, EscrowKind, EscrowPolicy, EscrowStatus,
    EscrowTerms, RegistryConfig, Result, Timestamp,
};

use crate::store::{EscrowStore, MemoryStore};

/// Terms for a new escrow, as supplied to the factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEscrowParams {
    pub depositor: Address,
    pub beneficiary: Address,
    /// Only read by [`EscrowRegistry::create_multi_party`].
    pub arbiter: Option<Address>,
    pub amount: u64,
    pub timeout_seconds: u64,
}

/// Immutable record of one created escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: EscrowId,
    pub kind: EscrowKind,
    pub depositor: Address,
    pub beneficiary: Address,
    pub arbiter: Option<Address>,
    pub amount: u64,
    pub timeout_seconds: u64,
    pub created_by: Address,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total_escrows: u64,
    /// Sum of nominal amounts of every escrow ever created.
    pub total_value_escrowed: u128,
    pub next_escrow_id: EscrowId,
}

/// Everything needed to resume a registry: the creation records plus the
/// instances they describe, both in id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub entries: Vec<RegistryEntry>,
    pub escrows: Vec<Escrow>,
}

pub struct EscrowRegistry<S: EscrowStore = MemoryStore> {
    policy: EscrowPolicy,
    store: S,
    entries: BTreeMap<EscrowId, RegistryEntry>,
    by_depositor: HashMap<Address, Vec<EscrowId>>,
    by_beneficiary: HashMap<Address, Vec<EscrowId>>,
    by_arbiter: HashMap<Address, Vec<EscrowId>>,
    next_id: EscrowId,
    total_value_escrowed: u128,
}

impl EscrowRegistry<MemoryStore> {
    /// Registry over a fresh [`MemoryStore`].
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;
        Self::with_store(config.policy, MemoryStore::new())
    }

    /// Copy out every entry and instance.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            entries: self.entries.values().cloned().collect(),
            escrows: self.store.iter().cloned().collect(),
        }
    }

    /// Resume from a [`snapshot`](Self::snapshot). Indexes and the id
    /// counter are rebuilt, so new escrows continue after the highest
    /// restored id.
    pub fn from_snapshot(config: &RegistryConfig, snapshot: RegistrySnapshot) -> Result<Self> {
        config.validate()?;
        let mut store = MemoryStore::new();
        for escrow in snapshot.escrows {
            store.insert(escrow)?;
        }
        Self::restore(config.policy, store, snapshot.entries)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    pub fn from_json(config: &RegistryConfig, json: &str) -> Result<Self> {
        let snapshot: RegistrySnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(config, snapshot)
    }
}

impl<S: EscrowStore> EscrowRegistry<S> {
    /// Registry over an empty `store`. The policy is assumed valid.
    ///
    /// # Errors
    /// `InvalidParameters` if `store` already holds instances; those carry
    /// no creation records, so use [`restore`](Self::restore) instead.
    pub fn with_store(policy: EscrowPolicy, store: S) -> Result<Self> {
        Self::restore(policy, store, Vec::<RegistryEntry>::new())
    }

    /// Registry over a populated `store` and the entries recorded when its
    /// instances were created.
    ///
    /// Every entry must name a stored instance with identical terms, and
    /// every stored instance must have exactly one entry.
    pub fn restore(
        policy: EscrowPolicy,
        store: S,
        entries: impl IntoIterator<Item = RegistryEntry>,
    ) -> Result<Self> {
        let mut registry = Self {
            policy,
            store,
            entries: BTreeMap::new(),
            by_depositor: HashMap::new(),
            by_beneficiary: HashMap::new(),
            by_arbiter: HashMap::new(),
            next_id: EscrowId(0),
            total_value_escrowed: 0,
        };
        for entry in entries {
            let escrow = registry.escrow(entry.id)?;
            if entry_for(entry.id, escrow, entry.created_by, entry.created_at) != entry {
                return Err(EscrowError::InvalidParameters {
                    reason: format!("entry {} does not match its stored escrow", entry.id),
                });
            }
            if registry.entries.contains_key(&entry.id) {
                return Err(EscrowError::DuplicateEscrow(entry.id));
            }
            if entry.id >= registry.next_id {
                registry.next_id = entry.id.next();
            }
            registry.index(entry);
        }
        if registry.entries.len() != registry.store.len() {
            return Err(EscrowError::InvalidParameters {
                reason: format!(
                    "store holds {} escrows but {} entries were supplied",
                    registry.store.len(),
                    registry.entries.len()
                ),
            });
        }
        if !registry.entries.is_empty() {
            tracing::info!(
                escrows = registry.entries.len(),
                next_id = %registry.next_id,
                "Registry restored"
            );
        }
        Ok(registry)
    }

    #[must_use]
    pub fn policy(&self) -> &EscrowPolicy {
        &self.policy
    }

    /// Create a simple escrow. `params.arbiter` must be `None`.
    pub fn create_simple(
        &mut self,
        ctx: &CallContext,
        params: CreateEscrowParams,
    ) -> Result<EscrowId> {
        if params.arbiter.is_some() {
            return Err(EscrowError::InvalidParameters {
                reason: "simple escrow takes no arbiter".into(),
            });
        }
        let terms = EscrowTerms::simple(
            params.depositor,
            params.beneficiary,
            params.amount,
            params.timeout_seconds,
        );
        self.create(ctx, terms)
    }

    /// Create a 2-of-3 multi-party escrow. `params.arbiter` is required.
    pub fn create_multi_party(
        &mut self,
        ctx: &CallContext,
        params: CreateEscrowParams,
    ) -> Result<EscrowId> {
        let Some(arbiter) = params.arbiter else {
            return Err(EscrowError::InvalidParameters {
                reason: "multi-party escrow requires an arbiter".into(),
            });
        };
        let terms = EscrowTerms::multi_party(
            params.depositor,
            params.beneficiary,
            arbiter,
            params.amount,
            params.timeout_seconds,
        );
        self.create(ctx, terms)
    }

    fn create(&mut self, ctx: &CallContext, terms: EscrowTerms) -> Result<EscrowId> {
        // Creation never carries value; funding is a separate call by the depositor.
        if ctx.value != 0 {
            return Err(EscrowError::AmountMismatch {
                expected: 0,
                received: ctx.value,
            });
        }

        let id = self.next_id;
        let escrow = Escrow::from_terms(id, terms, &self.policy)?;
        let entry = entry_for(id, &escrow, ctx.caller, ctx.now);
        self.store.insert(escrow)?;
        self.next_id = id.next();

        tracing::info!(
            escrow = %id,
            kind = %entry.kind,
            created_by = %ctx.caller,
            amount = entry.amount,
            "Escrow registered"
        );
        self.index(entry);
        Ok(id)
    }

    fn index(&mut self, entry: RegistryEntry) {
        let id = entry.id;
        self.by_depositor.entry(entry.depositor).or_default().push(id);
        self.by_beneficiary.entry(entry.beneficiary).or_default().push(id);
        if let Some(arbiter) = entry.arbiter {
            self.by_arbiter.entry(arbiter).or_default().push(id);
        }
        self.total_value_escrowed += u128::from(entry.amount);
        self.entries.insert(id, entry);
    }

    pub fn entry(&self, id: EscrowId) -> Result<&RegistryEntry> {
        self.entries.get(&id).ok_or(EscrowError::EscrowNotFound(id))
    }

    pub fn escrow(&self, id: EscrowId) -> Result<&Escrow> {
        self.store.get(id).ok_or(EscrowError::EscrowNotFound(id))
    }

    /// Mutable access for the parties' own calls (`fund`, votes, ...).
    pub fn escrow_mut(&mut self, id: EscrowId) -> Result<&mut Escrow> {
        self.store.get_mut(id).ok_or(EscrowError::EscrowNotFound(id))
    }

    pub fn status(&self, id: EscrowId, now: Timestamp) -> Result<EscrowStatus> {
        Ok(self.escrow(id)?.status(now))
    }

    #[must_use]
    pub fn escrows_by_depositor(&self, depositor: &Address) -> &[EscrowId] {
        self.by_depositor.get(depositor).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn escrows_by_beneficiary(&self, beneficiary: &Address) -> &[EscrowId] {
        self.by_beneficiary.get(beneficiary).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn escrows_by_arbiter(&self, arbiter: &Address) -> &[EscrowId] {
        self.by_arbiter.get(arbiter).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total_escrows: self.next_id.0,
            total_value_escrowed: self.total_value_escrowed,
            next_escrow_id: self.next_id,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn entry_for(
    id: EscrowId,
    escrow: &Escrow,
    created_by: Address,
    created_at: Timestamp,
) -> RegistryEntry {
    let terms = escrow.terms();
    RegistryEntry {
        id,
        kind: escrow.kind(),
        depositor: terms.depositor,
        beneficiary: terms.beneficiary,
        arbiter: terms.arbiter,
        amount: terms.amount,
        timeout_seconds: terms.timeout_seconds,
        created_by,
        created_at,
    }
}
