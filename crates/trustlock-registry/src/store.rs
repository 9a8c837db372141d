//! Instance storage.

use std::collections::BTreeMap;

use trustlock_engine::Escrow;
use trustlock_types::{EscrowError, EscrowId, Result};

/// Where escrow instances live between calls, keyed by [`EscrowId`].
pub trait EscrowStore {
    /// Store a new instance. Refuses an id that is already present.
    fn insert(&mut self, escrow: Escrow) -> Result<()>;

    fn get(&self, id: EscrowId) -> Option<&Escrow>;

    fn get_mut(&mut self, id: EscrowId) -> Option<&mut Escrow>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered in-memory store. Serializes to JSON for snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    escrows: BTreeMap<EscrowId, Escrow>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Escrow> {
        self.escrows.values()
    }

    /// Every stored instance as a JSON array, in id order.
    pub fn to_json(&self) -> Result<String> {
        let escrows: Vec<&Escrow> = self.escrows.values().collect();
        Ok(serde_json::to_string(&escrows)?)
    }

    /// Rebuild a store from [`MemoryStore::to_json`] output.
    pub fn from_json(json: &str) -> Result<Self> {
        let escrows: Vec<Escrow> = serde_json::from_str(json)?;
        let mut store = Self::new();
        for escrow in escrows {
            store.insert(escrow)?;
        }
        Ok(store)
    }
}

impl EscrowStore for MemoryStore {
    fn insert(&mut self, escrow: Escrow) -> Result<()> {
        let id = escrow.id();
        if self.escrows.contains_key(&id) {
            return Err(EscrowError::DuplicateEscrow(id));
        }
        self.escrows.insert(id, escrow);
        Ok(())
    }

    fn get(&self, id: EscrowId) -> Option<&Escrow> {
        self.escrows.get(&id)
    }

    fn get_mut(&mut self, id: EscrowId) -> Option<&mut Escrow> {
        self.escrows.get_mut(&id)
    }

    fn len(&self) -> usize {
        self.escrows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustlock_types::{EscrowPolicy, EscrowTerms};

    fn escrow(id: u64) -> Escrow {
        Escrow::from_terms(EscrowId(id), EscrowTerms::fixture(), &EscrowPolicy::default()).unwrap()
    }

    #[test]
    fn insert_and_get() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.insert(escrow(0)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(EscrowId(0)).unwrap().id(), EscrowId(0));
        assert!(store.get(EscrowId(1)).is_none());
        assert!(store.get_mut(EscrowId(0)).is_some());
    }

    #[test]
    fn duplicate_id_refused() {
        let mut store = MemoryStore::new();
        store.insert(escrow(3)).unwrap();
        assert_eq!(
            store.insert(escrow(3)),
            Err(EscrowError::DuplicateEscrow(EscrowId(3)))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn json_snapshot_roundtrip() {
        let mut store = MemoryStore::new();
        store.insert(escrow(0)).unwrap();
        store.insert(escrow(1)).unwrap();
        let json = store.to_json().unwrap();
        let restored = MemoryStore::from_json(&json).unwrap();
        assert_eq!(restored, store);
        let ids: Vec<EscrowId> = restored.iter().map(Escrow::id).collect();
        assert_eq!(ids, vec![EscrowId(0), EscrowId(1)]);
    }
}
