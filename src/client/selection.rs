//! Persisted, ordered set of selected catalog items

use std::sync::Arc;

use super::catalog::ProductId;
use super::storage::{load_or_default, save_json, StateStorage, StorageError, SELECTION_KEY};

pub struct SelectionStore {
    storage: Arc<dyn StateStorage>,
    ids: Vec<ProductId>,
}

impl SelectionStore {
    pub fn restore(storage: Arc<dyn StateStorage>) -> Self {
        let mut ids: Vec<ProductId> = load_or_default(storage.as_ref(), SELECTION_KEY);
        // A hand-edited record may repeat ids; keep first occurrences.
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(*id));
        Self { storage, ids }
    }

    /// Select `id` if absent, deselect it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, id: ProductId) -> Result<bool, StorageError> {
        let mut next = self.ids.clone();
        let selected = if let Some(pos) = next.iter().position(|x| *x == id) {
            next.remove(pos);
            false
        } else {
            next.push(id);
            true
        };
        self.commit(next)?;
        Ok(selected)
    }

    pub fn remove(&mut self, id: ProductId) -> Result<(), StorageError> {
        if !self.contains(id) {
            return Ok(());
        }
        let next = self.ids.iter().copied().filter(|x| *x != id).collect();
        self.commit(next)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Selected ids in selection order
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn commit(&mut self, next: Vec<ProductId>) -> Result<(), StorageError> {
        save_json(self.storage.as_ref(), SELECTION_KEY, &next)?;
        self.ids = next;
        Ok(())
    }
}
