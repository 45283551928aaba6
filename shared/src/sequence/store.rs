//! Sequence store
//!
//! Authoritative in-memory copy of one ordered collection. Positions are
//! always derived from array order; whatever `position` a caller hands in is
//! overwritten.

use std::collections::HashSet;

use super::engine;
use super::error::UnknownIdError;
use super::types::{ItemId, OrderedCollection, OrderedItem, Sequenced};

/// Immutable copy of a store's contents, used as a rollback point.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<P> {
    collection: OrderedCollection<P>,
}

impl<P> Snapshot<P> {
    pub fn parent_id(&self) -> &ItemId {
        &self.collection.parent_id
    }

    pub fn items(&self) -> &[OrderedItem<P>] {
        &self.collection.items
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.collection.ids()
    }

    pub fn into_items(self) -> Vec<OrderedItem<P>> {
        self.collection.items
    }
}

/// In-memory ordered collection with membership-preserving reorders.
#[derive(Debug, Clone)]
pub struct SequenceStore<P> {
    collection: OrderedCollection<P>,
}

impl<P: Clone> SequenceStore<P> {
    /// Empty store for `parent_id`.
    pub fn new(parent_id: impl Into<ItemId>) -> Self {
        Self {
            collection: OrderedCollection::new(parent_id),
        }
    }

    /// Replace the contents. Array order is authoritative.
    ///
    /// Fails without touching the store if an id appears twice.
    pub fn load(&mut self, items: Vec<OrderedItem<P>>) -> Result<(), UnknownIdError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(UnknownIdError::Duplicate(item.id.clone()));
            }
        }
        let mut items = items;
        engine::renumber(&mut items);
        self.collection.items = items;
        Ok(())
    }

    /// Store holding exactly the contents of `snapshot`.
    pub fn from_snapshot(snapshot: Snapshot<P>) -> Self {
        Self {
            collection: snapshot.collection,
        }
    }

    /// Deep copy of the current state; later mutations do not affect it.
    pub fn snapshot(&self) -> Snapshot<P> {
        Snapshot {
            collection: self.collection.clone(),
        }
    }

    /// Roll back to a snapshot taken from this store.
    pub fn restore(&mut self, snapshot: Snapshot<P>) {
        self.collection.items = snapshot.collection.items;
    }

    /// Rearrange the current members into `ordered_ids`.
    ///
    /// `ordered_ids` must name every current member exactly once. On error
    /// nothing is applied.
    pub fn apply_order(&mut self, ordered_ids: &[ItemId]) -> Result<(), UnknownIdError> {
        let mut seen = HashSet::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            if !self.collection.contains(id) {
                return Err(UnknownIdError::Unknown(id.clone()));
            }
            if !seen.insert(id) {
                return Err(UnknownIdError::Duplicate(id.clone()));
            }
        }
        if let Some(missing) = self
            .collection
            .items
            .iter()
            .find(|item| !seen.contains(&item.id))
        {
            return Err(UnknownIdError::Missing(missing.id.clone()));
        }

        let mut remaining = std::mem::take(&mut self.collection.items);
        let mut next = Vec::with_capacity(remaining.len());
        for id in ordered_ids {
            // membership checked above
            if let Some(index) = remaining.iter().position(|item| &item.id == id) {
                next.push(remaining.swap_remove(index));
            }
        }
        engine::renumber(&mut next);
        self.collection.items = next;
        Ok(())
    }

    /// Add an item at the end.
    pub fn append(&mut self, item: OrderedItem<P>) -> Result<(), UnknownIdError> {
        if self.collection.contains(&item.id) {
            return Err(UnknownIdError::Duplicate(item.id));
        }
        let position = self.collection.items.len();
        self.collection.items.push(OrderedItem { position, ..item });
        Ok(())
    }

    /// Remove an item and close the gap it leaves.
    pub fn remove(&mut self, id: &ItemId) -> Result<OrderedItem<P>, UnknownIdError> {
        let index = self
            .collection
            .index_of(id)
            .ok_or_else(|| UnknownIdError::Unknown(id.clone()))?;
        let removed = self.collection.items.remove(index);
        engine::renumber(&mut self.collection.items);
        Ok(removed)
    }

    pub fn collection(&self) -> &OrderedCollection<P> {
        &self.collection
    }

    pub fn parent_id(&self) -> &ItemId {
        &self.collection.parent_id
    }

    pub fn items(&self) -> &[OrderedItem<P>] {
        &self.collection.items
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.collection.ids()
    }

    pub fn get(&self, id: &ItemId) -> Option<&OrderedItem<P>> {
        self.collection.items.iter().find(|item| &item.id == id)
    }

    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.collection.index_of(id)
    }

    pub fn len(&self) -> usize {
        self.collection.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.items.is_empty()
    }
}

impl<P: Clone + Sequenced> SequenceStore<P> {
    /// Load straight from fetched payloads, in the order the server emitted them.
    pub fn load_payloads(&mut self, payloads: Vec<P>) -> Result<(), UnknownIdError> {
        let items = payloads
            .into_iter()
            .enumerate()
            .map(|(position, payload)| OrderedItem::from_payload(position, payload))
            .collect();
        self.load(items)
    }
}
