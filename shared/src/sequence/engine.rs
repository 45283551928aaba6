//! Reorder engine
//!
//! Pure functions turning a [`MoveInstruction`] into a new total order.
//! Nothing here touches a store or the network, so a drop can be validated
//! and planned completely before any request is issued.
//!
//! Semantics are the standard array move: the moved item is taken out of its
//! slot and reinserted at the target's index; everything in between shifts by
//! one slot and keeps its relative order.
//!
//! ```
//! use shared::sequence::{engine, MoveInstruction, OrderedCollection, OrderedItem};
//!
//! let mut c = OrderedCollection::new(1);
//! for (i, name) in ["A", "B", "C", "D"].into_iter().enumerate() {
//!     c.items.push(OrderedItem::new(name, i, ()));
//! }
//! let moved = engine::reorder(&c, &MoveInstruction::new("A", "C")).unwrap();
//! let ids: Vec<String> = moved.items.iter().map(|i| i.id.to_string()).collect();
//! assert_eq!(ids, ["B", "C", "A", "D"]);
//! ```

use super::error::InvalidMoveError;
use super::types::{ItemId, MoveInstruction, OrderedCollection, OrderedItem};

/// Resolve `(old_index, new_index)` for an instruction.
pub fn locate<P>(
    collection: &OrderedCollection<P>,
    instruction: &MoveInstruction,
) -> Result<(usize, usize), InvalidMoveError> {
    let old_index = collection.index_of(&instruction.moved_id).ok_or_else(|| {
        InvalidMoveError::UnknownItem {
            id: instruction.moved_id.clone(),
            parent_id: collection.parent_id.clone(),
        }
    })?;
    let new_index = collection.index_of(&instruction.target_id).ok_or_else(|| {
        InvalidMoveError::ForeignTarget {
            target_id: instruction.target_id.clone(),
            parent_id: collection.parent_id.clone(),
        }
    })?;
    Ok((old_index, new_index))
}

/// Array-move primitive. Returns `false` (and leaves `items` alone) when the
/// move is a no-op or an index is out of bounds.
pub fn move_index<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Rewrite every `position` as the item's array index.
pub fn renumber<P>(items: &mut [OrderedItem<P>]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.position = index;
    }
}

/// Apply `instruction` to a copy of `collection`.
///
/// Dropping an item on itself returns an identical copy.
pub fn reorder<P: Clone>(
    collection: &OrderedCollection<P>,
    instruction: &MoveInstruction,
) -> Result<OrderedCollection<P>, InvalidMoveError> {
    let (old_index, new_index) = locate(collection, instruction)?;
    let mut next = collection.clone();
    if old_index == new_index {
        return Ok(next);
    }
    move_index(&mut next.items, old_index, new_index);
    renumber(&mut next.items);
    Ok(next)
}

/// Compute only the resulting id order; `None` for a no-op.
pub fn plan<P>(
    collection: &OrderedCollection<P>,
    instruction: &MoveInstruction,
) -> Result<Option<Vec<ItemId>>, InvalidMoveError> {
    let (old_index, new_index) = locate(collection, instruction)?;
    if old_index == new_index {
        return Ok(None);
    }
    let mut ids = collection.ids();
    move_index(&mut ids, old_index, new_index);
    Ok(Some(ids))
}
