//! Ordered collections and drag-and-drop reordering
//!
//! - [`types`]: ids, items, collections, move instructions, collection kinds
//! - [`store`]: [`SequenceStore`], the in-memory authoritative order
//! - [`engine`]: pure move computation
//! - [`error`]: [`InvalidMoveError`], [`UnknownIdError`]

pub mod engine;
pub mod error;
pub mod store;
pub mod types;

pub use error::{InvalidMoveError, UnknownIdError};
pub use store::{SequenceStore, Snapshot};
pub use types::{
    CollectionKind, CollectionRef, ItemId, MoveInstruction, OrderedCollection, OrderedItem,
    Sequenced,
};
