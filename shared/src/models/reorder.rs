//! Reorder request body
//!
//! The backend names the id list after the resource:
//! `{"module_ids": [...]}`, `{"lesson_ids": [...]}`, `{"question_ids": [...]}`.
//! The whole order is always sent, never a delta.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::sequence::{CollectionKind, ItemId};

/// Full-order replacement request for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderRequest {
    pub kind: CollectionKind,
    pub ordered_ids: Vec<ItemId>,
}

impl ReorderRequest {
    pub fn new(kind: CollectionKind, ordered_ids: Vec<ItemId>) -> Self {
        Self { kind, ordered_ids }
    }

    /// Parse a request body for `kind`. Returns `None` when the expected
    /// field is missing or is not a list of ids.
    pub fn from_value(kind: CollectionKind, body: &Value) -> Option<Self> {
        let ids = body.get(kind.id_field())?.clone();
        let ordered_ids = serde_json::from_value(ids).ok()?;
        Some(Self { kind, ordered_ids })
    }
}

impl Serialize for ReorderRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.kind.id_field(), &self.ordered_ids)?;
        map.end()
    }
}
