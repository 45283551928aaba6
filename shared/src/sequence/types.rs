//! Ordered collection types
//!
//! These types are payload-agnostic: a module list, a lesson list and a
//! quiz question list are all `OrderedCollection<P>` with a different `P`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::InvalidMoveError;

/// Stable identifier of an item within its parent collection.
///
/// The backend uses integer keys for some resources and string keys for
/// others, so both are accepted. Serialized untagged so request bodies carry
/// bare JSON numbers / strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(v) => write!(f, "{}", v),
            ItemId::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for ItemId {
    fn from(v: i64) -> Self {
        ItemId::Int(v)
    }
}

impl From<i32> for ItemId {
    fn from(v: i32) -> Self {
        ItemId::Int(i64::from(v))
    }
}

impl From<u32> for ItemId {
    fn from(v: u32) -> Self {
        ItemId::Int(i64::from(v))
    }
}

impl From<&str> for ItemId {
    fn from(v: &str) -> Self {
        ItemId::Text(v.to_string())
    }
}

impl From<String> for ItemId {
    fn from(v: String) -> Self {
        ItemId::Text(v)
    }
}

/// Payloads that know their own identifier.
pub trait Sequenced {
    fn item_id(&self) -> ItemId;
}

/// One entry of an ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedItem<P> {
    pub id: ItemId,
    /// Zero-based rank, dense within the collection at rest
    pub position: usize,
    pub payload: P,
}

impl<P> OrderedItem<P> {
    pub fn new(id: impl Into<ItemId>, position: usize, payload: P) -> Self {
        Self {
            id: id.into(),
            position,
            payload,
        }
    }
}

impl<P: Sequenced> OrderedItem<P> {
    /// Wrap a payload, taking the id from the payload itself.
    pub fn from_payload(position: usize, payload: P) -> Self {
        Self {
            id: payload.item_id(),
            position,
            payload,
        }
    }
}

/// Ordered items belonging to one parent entity.
///
/// `parent_id` is a plain identifier, never a handle on the parent: the
/// collection does not own (or keep alive) the module or quiz it lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedCollection<P> {
    pub parent_id: ItemId,
    pub items: Vec<OrderedItem<P>>,
}

impl<P> OrderedCollection<P> {
    pub fn new(parent_id: impl Into<ItemId>) -> Self {
        Self {
            parent_id: parent_id.into(),
            items: Vec::new(),
        }
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

/// "Move item `moved_id` to the current slot of `target_id`".
///
/// Emitted by the drag-and-drop adapter on drop. `moved_id == target_id` is a
/// legal no-op (dropping an item on itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInstruction {
    pub moved_id: ItemId,
    pub target_id: ItemId,
}

impl MoveInstruction {
    pub fn new(moved_id: impl Into<ItemId>, target_id: impl Into<ItemId>) -> Self {
        Self {
            moved_id: moved_id.into(),
            target_id: target_id.into(),
        }
    }

    /// Build an instruction scoped to one collection.
    ///
    /// Both ids must be members of `collection`; a target taken from another
    /// module (or quiz) is rejected since moves never cross collections.
    pub fn within<P>(
        collection: &OrderedCollection<P>,
        moved_id: impl Into<ItemId>,
        target_id: impl Into<ItemId>,
    ) -> Result<Self, InvalidMoveError> {
        let instruction = Self::new(moved_id, target_id);
        if !collection.contains(&instruction.moved_id) {
            return Err(InvalidMoveError::UnknownItem {
                id: instruction.moved_id,
                parent_id: collection.parent_id.clone(),
            });
        }
        if !collection.contains(&instruction.target_id) {
            return Err(InvalidMoveError::ForeignTarget {
                target_id: instruction.target_id,
                parent_id: collection.parent_id.clone(),
            });
        }
        Ok(instruction)
    }

    pub fn is_noop(&self) -> bool {
        self.moved_id == self.target_id
    }
}

/// The kinds of ordered collections the LMS exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Modules of a course
    CourseModules,
    /// Lessons of a module
    ModuleLessons,
    /// Questions of a quiz
    QuizQuestions,
}

impl CollectionKind {
    /// Resource segment of the parent entity
    pub fn parent_resource(&self) -> &'static str {
        match self {
            Self::CourseModules => "courses",
            Self::ModuleLessons => "modules",
            Self::QuizQuestions => "quizzes",
        }
    }

    /// Resource segment of the children
    pub fn child_resource(&self) -> &'static str {
        match self {
            Self::CourseModules => "modules",
            Self::ModuleLessons => "lessons",
            Self::QuizQuestions => "questions",
        }
    }

    /// Field of the parent detail object holding the ordered children
    pub fn children_field(&self) -> &'static str {
        self.child_resource()
    }

    /// Field name of the id list in a reorder request body
    pub fn id_field(&self) -> &'static str {
        match self {
            Self::CourseModules => "module_ids",
            Self::ModuleLessons => "lesson_ids",
            Self::QuizQuestions => "question_ids",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.parent_resource(), self.child_resource())
    }
}

/// Identifies one collection on the backend: which kind, under which parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionRef {
    pub kind: CollectionKind,
    pub parent_id: ItemId,
}

impl CollectionRef {
    pub fn new(kind: CollectionKind, parent_id: impl Into<ItemId>) -> Self {
        Self {
            kind,
            parent_id: parent_id.into(),
        }
    }

    pub fn course_modules(course_id: impl Into<ItemId>) -> Self {
        Self::new(CollectionKind::CourseModules, course_id)
    }

    pub fn module_lessons(module_id: impl Into<ItemId>) -> Self {
        Self::new(CollectionKind::ModuleLessons, module_id)
    }

    pub fn quiz_questions(quiz_id: impl Into<ItemId>) -> Self {
        Self::new(CollectionKind::QuizQuestions, quiz_id)
    }

    /// `GET` path of the parent detail (e.g. `courses/7`)
    pub fn fetch_path(&self) -> String {
        format!("{}/{}", self.kind.parent_resource(), self.parent_id)
    }

    /// Path of the reorder endpoint (e.g. `modules/3/lessons/reorder`)
    pub fn reorder_path(&self) -> String {
        format!(
            "{}/{}/{}/reorder",
            self.kind.parent_resource(),
            self.parent_id,
            self.kind.child_resource()
        )
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.parent_id)
    }
}
