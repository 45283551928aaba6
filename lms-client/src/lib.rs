//! LMS Client - drag-and-drop reordering against the LMS REST API
//!
//! Keeps an ordered collection (course modules, module lessons, quiz
//! questions) in memory, applies moves optimistically and persists the full
//! new order, rolling back when the server refuses it.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod logger;
pub mod session;

pub use config::{ClientConfig, ReorderMethod};
pub use error::{ClientError, ClientResult, ReorderError, SyncError};
pub use gateway::{RestGateway, SyncGateway};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::{GesturePhase, ReorderOutcome, ReorderSession};

// Re-export shared types for convenience
pub use shared::models::{CourseModule, Lesson, QuizQuestion};
pub use shared::sequence::{CollectionKind, CollectionRef, ItemId, OrderedItem, Snapshot};
