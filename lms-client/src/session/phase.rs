//! Gesture phases and commit outcomes

use shared::sequence::{InvalidMoveError, ItemId};

use crate::error::SyncError;

/// Where a session is in the `Idle → Dragging → Committing` cycle.
///
/// Derived from session state rather than stored: a drag in progress wins
/// over pending saves, so a second gesture started during a slow save still
/// reports `Dragging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GesturePhase {
    /// Nothing pending; the store holds the last known-good order
    Idle,
    /// A drag started on this item; the store is untouched until drop
    Dragging(ItemId),
    /// One or more persist calls have not resolved yet
    Committing { in_flight: usize },
}

impl GesturePhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Result of one completed move gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Dropped on itself; nothing changed and nothing was sent
    Unchanged,
    /// Stale or cross-collection instruction; dropped without side effects
    Ignored(InvalidMoveError),
    /// The server accepted the new order
    Settled,
    /// The server refused the new order, or could not be reached.
    ///
    /// The store is back on the order this move was made from, or on the
    /// last accepted order when nothing else is pending.
    RolledBack(SyncError),
    /// The save failed, but a newer move had already replaced this order;
    /// the store keeps the newer one
    Overtaken(SyncError),
    /// The collection was reloaded while the save was in flight; the
    /// resolution was discarded
    Superseded,
    /// The session was closed while the save was in flight
    Detached,
}

impl ReorderOutcome {
    /// Whether the store changed and the server agrees with it.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled)
    }

    pub fn sync_error(&self) -> Option<&SyncError> {
        match self {
            Self::RolledBack(err) | Self::Overtaken(err) => Some(err),
            _ => None,
        }
    }

    /// Notification text for a failed save.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::RolledBack(err) => Some(format!(
                "{} The previous order was restored.",
                err.user_message()
            )),
            Self::Overtaken(err) => Some(format!(
                "{} Your newer order was kept.",
                err.user_message()
            )),
            _ => None,
        }
    }
}
