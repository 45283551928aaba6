//! Reorder session
//!
//! Drives one ordered collection through drag gestures:
//!
//! ```text
//! Idle ──begin_drag──► Dragging ──drop_on──► Committing ──► Settled
//!   ▲                     │                      │
//!   └─────cancel_drag─────┘                      └────────► RolledBack
//! ```
//!
//! A drop plans the new order synchronously, applies it to the store
//! optimistically, publishes it to subscribers and only then calls the
//! gateway with the full order. Saves are not queued: several may be in
//! flight at once, and the order accepted last by the server is the one the
//! store settles on once they have all resolved.
//!
//! A failed save snaps the store back right away when it is the newest
//! move. An older failure that a newer move has already replaced leaves the
//! store alone and resolves as [`ReorderOutcome::Overtaken`].

mod phase;

pub use phase::{GesturePhase, ReorderOutcome};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::sequence::{
    engine, CollectionRef, ItemId, MoveInstruction, OrderedItem, SequenceStore, Sequenced,
    Snapshot,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{ReorderError, SyncError};
use crate::gateway::SyncGateway;

/// One move committed while other saves may still be pending.
struct Commit {
    generation: u64,
    order: Vec<ItemId>,
    accepted: bool,
}

struct SessionState<P> {
    store: SequenceStore<P>,
    /// Item picked up by `begin_drag`
    drag: Option<ItemId>,
    /// Commits since the store was last idle, oldest first. Failed ones are
    /// dropped; the list is cleared once nothing is pending.
    commits: Vec<Commit>,
    /// Order most recently accepted by the server; `Some` while saves are pending
    last_good: Option<Snapshot<P>>,
    next_generation: u64,
    /// Bumped by `refresh`; resolutions from an older epoch are discarded
    epoch: u64,
}

impl<P: Clone> SessionState<P> {
    fn new(store: SequenceStore<P>) -> Self {
        Self {
            store,
            drag: None,
            commits: Vec::new(),
            last_good: None,
            next_generation: 1,
            epoch: 0,
        }
    }

    fn in_flight(&self) -> usize {
        self.commits.iter().filter(|c| !c.accepted).count()
    }

    fn phase(&self) -> GesturePhase {
        match (&self.drag, self.in_flight()) {
            (Some(id), _) => GesturePhase::Dragging(id.clone()),
            (None, 0) => GesturePhase::Idle,
            (None, in_flight) => GesturePhase::Committing { in_flight },
        }
    }
}

struct Inner<P, G> {
    collection: CollectionRef,
    gateway: G,
    state: Mutex<SessionState<P>>,
    updates: watch::Sender<Snapshot<P>>,
    closed: CancellationToken,
}

impl<P: Clone, G> Inner<P, G> {
    fn lock(&self) -> MutexGuard<'_, SessionState<P>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &SessionState<P>) {
        self.updates.send_replace(state.store.snapshot());
    }

    /// Fold one persist result back into the session.
    fn resolve(
        &self,
        epoch: u64,
        generation: u64,
        ordered_ids: &[ItemId],
        result: Result<(), SyncError>,
    ) -> ReorderOutcome {
        let mut state = self.lock();
        let index = match state.commits.iter().position(|c| c.generation == generation) {
            Some(index) if state.epoch == epoch => index,
            _ => {
                debug!(generation, "Save resolved after reload, discarding");
                return ReorderOutcome::Superseded;
            }
        };

        let outcome = match result {
            Ok(()) => {
                state.commits[index].accepted = true;
                if let Some(base) = state.last_good.take() {
                    let mut accepted = SequenceStore::from_snapshot(base.clone());
                    match accepted.apply_order(ordered_ids) {
                        Ok(()) => state.last_good = Some(accepted.snapshot()),
                        Err(e) => {
                            error!(generation, error = %e, "Accepted order does not match collection");
                            state.last_good = Some(base);
                        }
                    }
                }
                info!(generation, collection = %self.collection, "Order saved");
                ReorderOutcome::Settled
            }
            Err(e) => {
                state.commits.remove(index);
                if index < state.commits.len() {
                    warn!(generation, collection = %self.collection, error = %e, "Order save failed after a newer move");
                    ReorderOutcome::Overtaken(e)
                } else {
                    warn!(generation, collection = %self.collection, error = %e, "Order save failed, restoring");
                    // newest surviving order; once nothing is pending the reset below wins
                    let surviving = match state.in_flight() {
                        0 => None,
                        _ => state.commits.last().map(|c| c.order.clone()),
                    };
                    if let Some(order) = surviving {
                        if let Err(err) = state.store.apply_order(&order) {
                            error!(generation, error = %err, "Pending order does not match collection");
                        }
                        self.publish(&state);
                    }
                    ReorderOutcome::RolledBack(e)
                }
            }
        };

        if state.in_flight() == 0 {
            state.commits.clear();
            if let Some(good) = state.last_good.take() {
                state.store.restore(good);
            }
            self.publish(&state);
        }
        outcome
    }
}

/// One collection under drag-and-drop reordering.
///
/// Cheap to clone; clones share the store, the gateway and the close signal.
pub struct ReorderSession<P, G> {
    inner: Arc<Inner<P, G>>,
}

impl<P, G> Clone for ReorderSession<P, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, G> ReorderSession<P, G>
where
    P: Sequenced + Clone + Send + Sync + 'static,
    G: SyncGateway<P> + 'static,
{
    /// Fetch `collection` and start a session on it.
    pub async fn open(gateway: G, collection: CollectionRef) -> Result<Self, ReorderError> {
        let payloads = gateway.fetch_collection(&collection).await?;
        let session = Self::from_payloads(gateway, collection, payloads)?;
        debug!(collection = %session.inner.collection, len = session.len(), "Session opened");
        Ok(session)
    }

    /// Start a session on payloads that were already fetched, in server order.
    pub fn from_payloads(
        gateway: G,
        collection: CollectionRef,
        payloads: Vec<P>,
    ) -> Result<Self, ReorderError> {
        let mut store = SequenceStore::new(collection.parent_id.clone());
        store.load_payloads(payloads)?;
        let (updates, _) = watch::channel(store.snapshot());
        Ok(Self {
            inner: Arc::new(Inner {
                collection,
                gateway,
                state: Mutex::new(SessionState::new(store)),
                updates,
                closed: CancellationToken::new(),
            }),
        })
    }

    /// Discard local state and reload from the server.
    ///
    /// Pending saves are disowned: they still reach the server but their
    /// results report [`ReorderOutcome::Superseded`].
    pub async fn refresh(&self) -> Result<(), ReorderError> {
        self.ensure_open()?;
        let payloads = self.inner.gateway.fetch_collection(&self.inner.collection).await?;

        let mut state = self.inner.lock();
        state.store.load_payloads(payloads)?;
        state.epoch += 1;
        state.commits.clear();
        state.last_good = None;
        state.drag = None;
        self.inner.publish(&state);
        debug!(collection = %self.inner.collection, epoch = state.epoch, "Collection reloaded");
        Ok(())
    }

    /// Pick up an item. The store is not touched until the drop.
    ///
    /// Membership is checked at drop time, so a stale id here surfaces as
    /// [`ReorderOutcome::Ignored`] from [`drop_on`](Self::drop_on).
    pub fn begin_drag(&self, id: impl Into<ItemId>) -> Result<(), ReorderError> {
        self.ensure_open()?;
        let id = id.into();
        debug!(%id, "Drag started");
        self.inner.lock().drag = Some(id);
        Ok(())
    }

    /// Abandon the current drag. Returns whether one was active.
    pub fn cancel_drag(&self) -> bool {
        let cancelled = self.inner.lock().drag.take();
        if let Some(id) = &cancelled {
            debug!(%id, "Drag cancelled");
        }
        cancelled.is_some()
    }

    /// Drop the dragged item on `target_id` and commit the result.
    pub async fn drop_on(
        &self,
        target_id: impl Into<ItemId>,
    ) -> Result<ReorderOutcome, ReorderError> {
        self.ensure_open()?;
        let moved_id = self.inner.lock().drag.take().ok_or(ReorderError::NotDragging)?;
        self.move_item(moved_id, target_id).await
    }

    /// Move `moved_id` to `target_id`'s slot and persist the full order.
    ///
    /// Equivalent to a complete drag gesture; keyboard reordering calls this
    /// directly.
    pub async fn move_item(
        &self,
        moved_id: impl Into<ItemId>,
        target_id: impl Into<ItemId>,
    ) -> Result<ReorderOutcome, ReorderError> {
        self.ensure_open()?;

        let (ordered_ids, epoch, generation) = {
            let mut state = self.inner.lock();
            let instruction =
                match MoveInstruction::within(state.store.collection(), moved_id, target_id) {
                    Ok(instruction) => instruction,
                    Err(e) => {
                        warn!(collection = %self.inner.collection, error = %e, "Ignoring move");
                        return Ok(ReorderOutcome::Ignored(e));
                    }
                };

            let ordered_ids = match engine::plan(state.store.collection(), &instruction) {
                Ok(Some(ids)) => ids,
                Ok(None) => {
                    debug!(id = %instruction.moved_id, "Dropped on itself");
                    return Ok(ReorderOutcome::Unchanged);
                }
                Err(e) => {
                    warn!(collection = %self.inner.collection, error = %e, "Ignoring move");
                    return Ok(ReorderOutcome::Ignored(e));
                }
            };

            let before = state.store.snapshot();
            if let Err(e) = state.store.apply_order(&ordered_ids) {
                error!(collection = %self.inner.collection, error = %e, "Planned order rejected by store");
                return Err(e.into());
            }
            if state.commits.is_empty() {
                state.last_good = Some(before);
            }
            let generation = state.next_generation;
            state.next_generation += 1;
            state.commits.push(Commit {
                generation,
                order: ordered_ids.clone(),
                accepted: false,
            });
            self.inner.publish(&state);

            debug!(
                generation,
                moved = %instruction.moved_id,
                target = %instruction.target_id,
                in_flight = state.in_flight(),
                "Committing order"
            );
            (ordered_ids, state.epoch, generation)
        };

        self.commit(ordered_ids, epoch, generation).await
    }

    /// Run the persist call on its own task so it completes even if this
    /// future is dropped, and fold its result into the session there.
    async fn commit(
        &self,
        ordered_ids: Vec<ItemId>,
        epoch: u64,
        generation: u64,
    ) -> Result<ReorderOutcome, ReorderError> {
        let inner = Arc::clone(&self.inner);
        let ids = ordered_ids.clone();
        let task = tokio::spawn(async move {
            let result = inner.gateway.persist_order(&inner.collection, &ids).await;
            if inner.closed.is_cancelled() {
                debug!(generation, "Save resolved after close, ignoring");
                return ReorderOutcome::Detached;
            }
            inner.resolve(epoch, generation, &ids, result)
        });

        tokio::select! {
            biased;
            _ = self.inner.closed.cancelled() => Ok(ReorderOutcome::Detached),
            joined = task => match joined {
                Ok(outcome) => Ok(outcome),
                Err(e) => {
                    error!(generation, error = %e, "Persist task failed");
                    let failure = SyncError::Transport(format!("persist task failed: {e}"));
                    Ok(self.inner.resolve(epoch, generation, &ordered_ids, Err(failure)))
                }
            },
        }
    }

    /// Add a newly created item at the end. Only allowed while idle.
    pub fn record_created(&self, payload: P) -> Result<(), ReorderError> {
        self.ensure_open()?;
        let mut state = self.inner.lock();
        if !state.phase().is_idle() {
            return Err(ReorderError::Busy);
        }
        let position = state.store.len();
        state.store.append(OrderedItem::from_payload(position, payload))?;
        self.inner.publish(&state);
        Ok(())
    }

    /// Drop a deleted item and compact positions. Only allowed while idle.
    pub fn record_deleted(&self, id: &ItemId) -> Result<P, ReorderError> {
        self.ensure_open()?;
        let mut state = self.inner.lock();
        if !state.phase().is_idle() {
            return Err(ReorderError::Busy);
        }
        let removed = state.store.remove(id)?;
        self.inner.publish(&state);
        Ok(removed.payload)
    }

    /// Detach from the collection. In-flight saves still reach the server
    /// but their results are no longer applied.
    pub fn close(&self) {
        if !self.inner.closed.is_cancelled() {
            debug!(collection = %self.inner.collection, "Session closed");
            self.inner.closed.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.is_cancelled()
    }

    pub fn phase(&self) -> GesturePhase {
        self.inner.lock().phase()
    }

    pub fn collection(&self) -> &CollectionRef {
        &self.inner.collection
    }

    /// Current items, positions included.
    pub fn items(&self) -> Vec<OrderedItem<P>> {
        self.inner.lock().store.items().to_vec()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.inner.lock().store.ids()
    }

    pub fn snapshot(&self) -> Snapshot<P> {
        self.inner.lock().store.snapshot()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty()
    }

    /// Receiver that sees every order the store takes on, optimistic or
    /// restored.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<P>> {
        self.inner.updates.subscribe()
    }

    fn ensure_open(&self) -> Result<(), ReorderError> {
        if self.is_closed() {
            return Err(ReorderError::Closed);
        }
        Ok(())
    }
}

