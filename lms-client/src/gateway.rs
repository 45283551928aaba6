//! Sync gateway
//!
//! The boundary a reorder session calls to load a collection and to persist
//! a new order. The contract is last-write-wins replacement of the whole
//! order: every persist carries the full id sequence, never a delta, and
//! failures are reported, never retried here.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::ApiResponse;
use shared::models::ReorderRequest;
use shared::sequence::{CollectionRef, ItemId};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::ReorderMethod;
use crate::error::SyncError;
use crate::http::{HttpClient, NetworkHttpClient};

/// Remote persistence of ordered collections.
#[async_trait]
pub trait SyncGateway<P>: Send + Sync {
    /// Fetch the children of `collection` in the order the server emits them.
    async fn fetch_collection(&self, collection: &CollectionRef) -> Result<Vec<P>, SyncError>;

    /// Replace the stored order of `collection` with `ordered_ids`.
    async fn persist_order(
        &self,
        collection: &CollectionRef,
        ordered_ids: &[ItemId],
    ) -> Result<(), SyncError>;
}

/// [`SyncGateway`] over the LMS REST API.
///
/// - `GET {parent}/{id}` returns the parent object with its children array
///   (`modules`, `lessons` or `questions`), either bare or inside the
///   `ApiResponse` envelope.
/// - `POST|PATCH {parent}/{id}/{children}/reorder` with
///   `{"<child>_ids": [...]}`; only the status is inspected.
#[derive(Debug, Clone)]
pub struct RestGateway<H = NetworkHttpClient> {
    http: H,
    reorder_method: ReorderMethod,
}

impl<H: HttpClient> RestGateway<H> {
    pub fn new(http: H, reorder_method: ReorderMethod) -> Self {
        Self {
            http,
            reorder_method,
        }
    }
}

#[async_trait]
impl<P, H> SyncGateway<P> for RestGateway<H>
where
    P: DeserializeOwned + Send + 'static,
    H: HttpClient,
{
    #[instrument(skip_all, fields(collection = %collection))]
    async fn fetch_collection(&self, collection: &CollectionRef) -> Result<Vec<P>, SyncError> {
        let body: Value = self.http.get(&collection.fetch_path()).await?;
        let children = extract_children(collection, body)?;
        debug!(count = children.len(), "Fetched collection");
        Ok(children)
    }

    #[instrument(skip_all, fields(collection = %collection, request_id = tracing::field::Empty))]
    async fn persist_order(
        &self,
        collection: &CollectionRef,
        ordered_ids: &[ItemId],
    ) -> Result<(), SyncError> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let body = ReorderRequest::new(collection.kind, ordered_ids.to_vec());
        self.http
            .send_json(
                self.reorder_method.as_method(),
                &collection.reorder_path(),
                &body,
                Some(&request_id),
            )
            .await?;
        debug!(count = ordered_ids.len(), "Order persisted");
        Ok(())
    }
}

/// Pull the ordered children array out of a parent detail response.
fn extract_children<P: DeserializeOwned>(
    collection: &CollectionRef,
    body: Value,
) -> Result<Vec<P>, SyncError> {
    let field = collection.kind.children_field();

    let parent = if is_envelope(&body, field) {
        let envelope: ApiResponse<Value> = serde_json::from_value(body)
            .map_err(|e| SyncError::InvalidResponse(format!("bad envelope: {e}")))?;
        if !envelope.is_success() {
            return Err(SyncError::Rejected {
                status: 200,
                code: envelope.error_code(),
                message: envelope.message,
            });
        }
        envelope
            .data
            .ok_or_else(|| SyncError::InvalidResponse(format!("{collection}: empty data")))?
    } else {
        body
    };

    let children = match parent {
        Value::Object(mut map) => map
            .remove(field)
            .ok_or_else(|| SyncError::InvalidResponse(format!("{collection}: missing `{field}`")))?,
        // some list endpoints return the children directly
        array @ Value::Array(_) => array,
        _ => {
            return Err(SyncError::InvalidResponse(format!(
                "{collection}: expected an object"
            )));
        }
    };

    serde_json::from_value(children)
        .map_err(|e| SyncError::InvalidResponse(format!("{collection}: {e}")))
}

fn is_envelope(body: &Value, field: &str) -> bool {
    body.get(field).is_none() && body.get("message").is_some()
}
