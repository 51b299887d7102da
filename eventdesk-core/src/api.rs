//! The seam between the controllers and the events backend.
//!
//! The console implements `EventApi` over HTTP; tests use an in-memory fake.
//! Implementations must never let a raw transport failure escape: anything
//! that is not a well-formed envelope becomes `ApiError::Transport`.

use async_trait::async_trait;
use thiserror::Error;

use crate::batch::{BatchRequest, BatchResult};
use crate::envelope::ErrorDetail;
use crate::event::{Event, EventDraft, EventPatch};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The backend answered with a populated `error` field.
    #[error("{}", .0.message())]
    Backend(ErrorDetail),

    /// Network failure, or a response that isn't a readable envelope.
    #[error("Transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait EventApi: Send + Sync {
    /// GET api/get-events/
    async fn list_events(&self) -> Result<Vec<Event>, ApiError>;

    /// POST api/create-event/ (the backend may answer with `data: null`)
    async fn create_event(&self, draft: &EventDraft) -> Result<Option<Event>, ApiError>;

    /// POST api/create-events-batch/
    async fn create_events_batch(&self, batch: &BatchRequest) -> Result<BatchResult, ApiError>;

    /// PUT api/update-event/{event_id}/
    async fn update_event(&self, event_id: &str, patch: &EventPatch) -> Result<Option<Event>, ApiError>;

    /// DELETE api/delete-event/{event_id}/
    async fn delete_event(&self, event_id: &str) -> Result<(), ApiError>;
}
