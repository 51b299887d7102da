//! Core types for eventdesk.
//!
//! This crate holds everything the console drives but that does no I/O of
//! its own:
//! - `event`, `batch` and `envelope` for the backend's wire shapes
//! - `api` for the `EventApi` seam the HTTP adapter implements
//! - `import`, `form` and `listing` controllers, each an explicit state value
//!   whose async results are tagged with an epoch ticket

pub mod api;
pub mod batch;
pub mod config;
pub mod envelope;
pub mod error;
pub mod event;
pub mod form;
pub mod import;
pub mod listing;
pub mod notify;
pub mod timestamp;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiError, EventApi};
pub use batch::{BatchRequest, BatchResult, EventDetail, TransactionGroup};
pub use envelope::{Envelope, ErrorDetail};
pub use error::{EventDeskError, EventDeskResult};
pub use event::{Event, EventDraft, EventPatch};
pub use notify::{ActionOutcome, Notification, Severity};
