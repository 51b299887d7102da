//! Bulk import: one file in, one batch request out, one verdict back.
//!
//! The dialog is a single `ImportState` value:
//!
//! ```text
//! Closed -> Idle -> Reading -> Validated -> Submitting -> Closed  (counts > 0)
//!                      |                        |
//!                      v                        v
//!                   Rejected                 Validated           (nothing added)
//! ```
//!
//! Every async step (the file read, the batch request) is issued against an
//! epoch. Opening, closing or picking another file bumps the epoch, and a
//! result presented with an older ticket is dropped without touching state.

use std::fmt::Display;

use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{ApiError, EventApi};
use crate::batch::{BatchError, BatchRequest, BatchResult, parse_batch};
use crate::config::MultiFilePolicy;
use crate::envelope::ErrorDetail;
use crate::notify::{ActionOutcome, Notification, TRY_AGAIN_MESSAGE};

pub const BATCH_FAILED_MESSAGE: &str = "Failed to add events. Please try again.";

/// A file offered to the dialog, before its content is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub content_type: Option<String>,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        FileCandidate {
            name: name.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Extension or MIME says JSON. Advisory only: the parse decides.
    pub fn looks_like_json(&self) -> bool {
        let by_extension = self.name.to_ascii_lowercase().ends_with(".json");
        let by_type = self.content_type.as_deref().is_some_and(|ct| {
            let essence = ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase();
            essence == "application/json" || essence.ends_with("+json")
        });
        by_extension || by_type
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("The import dialog is not open")]
    NotOpen,

    #[error("A batch is already being submitted")]
    Busy,

    #[error("No file selected")]
    NoFile,

    #[error("Please select one file ({0} were given)")]
    MultipleFiles(usize),

    #[error("'{0}' is not a JSON file")]
    NotJson(String),

    #[error("Could not read '{file}': {reason}")]
    Read { file: String, reason: String },

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Nothing to submit: select a valid batch file first")]
    NotValidated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportState {
    Closed,
    /// Open, no file chosen.
    Idle,
    /// A file was accepted and its content is being read.
    Reading { file: String },
    /// The last file was refused; no content is retained.
    Rejected {
        file: Option<String>,
        reason: ImportError,
    },
    Validated { file: String, batch: BatchRequest },
    Submitting { file: String, batch: BatchRequest },
}

/// Whether a late result was applied to the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTicket {
    epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    epoch: u64,
}

/// Backend verdict, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Success { added: u64 },
    PartialFailure { added: u64, failed: u64 },
    /// Nothing was added.
    Failure { failed: u64 },
    /// The backend refused the request outright.
    Rejected(ErrorDetail),
    /// The request never produced a readable envelope.
    Transport,
}

impl ImportOutcome {
    pub fn from_result(result: Result<BatchResult, ApiError>) -> Self {
        match result {
            Ok(BatchResult {
                added_count: 0,
                failed_count,
            }) => ImportOutcome::Failure {
                failed: failed_count,
            },
            Ok(BatchResult {
                added_count,
                failed_count: 0,
            }) => ImportOutcome::Success { added: added_count },
            Ok(BatchResult {
                added_count,
                failed_count,
            }) => ImportOutcome::PartialFailure {
                added: added_count,
                failed: failed_count,
            },
            Err(ApiError::Backend(detail)) => ImportOutcome::Rejected(detail),
            Err(ApiError::Transport(reason)) => {
                warn!(%reason, "batch request failed");
                ImportOutcome::Transport
            }
        }
    }

    pub fn effect(&self) -> ActionOutcome {
        match self {
            ImportOutcome::Success { added } => ActionOutcome::completed(Notification::success(
                format!("{added} {} added successfully!", pluralize("event", *added)),
            )),
            ImportOutcome::PartialFailure { added, failed } => {
                ActionOutcome::completed(Notification::warning(format!(
                    "{added} {} added, {failed} failed.",
                    pluralize("event", *added)
                )))
            }
            ImportOutcome::Failure { .. } => {
                ActionOutcome::retained(Notification::error(BATCH_FAILED_MESSAGE))
            }
            ImportOutcome::Rejected(detail) => {
                ActionOutcome::retained(Notification::error(detail.message()))
            }
            ImportOutcome::Transport => {
                ActionOutcome::retained(Notification::error(TRY_AGAIN_MESSAGE))
            }
        }
    }
}

fn pluralize(word: &str, count: u64) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub outcome: ImportOutcome,
    pub effect: ActionOutcome,
}

pub struct ImportController {
    state: ImportState,
    epoch: u64,
    policy: MultiFilePolicy,
}

impl ImportController {
    pub fn new(policy: MultiFilePolicy) -> Self {
        ImportController {
            state: ImportState::Closed,
            epoch: 0,
            policy,
        }
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ImportState::Closed)
    }

    pub fn open(&mut self) {
        self.bump();
        self.state = ImportState::Idle;
    }

    /// Close the dialog. Anything still in flight becomes stale.
    pub fn close(&mut self) {
        self.bump();
        self.state = ImportState::Closed;
    }

    fn bump(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Accept a drop or picker selection, returning the ticket for its read.
    pub fn accept_files(&mut self, files: Vec<FileCandidate>) -> Result<ReadTicket, ImportError> {
        match self.state {
            ImportState::Closed => return Err(ImportError::NotOpen),
            ImportState::Submitting { .. } => return Err(ImportError::Busy),
            _ => {}
        }

        // Whatever was being read before is abandoned.
        self.bump();

        let count = files.len();
        let file = match (files.into_iter().next(), self.policy) {
            (None, _) => return self.reject(None, ImportError::NoFile),
            (Some(_), MultiFilePolicy::Reject) if count > 1 => {
                return self.reject(None, ImportError::MultipleFiles(count));
            }
            (Some(first), _) => {
                if count > 1 {
                    warn!(kept = %first.name, ignored = count - 1, "multiple files given, keeping the first");
                }
                first
            }
        };

        if !file.looks_like_json() {
            let name = file.name.clone();
            return self.reject(Some(file.name), ImportError::NotJson(name));
        }

        debug!(file = %file.name, "reading batch file");
        self.state = ImportState::Reading { file: file.name };
        Ok(ReadTicket { epoch: self.epoch })
    }

    fn reject<T>(&mut self, file: Option<String>, reason: ImportError) -> Result<T, ImportError> {
        self.state = ImportState::Rejected {
            file,
            reason: reason.clone(),
        };
        Err(reason)
    }

    /// Deliver the content read for `ticket`.
    pub fn finish_read<E: Display>(
        &mut self,
        ticket: ReadTicket,
        content: Result<String, E>,
    ) -> Delivery {
        let file = match &self.state {
            ImportState::Reading { file } if ticket.epoch == self.epoch => file.clone(),
            _ => {
                debug!("discarding stale file read");
                return Delivery::Discarded;
            }
        };

        self.state = match content {
            Err(e) => ImportState::Rejected {
                reason: ImportError::Read {
                    file: file.clone(),
                    reason: e.to_string(),
                },
                file: Some(file),
            },
            Ok(text) => match parse_batch(&text) {
                Ok(batch) => {
                    debug!(file = %file, groups = batch.records.len(), "batch file validated");
                    ImportState::Validated { file, batch }
                }
                Err(e) => {
                    debug!(file = %file, error = ?e, "batch file rejected");
                    ImportState::Rejected {
                        file: Some(file),
                        reason: e.into(),
                    }
                }
            },
        };

        Delivery::Applied
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.state, ImportState::Validated { .. })
    }

    pub fn batch(&self) -> Option<&BatchRequest> {
        match &self.state {
            ImportState::Validated { batch, .. } | ImportState::Submitting { batch, .. } => {
                Some(batch)
            }
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&ImportError> {
        match &self.state {
            ImportState::Rejected { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Move to `Submitting` and hand out the batch to send.
    pub fn begin_submit(&mut self) -> Result<(SubmitTicket, BatchRequest), ImportError> {
        match std::mem::replace(&mut self.state, ImportState::Closed) {
            ImportState::Validated { file, batch } => {
                self.state = ImportState::Submitting {
                    file,
                    batch: batch.clone(),
                };
                Ok((SubmitTicket { epoch: self.epoch }, batch))
            }
            other => {
                self.state = other;
                Err(ImportError::NotValidated)
            }
        }
    }

    /// Reconcile the backend's answer. `None` when the ticket is stale.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<BatchResult, ApiError>,
    ) -> Option<ImportReport> {
        if ticket.epoch != self.epoch {
            warn!("discarding batch response for a closed import dialog");
            return None;
        }
        if !matches!(self.state, ImportState::Submitting { .. }) {
            warn!("batch response arrived outside of a submission");
            return None;
        }
        let ImportState::Submitting { file, batch } =
            std::mem::replace(&mut self.state, ImportState::Closed)
        else {
            return None;
        };

        let outcome = ImportOutcome::from_result(result);
        let effect = outcome.effect();

        if effect.close_dialog {
            self.close();
        } else {
            self.state = ImportState::Validated { file, batch };
        }

        Some(ImportReport { outcome, effect })
    }

    /// `begin_submit`, the request, then `finish_submit`.
    pub async fn submit<A: EventApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> Result<Option<ImportReport>, ImportError> {
        let (ticket, batch) = self.begin_submit()?;
        let result = api.create_events_batch(&batch).await;
        Ok(self.finish_submit(ticket, result))
    }
}
