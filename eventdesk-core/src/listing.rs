//! The event table and its per-row actions.
//!
//! The listing never patches itself: after any mutation it is reloaded from
//! the backend and replaced wholesale.

use std::fmt::Display;

use chrono::TimeZone;
use tracing::{debug, warn};

use crate::api::{ApiError, EventApi};
use crate::event::Event;
use crate::form::EventForm;
use crate::notify::{ActionOutcome, Confirmation, Notification, TRY_AGAIN_MESSAGE};
use crate::timestamp;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this event?";
pub const DELETED_MESSAGE: &str = "Event deleted successfully!";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete the event. Please try again.";

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    /// 1-based position.
    pub index: usize,
    pub event_id: String,
    pub trans_id: String,
    pub client_id: String,
    pub timestamp: String,
    pub rc_num: String,
    pub event_cnt: i64,
    pub location_cd: String,
    pub addr_nbr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshResult {
    Loaded(usize),
    Failed(Notification),
    Discarded,
}

#[derive(Default)]
pub struct EventListing {
    events: Vec<Event>,
    epoch: u64,
}

impl EventListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn find(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.event_id == event_id)
    }

    pub fn rows<Tz>(&self, tz: &Tz) -> Vec<EventRow>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.events
            .iter()
            .enumerate()
            .map(|(i, event)| EventRow {
                index: i + 1,
                event_id: event.event_id.clone(),
                trans_id: event.trans_id.clone(),
                client_id: event.client_id.clone(),
                timestamp: timestamp::display(&event.trans_tms, tz),
                rc_num: event.rc_num.clone(),
                event_cnt: event.event_cnt,
                location_cd: event.location_cd.clone(),
                addr_nbr: event.addr_nbr.clone().unwrap_or_default(),
            })
            .collect()
    }

    /// Start a reload; any earlier reload still in flight becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.epoch = self.epoch.wrapping_add(1);
        RefreshTicket { epoch: self.epoch }
    }

    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Event>, ApiError>,
    ) -> RefreshResult {
        if ticket.epoch != self.epoch {
            debug!("discarding superseded event list");
            return RefreshResult::Discarded;
        }
        match result {
            Ok(events) => {
                let count = events.len();
                self.events = events;
                RefreshResult::Loaded(count)
            }
            Err(ApiError::Backend(detail)) => {
                RefreshResult::Failed(Notification::error(detail.message()))
            }
            Err(ApiError::Transport(reason)) => {
                warn!(%reason, "could not load events");
                RefreshResult::Failed(Notification::error(TRY_AGAIN_MESSAGE))
            }
        }
    }

    pub async fn refresh<A: EventApi + ?Sized>(&mut self, api: &A) -> RefreshResult {
        let ticket = self.begin_refresh();
        let result = api.list_events().await;
        self.finish_refresh(ticket, result)
    }

    /// Reload once if `outcome` asks for it.
    pub async fn apply<A: EventApi + ?Sized>(
        &mut self,
        outcome: &ActionOutcome,
        api: &A,
    ) -> Option<RefreshResult> {
        if outcome.refresh_listing {
            Some(self.refresh(api).await)
        } else {
            None
        }
    }

    /// Edit intent: a form pre-populated from the row.
    pub fn edit<Tz>(&self, event_id: &str, tz: Tz) -> Option<EventForm<Tz>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.find(event_id)
            .map(|event| EventForm::edit(event.clone(), tz))
    }

    /// Delete intent: nothing is sent until the gate is confirmed.
    pub fn request_delete(&self, event_id: &str) -> Option<Confirmation<Event>> {
        self.find(event_id)
            .map(|event| Confirmation::new(event.clone(), DELETE_PROMPT))
    }

    /// Send the delete if `gate` was confirmed; `None` when it was cancelled.
    pub async fn delete<A: EventApi + ?Sized>(
        &self,
        gate: &mut Confirmation<Event>,
        api: &A,
    ) -> Option<ActionOutcome> {
        let event = gate.confirm()?;

        let outcome = match api.delete_event(&event.event_id).await {
            Ok(()) => ActionOutcome::completed(Notification::success(DELETED_MESSAGE)),
            Err(ApiError::Backend(detail)) => {
                ActionOutcome::retained(Notification::error(detail.message()))
            }
            Err(ApiError::Transport(reason)) => {
                warn!(%reason, event_id = %event.event_id, "delete failed");
                ActionOutcome::retained(Notification::error(DELETE_FAILED_MESSAGE))
            }
        };

        // the confirmation closes either way
        Some(ActionOutcome {
            close_dialog: true,
            ..outcome
        })
    }
}
