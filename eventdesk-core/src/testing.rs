//! In-memory `EventApi` used by the controller tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::api::{ApiError, EventApi};
use crate::batch::{BatchRequest, BatchResult};
use crate::envelope::ErrorDetail;
use crate::event::{Event, EventDraft, EventPatch};

#[derive(Default)]
pub struct FakeState {
    pub events: Vec<Event>,

    pub list_calls: usize,
    pub created: Vec<EventDraft>,
    pub batches: Vec<BatchRequest>,
    pub updates: Vec<(String, EventPatch)>,
    pub deletes: Vec<String>,

    pub list_error: Option<ApiError>,
    pub create_error: Option<ApiError>,
    pub batch_response: Option<Result<BatchResult, ApiError>>,
    pub update_error: Option<ApiError>,
    pub delete_error: Option<ApiError>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn with_events(events: Vec<Event>) -> Self {
        FakeApi {
            state: Mutex::new(FakeState {
                events,
                ..Default::default()
            }),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

pub fn sample_event(event_id: &str) -> Event {
    Event {
        event_id: event_id.to_string(),
        trans_id: "0310abf6-d1f5-a1b3-8fb0-36fe934b1f28".into(),
        client_id: "RPS-00001".into(),
        trans_tms: "2024-09-14T10:20:30Z".into(),
        rc_num: "10002".into(),
        event_cnt: 1,
        location_cd: "DESTINATION".into(),
        addr_nbr: Some("0000000001".into()),
        location_id1: None,
        location_id2: None,
    }
}

fn not_found() -> ApiError {
    ApiError::Backend(ErrorDetail::new("not-found", "Event not found"))
}

#[async_trait]
impl EventApi for FakeApi {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let mut state = self.state();
        state.list_calls += 1;
        match &state.list_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.events.clone()),
        }
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Option<Event>, ApiError> {
        let mut state = self.state();
        state.created.push(draft.clone());
        if let Some(error) = &state.create_error {
            return Err(error.clone());
        }
        let event = Event {
            event_id: format!("evt-{}", state.created.len()),
            trans_id: draft.trans_id.clone(),
            client_id: draft.client_id.clone(),
            trans_tms: draft.trans_tms.clone(),
            rc_num: draft.rc_num.clone(),
            event_cnt: draft.event_cnt,
            location_cd: draft.location_cd.clone(),
            addr_nbr: draft.addr_nbr.clone(),
            location_id1: draft.location_id1.clone(),
            location_id2: draft.location_id2.clone(),
        };
        state.events.push(event.clone());
        Ok(Some(event))
    }

    async fn create_events_batch(&self, batch: &BatchRequest) -> Result<BatchResult, ApiError> {
        let mut state = self.state();
        state.batches.push(batch.clone());
        match &state.batch_response {
            Some(response) => response.clone(),
            None => Ok(BatchResult {
                added_count: batch.event_count() as u64,
                failed_count: 0,
            }),
        }
    }

    async fn update_event(&self, event_id: &str, patch: &EventPatch) -> Result<Option<Event>, ApiError> {
        let mut state = self.state();
        state.updates.push((event_id.to_string(), patch.clone()));
        if let Some(error) = &state.update_error {
            return Err(error.clone());
        }
        let event = state
            .events
            .iter_mut()
            .find(|e| e.event_id == event_id)
            .ok_or_else(not_found)?;
        if let Some(rc_num) = &patch.rc_num {
            event.rc_num = rc_num.clone();
        }
        if let Some(trans_id) = &patch.trans_id {
            event.trans_id = trans_id.clone();
        }
        Ok(Some(event.clone()))
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), ApiError> {
        let mut state = self.state();
        state.deletes.push(event_id.to_string());
        if let Some(error) = &state.delete_error {
            return Err(error.clone());
        }
        let before = state.events.len();
        state.events.retain(|e| e.event_id != event_id);
        if state.events.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
