//! Add/Edit form for a single event.
//!
//! Values are held as the operator typed them (`trans_tms` in local-time
//! form, `event_cnt` as text) and only converted when the request is built.
//! In edit mode only the fields that differ from the original are validated
//! and sent.

use std::fmt::Display;

use chrono::{Local, TimeZone, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{ApiError, EventApi};
use crate::event::{Event, EventDraft, EventPatch};
use crate::notify::{ActionOutcome, Notification, TRY_AGAIN_MESSAGE};
use crate::timestamp::{self, LOCAL_INPUT_FORMAT};
use crate::validation::{
    CLIENT_ID_MESSAGE, EVENT_CNT_NUMBER_MESSAGE, FieldErrors, LOCATION_CD_MESSAGE,
    RC_NUM_MESSAGE, check_event_cnt, check_required, check_trans_id, is_blank,
};

pub const NO_FIELDS_CHANGED_MESSAGE: &str = "No fields changed";
pub const TIMESTAMP_FORMAT_MESSAGE: &str = "Timestamp is required and should look like YYYY-MM-DDTHH:MM.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    TransId,
    ClientId,
    TransTms,
    RcNum,
    EventCnt,
    LocationCd,
    AddrNbr,
    LocationId1,
    LocationId2,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::TransId,
        FormField::ClientId,
        FormField::TransTms,
        FormField::RcNum,
        FormField::EventCnt,
        FormField::LocationCd,
        FormField::AddrNbr,
        FormField::LocationId1,
        FormField::LocationId2,
    ];

    /// Wire name, also the key in `FieldErrors`.
    pub fn name(self) -> &'static str {
        match self {
            FormField::TransId => "trans_id",
            FormField::ClientId => "client_id",
            FormField::TransTms => "trans_tms",
            FormField::RcNum => "rc_num",
            FormField::EventCnt => "event_cnt",
            FormField::LocationCd => "location_cd",
            FormField::AddrNbr => "addr_nbr",
            FormField::LocationId1 => "location_id1",
            FormField::LocationId2 => "location_id2",
        }
    }

    pub fn from_name(name: &str) -> Option<FormField> {
        FormField::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::TransId => "Transaction ID",
            FormField::ClientId => "Client ID",
            FormField::TransTms => "Timestamp",
            FormField::RcNum => "RC Number",
            FormField::EventCnt => "Event Count",
            FormField::LocationCd => "Location Code",
            FormField::AddrNbr => "Address Number",
            FormField::LocationId1 => "Location ID 1",
            FormField::LocationId2 => "Location ID 2",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(
            self,
            FormField::AddrNbr | FormField::LocationId1 | FormField::LocationId2
        )
    }
}

/// Raw form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub trans_id: String,
    pub client_id: String,
    pub trans_tms: String,
    pub rc_num: String,
    pub event_cnt: String,
    pub location_cd: String,
    pub addr_nbr: String,
    pub location_id1: String,
    pub location_id2: String,
}

impl FormValues {
    /// Pre-populate from a stored event, showing `trans_tms` in `tz`.
    pub fn from_event<Tz>(event: &Event, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        FormValues {
            trans_id: event.trans_id.clone(),
            client_id: event.client_id.clone(),
            trans_tms: timestamp::to_local_input(&event.trans_tms, tz)
                .unwrap_or_else(|_| event.trans_tms.clone()),
            rc_num: event.rc_num.clone(),
            event_cnt: event.event_cnt.to_string(),
            location_cd: event.location_cd.clone(),
            addr_nbr: event.addr_nbr.clone().unwrap_or_default(),
            location_id1: event.location_id1.clone().unwrap_or_default(),
            location_id2: event.location_id2.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::TransId => &self.trans_id,
            FormField::ClientId => &self.client_id,
            FormField::TransTms => &self.trans_tms,
            FormField::RcNum => &self.rc_num,
            FormField::EventCnt => &self.event_cnt,
            FormField::LocationCd => &self.location_cd,
            FormField::AddrNbr => &self.addr_nbr,
            FormField::LocationId1 => &self.location_id1,
            FormField::LocationId2 => &self.location_id2,
        }
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::TransId => &mut self.trans_id,
            FormField::ClientId => &mut self.client_id,
            FormField::TransTms => &mut self.trans_tms,
            FormField::RcNum => &mut self.rc_num,
            FormField::EventCnt => &mut self.event_cnt,
            FormField::LocationCd => &mut self.location_cd,
            FormField::AddrNbr => &mut self.addr_nbr,
            FormField::LocationId1 => &mut self.location_id1,
            FormField::LocationId2 => &mut self.location_id2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Add,
    Edit { original: Event, initial: FormValues },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    Closed,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("The form is closed")]
    Closed,

    #[error("The form is already being submitted")]
    Busy,

    #[error("No changes to submit")]
    Untouched,

    #[error("No fields changed")]
    NoFieldsChanged,

    #[error("Please fix the highlighted fields: {0}")]
    Invalid(FieldErrors),
}

/// What the form wants sent.
#[derive(Debug, Clone, PartialEq)]
pub enum FormRequest {
    Create(EventDraft),
    Update { event_id: String, patch: EventPatch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormTicket {
    epoch: u64,
}

pub struct EventForm<Tz: TimeZone = Local> {
    mode: FormMode,
    values: FormValues,
    errors: FieldErrors,
    backend_error: Option<String>,
    touched: bool,
    state: FormState,
    epoch: u64,
    tz: Tz,
}

impl EventForm<Local> {
    pub fn add_local() -> Self {
        EventForm::add(Local)
    }

    pub fn edit_local(event: Event) -> Self {
        EventForm::edit(event, Local)
    }
}

impl<Tz> EventForm<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Blank form; the timestamp defaults to now, the count to 1.
    pub fn add(tz: Tz) -> Self {
        let values = FormValues {
            trans_tms: Utc::now()
                .with_timezone(&tz)
                .format(LOCAL_INPUT_FORMAT)
                .to_string(),
            event_cnt: "1".to_string(),
            ..Default::default()
        };
        Self::with_mode(FormMode::Add, values, tz)
    }

    pub fn edit(event: Event, tz: Tz) -> Self {
        let initial = FormValues::from_event(&event, &tz);
        let values = initial.clone();
        Self::with_mode(
            FormMode::Edit {
                original: event,
                initial,
            },
            values,
            tz,
        )
    }

    fn with_mode(mode: FormMode, values: FormValues, tz: Tz) -> Self {
        EventForm {
            mode,
            values,
            errors: FieldErrors::new(),
            backend_error: None,
            touched: false,
            state: FormState::Editing,
            epoch: 0,
            tz,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_add(&self) -> bool {
        matches!(self.mode, FormMode::Add)
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Last backend refusal, shown above the fields.
    pub fn backend_error(&self) -> Option<&str> {
        self.backend_error.as_deref()
    }

    /// A change event for `field`.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.values.slot(field) = value.into();
        self.touched = true;
    }

    /// Submit stays disabled until at least one change event, even if the
    /// change put a field back to its original value.
    pub fn can_submit(&self) -> bool {
        self.touched && self.state == FormState::Editing
    }

    /// Fields that differ from the original (always empty when adding).
    ///
    /// Values are compared in normalized form, so `01` over a count of `1`
    /// or an upper-cased copy of the same UUID is not a change.
    pub fn changed_fields(&self) -> Vec<FormField> {
        match &self.mode {
            FormMode::Add => Vec::new(),
            FormMode::Edit { initial, .. } => FormField::ALL
                .into_iter()
                .filter(|field| {
                    self.normalized(*field, self.values.get(*field))
                        != self.normalized(*field, initial.get(*field))
                })
                .collect(),
        }
    }

    fn normalized(&self, field: FormField, value: &str) -> String {
        let value = value.trim();
        match field {
            FormField::TransId => value.to_ascii_lowercase(),
            FormField::EventCnt => {
                parse_count(value).map_or_else(|| value.to_string(), |count| count.to_string())
            }
            FormField::TransTms => timestamp::from_local_input(value, &self.tz)
                .unwrap_or_else(|_| value.to_string()),
            _ => value.to_string(),
        }
    }

    pub fn close(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.state = FormState::Closed;
    }

    /// Field errors for the current values without submitting.
    pub fn validate(&self) -> FieldErrors {
        let fields = match self.mode {
            FormMode::Add => FormField::ALL.to_vec(),
            FormMode::Edit { .. } => self.changed_fields(),
        };

        let mut errors = FieldErrors::new();
        for field in fields {
            let value = self.values.get(field);
            match field {
                FormField::TransId => check_trans_id(value, &mut errors),
                FormField::ClientId => {
                    check_required("client_id", value, CLIENT_ID_MESSAGE, &mut errors)
                }
                FormField::TransTms => {
                    if is_blank(value) || timestamp::from_local_input(value, &self.tz).is_err() {
                        errors.insert("trans_tms", TIMESTAMP_FORMAT_MESSAGE);
                    }
                }
                FormField::RcNum => check_required("rc_num", value, RC_NUM_MESSAGE, &mut errors),
                FormField::EventCnt => match parse_count(value) {
                    Some(count) => check_event_cnt(count, &mut errors),
                    None if is_blank(value) => check_event_cnt(0, &mut errors),
                    None => errors.insert("event_cnt", EVENT_CNT_NUMBER_MESSAGE),
                },
                FormField::LocationCd => {
                    check_required("location_cd", value, LOCATION_CD_MESSAGE, &mut errors)
                }
                FormField::AddrNbr | FormField::LocationId1 | FormField::LocationId2 => {}
            }
        }
        errors
    }

    /// Check the form and hand out the request to send.
    pub fn begin_submit(&mut self) -> Result<(FormTicket, FormRequest), FormError> {
        match self.state {
            FormState::Closed => return Err(FormError::Closed),
            FormState::Submitting => return Err(FormError::Busy),
            FormState::Editing => {}
        }

        match self.mode {
            FormMode::Add if !self.touched => return Err(FormError::Untouched),
            FormMode::Edit { .. } if self.changed_fields().is_empty() => {
                self.errors = FieldErrors::new();
                self.errors.insert("form", NO_FIELDS_CHANGED_MESSAGE);
                return Err(FormError::NoFieldsChanged);
            }
            _ => {}
        }

        self.errors = self.validate();
        if !self.errors.is_empty() {
            debug!(errors = %self.errors, "event form has invalid fields");
            return Err(FormError::Invalid(self.errors.clone()));
        }

        let request = self.build_request()?;
        self.backend_error = None;
        self.state = FormState::Submitting;
        Ok((FormTicket { epoch: self.epoch }, request))
    }

    fn native_timestamp(&self) -> Result<String, FormError> {
        timestamp::from_local_input(&self.values.trans_tms, &self.tz).map_err(|_| {
            let mut errors = FieldErrors::new();
            errors.insert("trans_tms", TIMESTAMP_FORMAT_MESSAGE);
            FormError::Invalid(errors)
        })
    }

    fn build_request(&self) -> Result<FormRequest, FormError> {
        let values = &self.values;
        match &self.mode {
            FormMode::Add => Ok(FormRequest::Create(EventDraft {
                trans_id: values.trans_id.trim().to_string(),
                client_id: values.client_id.trim().to_string(),
                trans_tms: self.native_timestamp()?,
                rc_num: values.rc_num.trim().to_string(),
                event_cnt: parse_count(&values.event_cnt).unwrap_or(0),
                location_cd: values.location_cd.trim().to_string(),
                addr_nbr: optional(&values.addr_nbr),
                location_id1: optional(&values.location_id1),
                location_id2: optional(&values.location_id2),
            })),
            FormMode::Edit { original, .. } => {
                let mut patch = EventPatch::default();
                for field in self.changed_fields() {
                    let value = values.get(field).trim();
                    match field {
                        FormField::TransId => patch.trans_id = Some(value.to_string()),
                        FormField::ClientId => patch.client_id = Some(value.to_string()),
                        FormField::TransTms => patch.trans_tms = Some(self.native_timestamp()?),
                        FormField::RcNum => patch.rc_num = Some(value.to_string()),
                        FormField::EventCnt => patch.event_cnt = parse_count(value),
                        FormField::LocationCd => patch.location_cd = Some(value.to_string()),
                        FormField::AddrNbr => patch.addr_nbr = Some(optional(value)),
                        FormField::LocationId1 => patch.location_id1 = Some(optional(value)),
                        FormField::LocationId2 => patch.location_id2 = Some(optional(value)),
                    }
                }
                Ok(FormRequest::Update {
                    event_id: original.event_id.clone(),
                    patch,
                })
            }
        }
    }

    /// Apply the backend's answer. `None` when the ticket is stale.
    pub fn finish_submit(
        &mut self,
        ticket: FormTicket,
        result: Result<Option<Event>, ApiError>,
    ) -> Option<ActionOutcome> {
        if ticket.epoch != self.epoch || self.state != FormState::Submitting {
            warn!("discarding event form response for a closed form");
            return None;
        }

        let outcome = match result {
            Ok(_) => {
                self.close();
                let message = if self.is_add() {
                    "Event added successfully!"
                } else {
                    "Event updated successfully!"
                };
                ActionOutcome::completed(Notification::success(message))
            }
            Err(ApiError::Backend(detail)) => {
                let message = detail.message();
                self.backend_error = Some(message.clone());
                self.state = FormState::Editing;
                ActionOutcome::retained(Notification::error(message))
            }
            Err(ApiError::Transport(reason)) => {
                warn!(%reason, "event form request failed");
                self.state = FormState::Editing;
                ActionOutcome::retained(Notification::error(TRY_AGAIN_MESSAGE))
            }
        };

        Some(outcome)
    }

    /// `begin_submit`, the request, then `finish_submit`.
    pub async fn submit<A: EventApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> Result<Option<ActionOutcome>, FormError> {
        let (ticket, request) = self.begin_submit()?;
        let result = match &request {
            FormRequest::Create(draft) => api.create_event(draft).await,
            FormRequest::Update { event_id, patch } => api.update_event(event_id, patch).await,
        };
        Ok(self.finish_submit(ticket, result))
    }
}

/// `None` unless the text is a whole number that fits an `i64`.
fn parse_count(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ErrorDetail;
    use crate::notify::Severity;
    use crate::testing::{FakeApi, sample_event};
    use crate::validation::{EVENT_CNT_MESSAGE, EVENT_CNT_NUMBER_MESSAGE, TRANS_ID_MESSAGE};

    const VALID_UUID: &str = "0310abf6-d1f5-a1b3-8fb0-36fe934b1f28";

    fn filled_add_form() -> EventForm<Utc> {
        let mut form = EventForm::add(Utc);
        form.set(FormField::TransId, VALID_UUID);
        form.set(FormField::ClientId, "RPS-00002");
        form.set(FormField::TransTms, "2024-09-14T10:20");
        form.set(FormField::RcNum, "10003");
        form.set(FormField::LocationCd, "OUTLET ID");
        form
    }

    #[test]
    fn fields_are_found_by_wire_name() {
        assert_eq!(FormField::from_name("location_id2"), Some(FormField::LocationId2));
        assert_eq!(FormField::from_name("form"), None);
    }

    #[test]
    fn add_form_starts_with_defaults_and_disabled_submit() {
        let form = EventForm::add(Utc);
        assert_eq!(form.values().event_cnt, "1");
        assert!(!form.values().trans_tms.is_empty());
        assert!(!form.can_submit());
    }

    #[tokio::test]
    async fn untouched_add_form_is_refused() {
        let api = FakeApi::default();
        let mut form = EventForm::add(Utc);
        assert_eq!(form.submit(&api).await, Err(FormError::Untouched));
        assert!(api.state().created.is_empty());
    }

    #[tokio::test]
    async fn valid_add_form_creates_and_closes() {
        let api = FakeApi::default();
        let mut form = filled_add_form();
        assert!(form.can_submit());

        let outcome = form.submit(&api).await.unwrap().unwrap();
        assert_eq!(outcome.notification.severity, Severity::Success);
        assert!(outcome.close_dialog && outcome.refresh_listing);
        assert_eq!(form.state(), FormState::Closed);

        let created = &api.state().created;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].trans_tms, "2024-09-14T10:20:00+00:00");
        assert_eq!(created[0].event_cnt, 1);
        assert_eq!(created[0].addr_nbr, None);
    }

    #[tokio::test]
    async fn add_form_rejects_bad_trans_id_and_count() {
        let api = FakeApi::default();
        let mut form = filled_add_form();
        form.set(FormField::TransId, "not-a-uuid");
        form.set(FormField::EventCnt, "0");

        match form.submit(&api).await {
            Err(FormError::Invalid(errors)) => {
                assert_eq!(errors.get("trans_id"), Some(TRANS_ID_MESSAGE));
                assert_eq!(errors.get("event_cnt"), Some(EVENT_CNT_MESSAGE));
            }
            other => panic!("expected invalid form, got {other:?}"),
        }
        assert!(form.errors().get("trans_id").is_some());
        assert!(api.state().created.is_empty());
        assert!(form.can_submit());
    }

    #[test]
    fn count_that_is_not_a_whole_number_has_its_own_message() {
        let mut form = filled_add_form();
        for text in ["zero", "1.5", "99999999999999999999"] {
            form.set(FormField::EventCnt, text);
            assert_eq!(form.validate().get("event_cnt"), Some(EVENT_CNT_NUMBER_MESSAGE));
        }

        form.set(FormField::EventCnt, " ");
        assert_eq!(form.validate().get("event_cnt"), Some(EVENT_CNT_MESSAGE));
        form.set(FormField::EventCnt, "-2");
        assert_eq!(form.validate().get("event_cnt"), Some(EVENT_CNT_MESSAGE));
    }

    #[test]
    fn add_form_rejects_unparseable_timestamp() {
        let mut form = filled_add_form();
        form.set(FormField::TransTms, "next tuesday");
        assert_eq!(form.validate().get("trans_tms"), Some(TIMESTAMP_FORMAT_MESSAGE));
    }

    #[test]
    fn edit_form_is_prefilled_in_local_form() {
        let form = EventForm::edit(sample_event("evt-1"), Utc);
        assert_eq!(form.values().trans_tms, "2024-09-14T10:20");
        assert_eq!(form.values().event_cnt, "1");
        assert_eq!(form.values().addr_nbr, "0000000001");
        assert!(form.changed_fields().is_empty());
    }

    #[tokio::test]
    async fn edit_with_no_changes_issues_no_put() {
        let api = FakeApi::with_events(vec![sample_event("evt-1")]);

        let mut untouched = EventForm::edit(sample_event("evt-1"), Utc);
        assert_eq!(untouched.submit(&api).await, Err(FormError::NoFieldsChanged));

        let mut retyped = EventForm::edit(sample_event("evt-1"), Utc);
        retyped.set(FormField::RcNum, "10002");
        assert!(retyped.can_submit());
        assert_eq!(retyped.submit(&api).await, Err(FormError::NoFieldsChanged));
        assert_eq!(retyped.errors().get("form"), Some(NO_FIELDS_CHANGED_MESSAGE));

        assert!(api.state().updates.is_empty());
    }

    #[tokio::test]
    async fn equivalent_spellings_are_not_changes() {
        let api = FakeApi::with_events(vec![sample_event("evt-1")]);
        let mut form = EventForm::edit(sample_event("evt-1"), Utc);
        form.set(FormField::EventCnt, "01");
        form.set(FormField::TransId, "0310ABF6-D1F5-A1B3-8FB0-36FE934B1F28");
        form.set(FormField::TransTms, "2024-09-14T10:20:00");
        form.set(FormField::ClientId, " RPS-00001 ");

        assert!(form.changed_fields().is_empty());
        assert_eq!(form.submit(&api).await, Err(FormError::NoFieldsChanged));
        assert!(api.state().updates.is_empty());
    }

    #[test]
    fn different_count_is_still_a_change() {
        let mut form = EventForm::edit(sample_event("evt-1"), Utc);
        form.set(FormField::EventCnt, "02");
        assert_eq!(form.changed_fields(), vec![FormField::EventCnt]);
    }

    #[tokio::test]
    async fn edit_rejects_changed_trans_id_that_is_not_a_uuid() {
        let api = FakeApi::with_events(vec![sample_event("evt-1")]);
        let mut form = EventForm::edit(sample_event("evt-1"), Utc);
        form.set(FormField::TransId, "not-a-uuid");

        assert!(matches!(form.submit(&api).await, Err(FormError::Invalid(_))));
        assert!(api.state().updates.is_empty());
    }

    #[tokio::test]
    async fn edit_sends_only_changed_fields() {
        let api = FakeApi::with_events(vec![sample_event("evt-1")]);
        let mut form = EventForm::edit(sample_event("evt-1"), Utc);
        form.set(FormField::TransId, "7d0e5a52-5b8e-4b43-8a53-2b8f5a1c9e10");
        form.set(FormField::AddrNbr, "");

        let outcome = form.submit(&api).await.unwrap().unwrap();
        assert_eq!(outcome.notification.message, "Event updated successfully!");

        let updates = &api.state().updates;
        assert_eq!(updates.len(), 1);
        let (event_id, patch) = &updates[0];
        assert_eq!(event_id, "evt-1");
        assert_eq!(patch.changed_fields(), vec!["trans_id", "addr_nbr"]);
        assert_eq!(patch.addr_nbr, Some(None));
    }

    #[tokio::test]
    async fn edit_converts_changed_timestamp() {
        let api = FakeApi::with_events(vec![sample_event("evt-1")]);
        let mut form = EventForm::edit(sample_event("evt-1"), Utc);
        form.set(FormField::TransTms, "2024-09-15T08:00");

        form.submit(&api).await.unwrap();
        let (_, patch) = &api.state().updates[0];
        assert_eq!(patch.trans_tms.as_deref(), Some("2024-09-15T08:00:00+00:00"));
    }

    #[test]
    fn edit_ignores_invalid_unchanged_fields() {
        let mut legacy = sample_event("evt-1");
        legacy.trans_id = "legacy-id".into();
        let mut form = EventForm::edit(legacy, Utc);
        form.set(FormField::RcNum, "10009");

        assert!(form.validate().is_empty());
        assert!(form.begin_submit().is_ok());
    }

    #[tokio::test]
    async fn backend_refusal_keeps_form_open() {
        let api = FakeApi::with_events(vec![sample_event("evt-1")]);
        api.state().update_error = Some(ApiError::Backend(ErrorDetail::new(
            "invalid",
            "Invalid Transaction ID format",
        )));
        let mut form = EventForm::edit(sample_event("evt-1"), Utc);
        form.set(FormField::RcNum, "10004");

        let outcome = form.submit(&api).await.unwrap().unwrap();
        assert!(!outcome.close_dialog && !outcome.refresh_listing);
        assert_eq!(outcome.notification.message, "Invalid Transaction ID format");
        assert_eq!(form.backend_error(), Some("Invalid Transaction ID format"));
        assert_eq!(form.state(), FormState::Editing);
    }

    #[tokio::test]
    async fn transport_failure_uses_generic_message() {
        let api = FakeApi::default();
        api.state().create_error = Some(ApiError::Transport("timed out".into()));
        let mut form = filled_add_form();

        let outcome = form.submit(&api).await.unwrap().unwrap();
        assert_eq!(outcome.notification.message, TRY_AGAIN_MESSAGE);
        assert_eq!(form.backend_error(), None);
        assert!(form.can_submit());
    }

    #[test]
    fn response_after_close_is_discarded() {
        let mut form = filled_add_form();
        let (ticket, request) = form.begin_submit().unwrap();
        assert!(matches!(request, FormRequest::Create(_)));
        assert_eq!(form.begin_submit(), Err(FormError::Busy));

        form.close();
        assert_eq!(form.finish_submit(ticket, Ok(None)), None);
        assert_eq!(form.begin_submit(), Err(FormError::Closed));
    }
}
