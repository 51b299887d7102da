//! Field-level validity rules shared by the event form and the batch parser.

use uuid::Uuid;

use crate::event::EventDraft;

pub const TRANS_ID_MESSAGE: &str = "Transaction ID is required and should be a UUID.";
pub const CLIENT_ID_MESSAGE: &str = "Client ID is required.";
pub const TRANS_TMS_MESSAGE: &str = "Timestamp is required.";
pub const RC_NUM_MESSAGE: &str = "RC Number is required.";
pub const EVENT_CNT_MESSAGE: &str = "Event Count must be at least 1.";
pub const EVENT_CNT_NUMBER_MESSAGE: &str = "Event Count must be a whole number.";
pub const LOCATION_CD_MESSAGE: &str = "Location Code is required.";

/// Canonical hyphenated UUID syntax (8-4-4-4-12 hex digits).
///
/// Braced, URN and unhyphenated spellings are rejected. The version nibble
/// is not checked.
pub fn is_valid_uuid(value: &str) -> bool {
    value.len() == 36 && Uuid::try_parse(value).is_ok()
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Field name → message, in the order the errors were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message for a field wins.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(name, message)| (*name, message.as_str()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        write!(f, "{}", lines.join("; "))
    }
}

pub fn check_trans_id(value: &str, errors: &mut FieldErrors) {
    if is_blank(value) || !is_valid_uuid(value.trim()) {
        errors.insert("trans_id", TRANS_ID_MESSAGE);
    }
}

pub fn check_required(field: &'static str, value: &str, message: &str, errors: &mut FieldErrors) {
    if is_blank(value) {
        errors.insert(field, message);
    }
}

pub fn check_event_cnt(value: i64, errors: &mut FieldErrors) {
    if value < 1 {
        errors.insert("event_cnt", EVENT_CNT_MESSAGE);
    }
}

/// Every mandatory field of a new event.
pub fn validate_draft(draft: &EventDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_trans_id(&draft.trans_id, &mut errors);
    check_required("client_id", &draft.client_id, CLIENT_ID_MESSAGE, &mut errors);
    check_required("trans_tms", &draft.trans_tms, TRANS_TMS_MESSAGE, &mut errors);
    check_required("rc_num", &draft.rc_num, RC_NUM_MESSAGE, &mut errors);
    check_event_cnt(draft.event_cnt, &mut errors);
    check_required("location_cd", &draft.location_cd, LOCATION_CD_MESSAGE, &mut errors);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hyphenated_uuid_regardless_of_version_nibble() {
        assert!(is_valid_uuid("0310abf6-d1f5-a1b3-8fb0-36fe934b1f28"));
        assert!(is_valid_uuid("7d0e5a52-5b8e-4b43-8a53-2b8f5a1c9e10"));
        assert!(is_valid_uuid("7D0E5A52-5B8E-4B43-8A53-2B8F5A1C9E10"));
    }

    #[test]
    fn rejects_non_uuid_spellings() {
        assert!(!is_valid_uuid("not-a-uuid"));
        assert!(!is_valid_uuid(""));
        assert!(!is_valid_uuid("0310abf6d1f5a1b38fb036fe934b1f28"));
        assert!(!is_valid_uuid("{0310abf6-d1f5-a1b3-8fb0-36fe934b1f28}"));
        assert!(!is_valid_uuid("0310abf6-d1f5-a1b3-8fb0-36fe934b1f2g"));
    }

    fn draft() -> EventDraft {
        EventDraft {
            trans_id: "0310abf6-d1f5-a1b3-8fb0-36fe934b1f28".into(),
            client_id: "RPS-00001".into(),
            trans_tms: "2024-09-14T10:20:30+00:00".into(),
            rc_num: "10002".into(),
            event_cnt: 1,
            location_cd: "DESTINATION".into(),
            addr_nbr: None,
            location_id1: None,
            location_id2: None,
        }
    }

    #[test]
    fn complete_draft_is_valid() {
        assert!(validate_draft(&draft()).is_empty());
    }

    #[test]
    fn empty_draft_reports_every_mandatory_field() {
        let empty = EventDraft {
            trans_id: String::new(),
            client_id: " ".into(),
            trans_tms: String::new(),
            rc_num: String::new(),
            event_cnt: 0,
            location_cd: String::new(),
            ..draft()
        };

        let errors = validate_draft(&empty);
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get("trans_id"), Some(TRANS_ID_MESSAGE));
        assert_eq!(errors.get("event_cnt"), Some(EVENT_CNT_MESSAGE));
        assert_eq!(errors.get("location_cd"), Some(LOCATION_CD_MESSAGE));
    }

    #[test]
    fn bad_trans_id_is_rejected() {
        let errors = validate_draft(&EventDraft {
            trans_id: "not-a-uuid".into(),
            ..draft()
        });
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("trans_id"), Some(TRANS_ID_MESSAGE));
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("rc_num", "first");
        errors.insert("rc_num", "second");
        assert_eq!(errors.get("rc_num"), Some("first"));
        assert_eq!(errors.to_string(), "rc_num: first");
    }
}
