//! Event records as the backend stores them.
//!
//! `Event` is what `get-events` returns. `EventDraft` is the body of
//! `create-event` (the backend assigns `event_id`), and `EventPatch` is the
//! partial body of `update-event` carrying only the fields that changed.

use serde::{Deserialize, Serialize};

/// Location categories the backend accepts for `location_cd`.
pub const LOCATION_CODES: &[&str] = &["DESTINATION", "CUSTOMER NUMBER", "OUTLET ID"];

/// A persisted transaction-location record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Assigned by the backend at creation, never by the client.
    pub event_id: String,
    pub trans_id: String,
    pub client_id: String,
    /// Timestamp in the backend's native text form (RFC 3339).
    pub trans_tms: String,
    pub rc_num: String,
    pub event_cnt: i64,
    pub location_cd: String,
    #[serde(default)]
    pub addr_nbr: Option<String>,
    #[serde(default)]
    pub location_id1: Option<String>,
    #[serde(default)]
    pub location_id2: Option<String>,
}

/// A new event, before the backend has assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub trans_id: String,
    pub client_id: String,
    pub trans_tms: String,
    pub rc_num: String,
    pub event_cnt: i64,
    pub location_cd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr_nbr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id2: Option<String>,
}

/// Changed fields of an existing event.
///
/// Optional columns use a double option: `Some(None)` clears the column,
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_tms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc_num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_cnt: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_cd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr_nbr: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id1: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id2: Option<Option<String>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }

    /// Names of the fields this patch touches, in form order.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.trans_id.is_some() {
            fields.push("trans_id");
        }
        if self.client_id.is_some() {
            fields.push("client_id");
        }
        if self.trans_tms.is_some() {
            fields.push("trans_tms");
        }
        if self.rc_num.is_some() {
            fields.push("rc_num");
        }
        if self.event_cnt.is_some() {
            fields.push("event_cnt");
        }
        if self.location_cd.is_some() {
            fields.push("location_cd");
        }
        if self.addr_nbr.is_some() {
            fields.push("addr_nbr");
        }
        if self.location_id1.is_some() {
            fields.push("location_id1");
        }
        if self.location_id2.is_some() {
            fields.push("location_id2");
        }
        fields
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event {} - Client {}", self.event_id, self.client_id)
    }
}
