//! Bulk-import payload: parsing, structural checks and the sample template.
//!
//! Files are parsed to raw JSON first so that malformed text and
//! structurally wrong documents fail differently, and so that every
//! structural problem can be reported at once with its JSON path. Nothing is
//! dropped or corrected: a single bad group rejects the whole file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::{EventDeskError, EventDeskResult};
use crate::validation::is_valid_uuid;

/// A client-submitted batch of transaction groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub batch_id: String,
    pub records: Vec<TransactionGroup>,
}

/// One `trans_id` and the event details recorded against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionGroup {
    pub trans_id: String,
    pub trans_tms: String,
    pub rc_num: String,
    pub client_id: String,
    pub event: Vec<EventDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    pub event_cnt: i64,
    pub location_cd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr_nbr: Option<String>,
}

/// Backend verdict on a batch. Failures carry no per-record detail.
///
/// `added_count` is mandatory: a `data` object without it is not a verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub added_count: u64,
    #[serde(default)]
    pub failed_count: u64,
}

impl BatchRequest {
    /// Number of events the batch expands into (one per detail entry).
    pub fn event_count(&self) -> usize {
        self.records.iter().map(|group| group.event.len()).sum()
    }
}

/// A structural problem at a JSON path such as `records[1].event`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchIssue {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for BatchIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchError {
    /// Not JSON at all. The parser message is kept for logs only.
    #[error("Invalid JSON file")]
    InvalidJson(String),

    #[error("{}", summarize(.0))]
    Structure(Vec<BatchIssue>),
}

fn summarize(issues: &[BatchIssue]) -> String {
    let lines: Vec<String> = issues.iter().map(|issue| issue.to_string()).collect();
    format!(
        "Batch file has {} {}: {}",
        issues.len(),
        if issues.len() == 1 { "problem" } else { "problems" },
        lines.join("; ")
    )
}

/// Parse and structurally validate a batch document.
pub fn parse_batch(text: &str) -> Result<BatchRequest, BatchError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let value: Value =
        serde_json::from_str(text).map_err(|e| BatchError::InvalidJson(e.to_string()))?;

    let issues = check_structure(&value);
    if !issues.is_empty() {
        return Err(BatchError::Structure(issues));
    }

    serde_json::from_value(value).map_err(|e| {
        BatchError::Structure(vec![BatchIssue {
            path: "$".into(),
            message: e.to_string(),
        }])
    })
}

struct Issues(Vec<BatchIssue>);

impl Issues {
    fn push(&mut self, path: impl Into<String>, message: &str) {
        self.0.push(BatchIssue {
            path: path.into(),
            message: message.to_string(),
        });
    }
}

fn check_structure(value: &Value) -> Vec<BatchIssue> {
    let mut issues = Issues(Vec::new());

    let Some(root) = value.as_object() else {
        issues.push("$", "must be a JSON object");
        return issues.0;
    };

    required_string(root, "batch_id", "batch_id", &mut issues);

    match root.get("records") {
        None | Some(Value::Null) => issues.push("records", "is required"),
        Some(Value::Array(groups)) if !groups.is_empty() => {
            for (i, group) in groups.iter().enumerate() {
                check_group(group, &format!("records[{i}]"), &mut issues);
            }
        }
        Some(_) => issues.push("records", "must be a non-empty list"),
    }

    issues.0
}

fn check_group(group: &Value, path: &str, issues: &mut Issues) {
    let Some(group) = group.as_object() else {
        issues.push(path, "must be an object");
        return;
    };

    let trans_id_path = format!("{path}.trans_id");
    let trans_id = required_string(group, "trans_id", &trans_id_path, issues);
    if trans_id.is_some_and(|id| !is_valid_uuid(id)) {
        issues.push(trans_id_path, "must be a UUID");
    }
    for field in ["trans_tms", "rc_num", "client_id"] {
        required_string(group, field, &format!("{path}.{field}"), issues);
    }

    let event_path = format!("{path}.event");
    match group.get("event") {
        None | Some(Value::Null) => issues.push(event_path, "is required"),
        Some(Value::Array(details)) if !details.is_empty() => {
            for (j, detail) in details.iter().enumerate() {
                check_detail(detail, &format!("{event_path}[{j}]"), issues);
            }
        }
        Some(_) => issues.push(event_path, "must be a non-empty list"),
    }
}

fn check_detail(detail: &Value, path: &str, issues: &mut Issues) {
    let Some(detail) = detail.as_object() else {
        issues.push(path, "must be an object");
        return;
    };

    match detail.get("event_cnt").and_then(Value::as_i64) {
        Some(count) if count >= 1 => {}
        _ => issues.push(format!("{path}.event_cnt"), "must be an integer of at least 1"),
    }

    required_string(detail, "location_cd", &format!("{path}.location_cd"), issues);

    for field in ["location_id1", "location_id2", "addr_nbr"] {
        match detail.get(field) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => issues.push(format!("{path}.{field}"), "must be a string"),
        }
    }
}

fn required_string<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    path: &str,
    issues: &mut Issues,
) -> Option<&'a str> {
    match object.get(field) {
        None | Some(Value::Null) => {
            issues.push(path, "is required");
            None
        }
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
        Some(Value::String(_)) => {
            issues.push(path, "must not be empty");
            None
        }
        Some(_) => {
            issues.push(path, "must be a string");
            None
        }
    }
}

/// A small, valid batch operators can start from.
///
/// `trans_tms` uses the compact `YYYYMMDDHHMMSSmmm` + zone form the batch
/// endpoint reads.
pub fn sample_template() -> BatchRequest {
    BatchRequest {
        batch_id: "BATCH-0001".into(),
        records: vec![
            TransactionGroup {
                trans_id: "0310abf6-d1f5-a1b3-8fb0-36fe934b1f28".into(),
                trans_tms: "20240914102030000EDT".into(),
                rc_num: "10002".into(),
                client_id: "RPS-00001".into(),
                event: vec![
                    EventDetail {
                        event_cnt: 1,
                        location_cd: "DESTINATION".into(),
                        location_id1: Some("T8C".into()),
                        location_id2: Some("1J7".into()),
                        addr_nbr: Some("0000000001".into()),
                    },
                    EventDetail {
                        event_cnt: 2,
                        location_cd: "CUSTOMER NUMBER".into(),
                        location_id1: Some("C100".into()),
                        location_id2: None,
                        addr_nbr: None,
                    },
                ],
            },
            TransactionGroup {
                trans_id: "6f1c2b7e-3a4d-4e5f-9a8b-7c6d5e4f3a2b".into(),
                trans_tms: "20240914112030000EDT".into(),
                rc_num: "10003".into(),
                client_id: "RPS-00002".into(),
                event: vec![EventDetail {
                    event_cnt: 1,
                    location_cd: "OUTLET ID".into(),
                    location_id1: Some("I029".into()),
                    location_id2: None,
                    addr_nbr: None,
                }],
            },
        ],
    }
}

/// Pretty-printed `sample_template`, as written by the template export.
pub fn sample_template_json() -> EventDeskResult<String> {
    serde_json::to_string_pretty(&sample_template())
        .map_err(|e| EventDeskError::Serialization(e.to_string()))
}
