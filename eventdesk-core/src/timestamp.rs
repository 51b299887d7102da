//! Conversions between the backend's timestamp text and the local-time form
//! the operator edits.

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, TimeZone};

use crate::error::{EventDeskError, EventDeskResult};

/// Local-time form shown in the edit form (minutes precision).
pub const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Listing column format.
pub const DISPLAY_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

const LOCAL_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Backend RFC 3339 text → local-time input form in `tz`.
pub fn to_local_input<Tz>(native: &str, tz: &Tz) -> EventDeskResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let parsed = DateTime::parse_from_rfc3339(native.trim())
        .map_err(|e| EventDeskError::Timestamp(format!("'{native}': {e}")))?;
    Ok(parsed.with_timezone(tz).format(LOCAL_INPUT_FORMAT).to_string())
}

/// Local-time input (or an already-qualified RFC 3339 value) → RFC 3339 text.
///
/// Local times that don't exist or are ambiguous in `tz` are rejected.
pub fn from_local_input<Tz>(local: &str, tz: &Tz) -> EventDeskResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = local.trim();
    if let Ok(qualified) = DateTime::parse_from_rfc3339(local) {
        return Ok(qualified.to_rfc3339());
    }

    let naive = LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
        .ok_or_else(|| {
            EventDeskError::Timestamp(format!("'{local}'. Expected YYYY-MM-DDTHH:MM"))
        })?;

    let resolved = tz.from_local_datetime(&naive).single().ok_or_else(|| {
        EventDeskError::Timestamp(format!("'{local}' is not a unique local time"))
    })?;

    Ok(resolved.to_rfc3339())
}

/// Listing rendering; `N/A` when the backend text doesn't parse.
pub fn display<Tz>(native: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::parse_from_rfc3339(native.trim()) {
        Ok(parsed) => parsed.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        Err(_) => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn kolkata() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    #[test]
    fn native_to_local_input_shifts_zone() {
        assert_eq!(
            to_local_input("2024-09-14T10:20:30Z", &kolkata()).unwrap(),
            "2024-09-14T15:50"
        );
        assert_eq!(
            to_local_input("2024-09-14T10:20:30.123456Z", &Utc).unwrap(),
            "2024-09-14T10:20"
        );
    }

    #[test]
    fn local_input_to_native() {
        assert_eq!(
            from_local_input("2024-09-14T15:50", &kolkata()).unwrap(),
            "2024-09-14T15:50:00+05:30"
        );
        assert_eq!(
            from_local_input("2024-09-14 10:20:30", &Utc).unwrap(),
            "2024-09-14T10:20:30+00:00"
        );
    }

    #[test]
    fn qualified_input_passes_through() {
        assert_eq!(
            from_local_input("2024-09-14T10:20:30Z", &kolkata()).unwrap(),
            "2024-09-14T10:20:30+00:00"
        );
    }

    #[test]
    fn dst_gap_and_overlap_are_rejected() {
        let new_york = chrono_tz::America::New_York;

        // 02:00-03:00 is skipped on the spring-forward day
        assert!(matches!(
            from_local_input("2024-03-10T02:30", &new_york),
            Err(EventDeskError::Timestamp(_))
        ));
        // 01:00-02:00 happens twice on the fall-back day
        assert!(matches!(
            from_local_input("2024-11-03T01:30", &new_york),
            Err(EventDeskError::Timestamp(_))
        ));

        assert_eq!(
            from_local_input("2024-03-10T03:30", &new_york).unwrap(),
            "2024-03-10T03:30:00-04:00"
        );
    }

    #[test]
    fn garbage_input_is_rejected() {
        assert!(from_local_input("tomorrow", &Utc).is_err());
        assert!(to_local_input("", &Utc).is_err());
    }

    #[test]
    fn display_falls_back_to_na() {
        assert_eq!(display("2024-09-14T10:20:30Z", &Utc), "14-09-2024 10:20:30");
        assert_eq!(display("20240914102030123EDT", &Utc), "N/A");
    }
}
