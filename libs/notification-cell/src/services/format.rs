use std::cmp::Reverse;

use chrono::{DateTime, NaiveDateTime, Utc};

use shared_models::error::ValidationError;

use crate::models::{NewNotification, Notification};

/// Display layout used for stored timestamps (day/month/year, 24h clock, UTC).
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

pub const NETWORK_ERROR_MESSAGE: &str = "Network Error: Unable to connect to the server";

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(DISPLAY_FORMAT).to_string()
}

/// Reads a stored timestamp back. RFC 3339 is accepted too, for lists
/// written by other clients.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DISPLAY_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|t| t.naive_utc()))
}

pub fn validate_notification(notification: &NewNotification) -> Result<(), ValidationError> {
    let title = notification.title.as_deref().unwrap_or_default();
    let message = notification.message.as_deref().unwrap_or_default();

    if title.is_empty() || message.is_empty() {
        return Err(ValidationError::rule("Title and message are required"));
    }
    if message.trim().is_empty() {
        return Err(ValidationError::rule("Message cannot be empty"));
    }
    Ok(())
}

/// Most recent first. Timestamps that cannot be read sort last.
pub fn sort_notifications(mut notifications: Vec<Notification>) -> Vec<Notification> {
    notifications.sort_by_key(|n| Reverse(parse_timestamp(&n.timestamp)));
    notifications
}

/// Shape of a failed HTTP request, as seen by a client of this API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// The server answered with a non-success status.
    Response { status: u16, message: Option<String> },
    /// The request went out but nothing came back.
    NoResponse,
    /// The request could not be built or sent.
    Other(String),
}

impl From<&reqwest::Error> for RequestFailure {
    fn from(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            RequestFailure::Response { status: status.as_u16(), message: Some(err.to_string()) }
        } else if err.is_connect() || err.is_timeout() {
            RequestFailure::NoResponse
        } else {
            RequestFailure::Other(err.to_string())
        }
    }
}

pub fn get_error_message(failure: &RequestFailure) -> String {
    match failure {
        RequestFailure::Response { status, message } => {
            let message = message.as_deref().unwrap_or("An error occurred");
            match status {
                400 => format!("Bad Request: {}", message),
                401 => format!("Unauthorized: {}", message),
                403 => format!("Forbidden: {}", message),
                404 => format!("Not Found: {}", message),
                500 => format!("Internal Server Error: {}", message),
                _ => format!("Error: {}", message),
            }
        }
        RequestFailure::NoResponse => NETWORK_ERROR_MESSAGE.to_string(),
        RequestFailure::Other(message) => format!("Error: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};

    fn stored(id: &str, timestamp: String) -> Notification {
        Notification {
            id: id.to_string(),
            title: "T".to_string(),
            message: "m".to_string(),
            timestamp,
            is_read: false,
        }
    }

    #[test]
    fn test_display_timestamp_round_trips() {
        let at = Utc.with_ymd_and_hms(2024, 11, 5, 14, 3, 9).unwrap();
        let text = format_timestamp(at);

        assert_eq!(text, "05/11/2024, 14:03:09");
        assert_eq!(parse_timestamp(&text), Some(at.naive_utc()));
        assert_eq!(parse_timestamp("2024-11-05T14:03:09Z"), Some(at.naive_utc()));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_validate_notification_rules() {
        assert_matches!(
            validate_notification(&NewNotification::new("T", "")),
            Err(ValidationError::Rule(msg)) if msg == "Title and message are required"
        );
        assert_matches!(
            validate_notification(&NewNotification::new("T", "   ")),
            Err(ValidationError::Rule(msg)) if msg == "Message cannot be empty"
        );
        assert_matches!(validate_notification(&NewNotification::default()), Err(_));
        assert!(validate_notification(&NewNotification::new("T", "hi")).is_ok());
    }

    #[test]
    fn test_sort_is_most_recent_first() {
        let base = Utc.with_ymd_and_hms(2024, 1, 31, 23, 0, 0).unwrap();
        let sorted = sort_notifications(vec![
            stored("old", format_timestamp(base)),
            stored("broken", "not a date".to_string()),
            // Day-first text would sort wrongly as a plain string.
            stored("new", format_timestamp(base + Duration::days(1))),
            stored("mid", format_timestamp(base + Duration::hours(1))),
        ]);

        let ids: Vec<&str> = sorted.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old", "broken"]);
    }

    #[test]
    fn test_error_messages_by_status() {
        let response = |status, message: Option<&str>| RequestFailure::Response {
            status,
            message: message.map(str::to_string),
        };

        assert_eq!(get_error_message(&response(400, Some("bad field"))), "Bad Request: bad field");
        assert_eq!(get_error_message(&response(401, Some("x"))), "Unauthorized: x");
        assert_eq!(get_error_message(&response(403, Some("x"))), "Forbidden: x");
        assert_eq!(get_error_message(&response(404, None)), "Not Found: An error occurred");
        assert_eq!(get_error_message(&response(500, Some("x"))), "Internal Server Error: x");
        assert_eq!(get_error_message(&response(418, Some("teapot"))), "Error: teapot");
        assert_eq!(get_error_message(&RequestFailure::NoResponse), NETWORK_ERROR_MESSAGE);
        assert_eq!(get_error_message(&RequestFailure::Other("boom".to_string())), "Error: boom");
    }

    #[tokio::test]
    async fn test_refused_connection_is_no_response() {
        let err = reqwest::get("http://127.0.0.1:1/").await.unwrap_err();
        assert_eq!(RequestFailure::from(&err), RequestFailure::NoResponse);
    }
}
