//! Request and response payloads shared between the folio server and its clients.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Contact form submission as posted by the public site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Returned once a contact submission has been recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCreatedResponse {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

/// Standard error envelope for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const RENDER: &str = "render_error";
    pub const INBOX: &str = "inbox_error";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_request_tolerates_missing_fields() {
        let request: ContactFormRequest =
            serde_json::from_str(r#"{"name":"Ada"}"#).expect("partial payload");
        assert_eq!(request.name, "Ada");
        assert!(request.email.is_empty());
        assert!(request.subject.is_none());
    }

    #[test]
    fn error_body_omits_empty_field_list() {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: codes::BAD_REQUEST.to_string(),
                message: "Malformed JSON".to_string(),
                hint: None,
            },
            fields: Vec::new(),
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert!(json.get("fields").is_none());
        assert!(json["error"].get("hint").is_none());
    }

    #[test]
    fn created_response_reads_rfc3339_timestamps() {
        let response: ContactCreatedResponse = serde_json::from_str(
            r#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","submitted_at":"2024-03-01T12:30:00Z"}"#,
        )
        .expect("created payload");

        assert_eq!(
            response.submitted_at,
            time::macros::datetime!(2024-03-01 12:30:00 UTC)
        );
        assert_eq!(
            response.id.to_string(),
            "67e55044-10b1-426f-9247-bb680e5fe0c8"
        );
    }
}
