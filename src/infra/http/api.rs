//! JSON endpoints: document rendering and contact submissions.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use folio_api_types::{
    ApiErrorBody, ApiErrorMessage, ContactCreatedResponse, ContactFormRequest, FieldError, codes,
};
use serde::Deserialize;
use serde_json::Value;

use crate::application::{
    contact::ContactError,
    error::ErrorReport,
    render::{RenderRequest, RenderTarget},
};

use super::{HttpState, middleware::RenderSummary};

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
    fields: Vec<FieldError>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
            fields: Vec::new(),
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn invalid_fields(fields: Vec<FieldError>) -> Self {
        Self {
            fields,
            ..Self::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_INPUT,
                "Submission has invalid fields",
                None,
            )
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(error: ContactError) -> Self {
        match error {
            ContactError::Invalid(invalid) => ApiError::invalid_fields(
                invalid
                    .violations
                    .into_iter()
                    .map(|violation| FieldError {
                        field: violation.field.to_string(),
                        message: violation.message,
                    })
                    .collect(),
            ),
            ContactError::Inbox(err) => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::INBOX,
                "Message could not be delivered",
                Some(err.to_string()),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match (&self.hint, self.fields.is_empty()) {
            (Some(hint), _) => hint.clone(),
            (None, false) => self
                .fields
                .iter()
                .map(|field| field.field.as_str())
                .collect::<Vec<_>>()
                .join(","),
            (None, true) => self.message.to_string(),
        };
        let report = ErrorReport::from_message(
            "infra::http::api",
            self.status,
            format!("{}: {detail}", self.code),
        );

        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
            fields: self.fields,
        };
        let mut response = (self.status, Json(body)).into_response();
        report.attach(&mut response);
        response
    }
}

/// Identifies the rendered entity for logs and metrics.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RenderQuery {
    kind: Option<String>,
    slug: Option<String>,
}

impl RenderQuery {
    fn target(self) -> RenderTarget {
        let Some(slug) = self.slug.filter(|slug| !slug.trim().is_empty()) else {
            return RenderTarget::Preview;
        };
        match self.kind.as_deref() {
            Some("post") => RenderTarget::Post { slug },
            Some("project") => RenderTarget::Project { slug },
            Some("page") => RenderTarget::Page { slug },
            _ => RenderTarget::Preview,
        }
    }
}

pub(super) fn parse_json_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::bad_request("Malformed JSON body", Some(err.to_string())))
}

pub(super) async fn render_document(
    State(state): State<HttpState>,
    Query(query): Query<RenderQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let value = parse_json_body(&body)?;
    let request = RenderRequest::from_json(query.target(), Some(&value));

    let output = state.renderer.render(&request).map_err(|err| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::RENDER,
            "Document could not be rendered",
            Some(err.to_string()),
        )
    })?;

    let summary = RenderSummary::new(&request.target, &output);
    let mut response = Json(output).into_response();
    summary.attach(&mut response);
    Ok(response)
}

pub(super) async fn submit_contact(
    State(state): State<HttpState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ContactCreatedResponse>), ApiError> {
    let value = parse_json_body(&body)?;
    let form: ContactFormRequest = serde_json::from_value(value)
        .map_err(|err| ApiError::bad_request("Malformed contact form", Some(err.to_string())))?;

    let record = state.contact.submit(&form).await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactCreatedResponse {
            id: record.id,
            submitted_at: record.submitted_at,
        }),
    ))
}
