//! HTML preview and health endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;

use crate::{
    application::{
        error::{AppError, HttpError},
        render::{RenderRequest, RenderTarget},
    },
    presentation::views::{PreviewTemplate, PreviewView, render_template_response},
};

use super::{HttpState, middleware::RenderSummary};

const DEFAULT_PREVIEW_TITLE: &str = "Untitled draft";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PreviewQuery {
    title: Option<String>,
}

/// Render a posted document inside the preview page shell.
pub(super) async fn preview(
    State(state): State<HttpState>,
    Query(query): Query<PreviewQuery>,
    body: Bytes,
) -> Result<Response, AppError> {
    let value = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|err| AppError::validation(format!("preview body is not JSON: {err}")))?
    };

    let request = RenderRequest::from_json(RenderTarget::Preview, Some(&value));
    let output = state.renderer.render(&request)?;
    let summary = RenderSummary::new(&request.target, &output);

    let title = query
        .title
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_PREVIEW_TITLE.to_string());

    let mut response = render_template_response(
        PreviewTemplate {
            view: PreviewView::new(title, &output),
        },
        StatusCode::OK,
    );
    if response.status().is_success() {
        summary.attach(&mut response);
    }
    Ok(response)
}

pub(super) async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub(super) async fn not_found() -> Response {
    HttpError::new(
        "infra::http::public::not_found",
        StatusCode::NOT_FOUND,
        "Not found",
        "no route matched the request",
    )
    .into_response()
}
