use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::{
    error::ErrorReport,
    render::{RenderOutput, RenderTarget},
};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Which part of the public surface a request hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Render,
    Contact,
    Preview,
    Health,
    Unrouted,
}

impl Surface {
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/api/render" => Surface::Render,
            "/api/contact" => Surface::Contact,
            "/preview" => Surface::Preview,
            "/_health" => Surface::Health,
            _ => Surface::Unrouted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Surface::Render => "render",
            Surface::Contact => "contact",
            Surface::Preview => "preview",
            Surface::Health => "health",
            Surface::Unrouted => "unrouted",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub surface: Surface,
}

/// Attached by the render and preview handlers so the response logger can
/// say what was rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub target_kind: &'static str,
    pub slug: String,
    pub word_count: u32,
    pub is_empty: bool,
}

impl RenderSummary {
    pub fn new(target: &RenderTarget, output: &RenderOutput) -> Self {
        Self {
            target_kind: target.kind(),
            slug: target.slug().to_string(),
            word_count: output.content_metrics.word_count,
            is_empty: output.is_empty,
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext {
        request_id: Uuid::new_v4().to_string(),
        surface: Surface::from_path(request.uri().path()),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response.extensions_mut().insert(ctx);
    response
}

pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();
    let ctx = request.extensions().get::<RequestContext>().cloned();
    let (request_id, surface) = match &ctx {
        Some(ctx) => (ctx.request_id.as_str(), ctx.surface),
        None => ("", Surface::from_path(&path)),
    };

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();

    if status.is_success() {
        match response.extensions_mut().remove::<RenderSummary>() {
            Some(summary) => info!(
                target = "folio::http::response",
                status = status.as_u16(),
                surface = surface.as_str(),
                render_target = summary.target_kind,
                slug = %summary.slug,
                words = summary.word_count,
                empty = summary.is_empty,
                elapsed_ms,
                request_id,
                "document rendered",
            ),
            None => debug!(
                target = "folio::http::response",
                status = status.as_u16(),
                method = %method,
                surface = surface.as_str(),
                elapsed_ms,
                request_id,
                "request served",
            ),
        }
        return response;
    }

    let (source, messages) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("unknown", Vec::new()),
    };
    let detail = messages
        .first()
        .map(String::as_str)
        .unwrap_or("no diagnostic available");

    if status.is_server_error() {
        error!(
            target = "folio::http::response",
            status = status.as_u16(),
            method = %method,
            path = %path,
            surface = surface.as_str(),
            source,
            detail,
            chain = ?messages,
            elapsed_ms,
            request_id,
            "request failed",
        );
    } else {
        warn!(
            target = "folio::http::response",
            status = status.as_u16(),
            method = %method,
            path = %path,
            surface = surface.as_str(),
            source,
            detail,
            elapsed_ms,
            request_id,
            "request rejected",
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_map_to_surfaces() {
        assert_eq!(Surface::from_path("/api/render"), Surface::Render);
        assert_eq!(Surface::from_path("/api/contact/"), Surface::Contact);
        assert_eq!(Surface::from_path("/preview"), Surface::Preview);
        assert_eq!(Surface::from_path("/_health"), Surface::Health);
        assert_eq!(Surface::from_path("/admin"), Surface::Unrouted);
    }

    #[test]
    fn summary_records_target_and_metrics() {
        let target = RenderTarget::Project {
            slug: "folio".to_string(),
        };
        let summary = RenderSummary::new(&target, &RenderOutput::empty());

        assert_eq!(summary.target_kind, "project");
        assert_eq!(summary.slug, "folio");
        assert_eq!(summary.word_count, 0);
        assert!(summary.is_empty);
    }
}
