use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use folio::{
    application::{
        contact::{ContactInbox, ContactService},
        render::{RenderOutput, render_service},
    },
    domain::contact::ContactPolicy,
    infra::{
        http::{HttpState, REQUEST_ID_HEADER, build_router},
        memory::InMemoryContactInbox,
    },
};
use folio_api_types::{ApiErrorBody, ContactCreatedResponse, codes};
use serde_json::json;
use tower::ServiceExt;

const BODY_LIMIT: usize = 64 * 1024;

fn router_with_inbox(inbox: Arc<InMemoryContactInbox>) -> Router {
    let contact = ContactService::new(inbox, ContactPolicy::default());
    build_router(
        HttpState {
            renderer: render_service(),
            contact: Arc::new(contact),
        },
        BODY_LIMIT,
    )
}

fn router() -> Router {
    router_with_inbox(Arc::new(InMemoryContactInbox::new(16)))
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request builds")
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads")
        .to_vec()
}

#[tokio::test]
async fn render_endpoint_returns_html_outline_and_metrics() {
    let document = json!({
        "root": {
            "type": "root",
            "children": [
                { "type": "heading", "tag": "h2", "children": [{ "type": "text", "text": "Hello", "format": 0 }] },
                { "type": "paragraph", "children": [{ "type": "text", "text": "World wide", "format": 1 }] }
            ]
        }
    });

    let response = router()
        .oneshot(post_json(
            "/api/render?kind=post&slug=hello",
            document.to_string(),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let output: RenderOutput =
        serde_json::from_slice(&body_bytes(response).await).expect("render output json");
    assert!(!output.is_empty);
    assert!(output.html.contains("<h2 id=\"hello\">Hello</h2>"));
    assert!(output.html.contains("<strong>World wide</strong>"));
    assert_eq!(output.outline.len(), 1);
    assert_eq!(output.content_metrics.word_count, 3);
}

#[tokio::test]
async fn render_endpoint_treats_blank_body_as_empty_document() {
    let response = router()
        .oneshot(post_json("/api/render", ""))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let output: RenderOutput =
        serde_json::from_slice(&body_bytes(response).await).expect("render output json");
    assert_eq!(output, RenderOutput::empty());
}

#[tokio::test]
async fn render_endpoint_rejects_malformed_json() {
    let response = router()
        .oneshot(post_json("/api/render", "{not json"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ApiErrorBody =
        serde_json::from_slice(&body_bytes(response).await).expect("error envelope");
    assert_eq!(body.error.code, codes::BAD_REQUEST);
    assert!(body.error.hint.is_some());
}

#[tokio::test]
async fn contact_submission_is_recorded() {
    let inbox = Arc::new(InMemoryContactInbox::new(4));
    let payload = json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "subject": "Collaboration",
        "message": "I would like to talk about your renderer."
    });

    let response = router_with_inbox(Arc::clone(&inbox))
        .oneshot(post_json("/api/contact", payload.to_string()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: ContactCreatedResponse =
        serde_json::from_slice(&body_bytes(response).await).expect("created body");
    let recent = inbox.recent(10).await.expect("inbox readable");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, created.id);
    assert_eq!(recent[0].submission.name(), "Ada Lovelace");
}

#[tokio::test]
async fn contact_submission_reports_every_invalid_field() {
    let inbox = Arc::new(InMemoryContactInbox::new(4));
    let payload = json!({ "name": " ", "email": "nope", "message": "short" });

    let response = router_with_inbox(Arc::clone(&inbox))
        .oneshot(post_json("/api/contact", payload.to_string()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ApiErrorBody =
        serde_json::from_slice(&body_bytes(response).await).expect("error envelope");
    assert_eq!(body.error.code, codes::INVALID_INPUT);
    let fields: Vec<_> = body.fields.iter().map(|field| field.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "email", "message"]);
    assert!(inbox.is_empty().await);
}

#[tokio::test]
async fn preview_wraps_rendered_document_in_page_shell() {
    let document = json!({
        "root": {
            "type": "root",
            "children": [
                { "type": "heading", "tag": "h2", "children": [{ "type": "text", "text": "Intro", "format": 0 }] }
            ]
        }
    });

    let response = router()
        .oneshot(post_json("/preview?title=Draft", document.to_string()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let html = String::from_utf8(body_bytes(response).await).expect("utf8 page");
    assert!(html.contains("<h2 id=\"intro\">Intro</h2>"));
    assert!(html.contains("href=\"#intro\""));
    assert!(html.contains("Draft"));
}

#[tokio::test]
async fn preview_of_empty_document_shows_placeholder() {
    let response = router()
        .oneshot(post_json("/preview", "null"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = String::from_utf8(body_bytes(response).await).expect("utf8 page");
    assert!(html.contains("data-role=\"rich-text-empty\""));
}

#[tokio::test]
async fn health_and_fallback_routes() {
    let health = router()
        .oneshot(
            Request::builder()
                .uri("/_health")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("response");
    assert_eq!(health.status(), StatusCode::NO_CONTENT);
    let request_id = health
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .expect("request id header");
    assert_eq!(request_id.len(), 36);

    let missing = router()
        .oneshot(
            Request::builder()
                .uri("/nowhere")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("response");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let oversized = "x".repeat(BODY_LIMIT + 1);
    let response = router()
        .oneshot(post_json("/api/render", oversized))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
