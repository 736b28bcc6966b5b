mod api;
mod middleware;
mod public;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::application::{contact::ContactService, render::RenderService};

pub use api::ApiError;
pub use middleware::{REQUEST_ID_HEADER, RenderSummary, RequestContext, Surface};

#[derive(Clone)]
pub struct HttpState {
    pub renderer: Arc<dyn RenderService>,
    pub contact: Arc<ContactService>,
}

/// Build the public router: JSON API, HTML preview and health check.
pub fn build_router(state: HttpState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/render", post(api::render_document))
        .route("/api/contact", post(api::submit_contact))
        .route("/preview", post(public::preview))
        .route("/_health", get(public::health))
        .fallback(public::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
}
