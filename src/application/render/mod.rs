//! Rich-text rendering pipeline.
//!
//! The pipeline is pure: it accepts a stored document tree, produces
//! deterministic HTML, and recovers from document shape problems locally so a
//! bad node never aborts its siblings. Stages run in order: dispatch (node
//! kind to markup), sanitise (ammonia allow-list), augment (heading ids,
//! outline, link classification and metrics).

mod service;
mod types;

pub use service::{
    DEFAULT_EMBED_HEIGHT, DocumentRenderService, RenderConfigError, RenderPipelineConfig,
    configure_render_service, render_service,
};
pub use types::{
    ContentMetrics, EMPTY_STATE_HTML, HeadingOutline, RenderError, RenderOutput, RenderRequest,
    RenderService, RenderTarget,
};
