use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::document::Document;

/// Markup returned for absent or childless documents.
pub const EMPTY_STATE_HTML: &str =
    "<div class=\"rich-text-empty\" data-role=\"rich-text-empty\">No content yet.</div>";

/// Identifies what is being rendered so logs and metrics can attribute work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderTarget {
    /// Blog post body.
    Post { slug: String },
    /// Project showcase write-up.
    Project { slug: String },
    /// Standalone page such as the profile or resume.
    Page { slug: String },
    /// Ad-hoc render from the preview endpoint or CLI.
    Preview,
}

impl RenderTarget {
    pub fn slug(&self) -> &str {
        match self {
            RenderTarget::Post { slug }
            | RenderTarget::Project { slug }
            | RenderTarget::Page { slug } => slug.as_str(),
            RenderTarget::Preview => "preview",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RenderTarget::Post { .. } => "post",
            RenderTarget::Project { .. } => "project",
            RenderTarget::Page { .. } => "page",
            RenderTarget::Preview => "preview",
        }
    }
}

/// Rendering request passed into the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub target: RenderTarget,
    pub document: Document,
}

impl RenderRequest {
    pub fn new(target: RenderTarget, document: Document) -> Self {
        Self { target, document }
    }

    /// Build a request from stored JSON. `None` and malformed values yield an
    /// absent document.
    pub fn from_json(target: RenderTarget, value: Option<&serde_json::Value>) -> Self {
        let document = value.map(Document::from_json).unwrap_or_default();
        Self::new(target, document)
    }
}

/// Entry of the heading outline, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingOutline {
    pub level: u8,
    pub anchor: String,
    pub text: String,
}

/// Content-level metrics surfaced alongside rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContentMetrics {
    pub word_count: u32,
    pub reading_time_minutes: u32,
    pub code_blocks_count: u32,
    pub embeds_count: u32,
    pub callouts_count: u32,
    pub internal_links_count: u32,
    pub external_links_count: u32,
}

/// Deterministic rendering result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutput {
    /// Sanitised HTML ready for embedding in a page.
    pub html: String,
    /// Set when the document was absent or had no children.
    pub is_empty: bool,
    #[serde(default)]
    pub outline: Vec<HeadingOutline>,
    #[serde(default)]
    pub content_metrics: ContentMetrics,
}

impl RenderOutput {
    pub fn empty() -> Self {
        Self {
            html: EMPTY_STATE_HTML.to_string(),
            is_empty: true,
            outline: Vec::new(),
            content_metrics: ContentMetrics::default(),
        }
    }

    pub fn contains_code(&self) -> bool {
        self.content_metrics.code_blocks_count > 0
    }
}

/// Pipeline faults. Document shape problems never surface here; they are
/// recovered where they occur.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("syntax highlighting failed: {language}: {message}")]
    Highlighting { language: String, message: String },
    #[error("document processing failed: {message}")]
    Document { message: String },
}

/// Trait exposed by the rendering pipeline. Implementations must be pure and
/// deterministic: given the same input, they return identical outputs or errors.
pub trait RenderService: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError>;
}
