mod augment;
mod blocks;
mod config;
mod dispatch;
mod highlight;
mod html;

use std::sync::Arc;

use metrics::counter;
use once_cell::sync::{Lazy, OnceCell};
use syntect::{dumps::from_uncompressed_data, html::ClassStyle, parsing::SyntaxSet};
use thiserror::Error;
use tracing::debug;

use crate::application::render::types::{
    RenderError, RenderOutput, RenderRequest, RenderService, RenderTarget,
};
use crate::domain::document::Document;

use augment::{Augmented, augment};
use blocks::BlockDefaults;
pub use blocks::DEFAULT_EMBED_HEIGHT;
use config::build_document_sanitizer;
use dispatch::Dispatcher;
use highlight::Highlighter;

/// Document rendering pipeline: node dispatch with Syntect highlighting,
/// Ammonia sanitisation and a lol_html augment pass.
pub struct DocumentRenderService {
    syntax_set: SyntaxSet,
    class_style: ClassStyle,
    sanitizer: ammonia::Builder<'static>,
    config: RenderPipelineConfig,
}

impl DocumentRenderService {
    /// Construct a renderer emitting `syntax-` prefixed highlight classes.
    pub fn new(config: RenderPipelineConfig) -> Self {
        let syntax_bytes = include_bytes!(env!("SYNTAX_PACK_FILE"));
        let syntax_set: SyntaxSet =
            from_uncompressed_data(syntax_bytes).expect("syntax pack must be valid");

        Self {
            syntax_set,
            class_style: ClassStyle::SpacedPrefixed { prefix: "syntax-" },
            sanitizer: build_document_sanitizer(),
            config,
        }
    }

    pub fn config(&self) -> &RenderPipelineConfig {
        &self.config
    }

    pub(crate) fn dispatcher<'a>(&'a self, slug: &'a str) -> Dispatcher<'a> {
        Dispatcher {
            highlighter: Highlighter {
                syntax_set: &self.syntax_set,
                class_style: &self.class_style,
            },
            blocks: BlockDefaults {
                embed_height: self.config.embed_default_height,
            },
            slug,
        }
    }

    /// Render a document into HTML while skipping sanitisation and
    /// augmentation. Intended for diagnostics when refining sanitizer rules.
    pub fn render_unsanitized(&self, request: &RenderRequest) -> String {
        if request.document.is_empty() {
            return RenderOutput::empty().html;
        }
        dispatch_stage(&self.dispatcher(request.target.slug()), &request.document)
    }
}

static RENDER_SERVICE: Lazy<Arc<DocumentRenderService>> =
    Lazy::new(|| Arc::new(DocumentRenderService::new(active_render_config())));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<DocumentRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl Default for DocumentRenderService {
    fn default() -> Self {
        Self::new(RenderPipelineConfig::default())
    }
}

impl RenderService for DocumentRenderService {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        let target = &request.target;
        counter!("folio_render_total", "target" => target.kind()).increment(1);

        if request.document.is_empty() {
            counter!("folio_render_empty_total", "target" => target.kind()).increment(1);
            debug!(
                target = "application::render",
                slug = target.slug(),
                "document has no content; rendering empty state"
            );
            return Ok(RenderOutput::empty());
        }

        let dispatcher = self.dispatcher(target.slug());
        let rendered_html = dispatch_stage(&dispatcher, &request.document);
        let sanitized_html = sanitize_stage(rendered_html, &self.sanitizer, self.config.sanitize);
        let Augmented {
            html,
            outline,
            metrics,
        } = augment_stage(&sanitized_html, target)?;

        Ok(RenderOutput {
            html,
            is_empty: false,
            outline,
            content_metrics: metrics,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPipelineConfig {
    /// Run the allow-list sanitiser over dispatched markup.
    pub sanitize: bool,
    /// Frame height for embeds that do not carry one.
    pub embed_default_height: u32,
}

impl Default for RenderPipelineConfig {
    fn default() -> Self {
        Self {
            sanitize: true,
            embed_default_height: DEFAULT_EMBED_HEIGHT,
        }
    }
}

impl From<&crate::config::RenderSettings> for RenderPipelineConfig {
    fn from(settings: &crate::config::RenderSettings) -> Self {
        Self {
            sanitize: settings.sanitize,
            embed_default_height: settings.embed_default_height.get(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("render service already configured")]
    AlreadyConfigured,
}

static RENDER_PIPELINE_CONFIG: OnceCell<RenderPipelineConfig> = OnceCell::new();

pub fn configure_render_service(config: RenderPipelineConfig) -> Result<(), RenderConfigError> {
    RENDER_PIPELINE_CONFIG
        .set(config)
        .map_err(|_| RenderConfigError::AlreadyConfigured)
}

fn active_render_config() -> RenderPipelineConfig {
    RENDER_PIPELINE_CONFIG.get().cloned().unwrap_or_default()
}

fn dispatch_stage(dispatcher: &Dispatcher<'_>, document: &Document) -> String {
    dispatcher.render_document(document)
}

fn sanitize_stage(html: String, sanitizer: &ammonia::Builder<'static>, enabled: bool) -> String {
    if enabled {
        sanitizer.clean(&html).to_string()
    } else {
        html
    }
}

fn augment_stage(html: &str, target: &RenderTarget) -> Result<Augmented, RenderError> {
    augment(html).inspect_err(|err| {
        tracing::error!(
            target = "application::render",
            slug = target.slug(),
            error = %err,
            "augment stage failed"
        );
    })
}
