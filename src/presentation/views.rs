use crate::application::error::HttpError;
use crate::application::render::{HeadingOutline, RenderOutput};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Stylesheet for `syntax-` prefixed highlight classes, generated at build time.
pub const CODE_THEME_CSS: &str = include_str!(env!("CODE_THEME_CSS_FILE"));

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Outline entry prepared for the table of contents.
pub struct OutlineItemView {
    pub level: u8,
    pub anchor: String,
    pub text: String,
}

impl From<&HeadingOutline> for OutlineItemView {
    fn from(entry: &HeadingOutline) -> Self {
        Self {
            level: entry.level,
            anchor: entry.anchor.clone(),
            text: entry.text.clone(),
        }
    }
}

pub struct PreviewView {
    pub title: String,
    pub body_html: String,
    pub is_empty: bool,
    pub outline: Vec<OutlineItemView>,
    pub reading_time_minutes: u32,
    pub word_count: u32,
    pub code_css: &'static str,
}

impl PreviewView {
    pub fn new(title: impl Into<String>, output: &RenderOutput) -> Self {
        Self {
            title: title.into(),
            body_html: output.html.clone(),
            is_empty: output.is_empty,
            outline: output.outline.iter().map(OutlineItemView::from).collect(),
            reading_time_minutes: output.content_metrics.reading_time_minutes,
            word_count: output.content_metrics.word_count,
            code_css: CODE_THEME_CSS,
        }
    }
}

#[derive(Template)]
#[template(path = "preview.html")]
pub struct PreviewTemplate {
    pub view: PreviewView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render::{ContentMetrics, RenderOutput};

    #[test]
    fn preview_page_embeds_rendered_markup_and_outline() {
        let output = RenderOutput {
            html: "<h2 id=\"intro\">Intro &amp; more</h2>".to_string(),
            is_empty: false,
            outline: vec![HeadingOutline {
                level: 2,
                anchor: "intro".to_string(),
                text: "Intro & more".to_string(),
            }],
            content_metrics: ContentMetrics {
                word_count: 3,
                reading_time_minutes: 1,
                ..ContentMetrics::default()
            },
        };

        let html = PreviewTemplate {
            view: PreviewView::new("Draft <1>", &output),
        }
        .render()
        .expect("template renders");

        assert!(html.contains("<h2 id=\"intro\">Intro &amp; more</h2>"));
        assert!(html.contains("href=\"#intro\""));
        assert!(html.contains("Draft &#60;1&#62;") || html.contains("Draft &lt;1&gt;"));
        assert!(html.contains("1 min read"));
    }
}
