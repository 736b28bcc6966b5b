//! Final pass over sanitised markup: unique heading ids, the outline, link
//! classification and content metrics.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use lol_html::{RewriteStrSettings, element, rewrite_str, text};

use crate::application::render::types::{ContentMetrics, HeadingOutline, RenderError};
use crate::domain::document::HeadingLevel;
use crate::domain::slug::AnchorSlugger;

use super::html::decode_basic_entities;

const WORDS_PER_MINUTE: f32 = 225.0;

/// Interface text that must not count towards reading time.
const CHROME_SELECTORS: [&str; 4] = [
    "button",
    ".code-block__gutter",
    ".code-block__language",
    ".callout__icon",
];

pub(crate) struct Augmented {
    pub(crate) html: String,
    pub(crate) outline: Vec<HeadingOutline>,
    pub(crate) metrics: ContentMetrics,
}

#[derive(Default)]
struct AugmentState {
    slugger: AnchorSlugger,
    outline: Vec<HeadingOutline>,
    word_count: u32,
    code_blocks: u32,
    embeds: u32,
    callouts: u32,
    internal_links: u32,
    external_links: u32,
}

pub(crate) fn augment(html: &str) -> Result<Augmented, RenderError> {
    let state = Rc::new(RefCell::new(AugmentState::default()));

    let mut handlers = Vec::new();

    for level in HeadingLevel::MIN..=HeadingLevel::MAX {
        let selector = format!("h{level}");
        handlers.push(element!(selector, {
            let state = Rc::clone(&state);
            move |el| {
                let candidate = el.get_attribute("data-anchor").unwrap_or_default();
                let anchor = {
                    let mut state = state.borrow_mut();
                    let anchor = state.slugger.claim(&candidate);
                    state.outline.push(HeadingOutline {
                        level,
                        anchor: anchor.clone(),
                        text: String::new(),
                    });
                    anchor
                };
                el.remove_attribute("data-anchor");
                el.set_attribute("id", &anchor)?;
                Ok(())
            }
        }));
        handlers.push(text!(selector, {
            let state = Rc::clone(&state);
            move |chunk| {
                let mut state = state.borrow_mut();
                if let Some(entry) = state.outline.last_mut() {
                    entry.text.push_str(chunk.as_str());
                }
                Ok(())
            }
        }));
    }

    handlers.push(element!("a[href]", {
        let state = Rc::clone(&state);
        move |el| {
            let href = el.get_attribute("href").unwrap_or_default();
            let kind = classify_link(&href);
            match kind {
                LinkKind::External => {
                    let mut state = state.borrow_mut();
                    state.external_links = state.external_links.saturating_add(1);
                }
                LinkKind::Internal => {
                    let mut state = state.borrow_mut();
                    state.internal_links = state.internal_links.saturating_add(1);
                }
                LinkKind::Anchor | LinkKind::Other => {}
            }

            if el.get_attribute("target").as_deref() == Some("_blank") {
                let rel = merge_rel(el.get_attribute("rel"), &["noopener", "noreferrer"]);
                el.set_attribute("rel", &rel)?;
            }
            el.set_attribute("data-link-kind", kind.as_str())?;
            Ok(())
        }
    }));

    handlers.push(element!("figure[data-role=\"code-block\"]", {
        let state = Rc::clone(&state);
        move |_el| {
            let mut state = state.borrow_mut();
            state.code_blocks = state.code_blocks.saturating_add(1);
            Ok(())
        }
    }));

    handlers.push(element!("figure[data-role=\"embed\"]", {
        let state = Rc::clone(&state);
        move |_el| {
            let mut state = state.borrow_mut();
            state.embeds = state.embeds.saturating_add(1);
            Ok(())
        }
    }));

    handlers.push(element!("aside[data-role=\"callout\"]", {
        let state = Rc::clone(&state);
        move |_el| {
            let mut state = state.borrow_mut();
            state.callouts = state.callouts.saturating_add(1);
            Ok(())
        }
    }));

    handlers.push(text!("*", {
        let state = Rc::clone(&state);
        move |t| {
            let words = t.as_str().split_whitespace().count() as u32;
            if words > 0 {
                let mut state = state.borrow_mut();
                state.word_count = state.word_count.saturating_add(words);
            }
            Ok(())
        }
    }));

    for selector in CHROME_SELECTORS {
        handlers.push(text!(selector, {
            let state = Rc::clone(&state);
            move |t| {
                let words = t.as_str().split_whitespace().count() as u32;
                if words > 0 {
                    let mut state = state.borrow_mut();
                    state.word_count = state.word_count.saturating_sub(words);
                }
                Ok(())
            }
        }));
    }

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::Document {
        message: err.to_string(),
    })?;

    let state = Rc::try_unwrap(state)
        .map(RefCell::into_inner)
        .map_err(|_| RenderError::Document {
            message: "augment state still shared after rewrite".to_string(),
        })?;

    let metrics = ContentMetrics {
        word_count: state.word_count,
        reading_time_minutes: reading_time(state.word_count),
        code_blocks_count: state.code_blocks,
        embeds_count: state.embeds,
        callouts_count: state.callouts,
        internal_links_count: state.internal_links,
        external_links_count: state.external_links,
    };

    let outline = state
        .outline
        .into_iter()
        .map(|entry| HeadingOutline {
            text: decode_basic_entities(entry.text.trim()),
            ..entry
        })
        .collect();

    Ok(Augmented {
        html: rewritten,
        outline,
        metrics,
    })
}

fn reading_time(words: u32) -> u32 {
    if words == 0 {
        0
    } else {
        ((words as f32 / WORDS_PER_MINUTE).ceil() as u32).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Internal,
    External,
    Anchor,
    Other,
}

impl LinkKind {
    fn as_str(self) -> &'static str {
        match self {
            LinkKind::Internal => "internal",
            LinkKind::External => "external",
            LinkKind::Anchor => "anchor",
            LinkKind::Other => "other",
        }
    }
}

fn classify_link(href: &str) -> LinkKind {
    if href.starts_with('#') || href.is_empty() {
        return LinkKind::Anchor;
    }

    if href.starts_with("http://") || href.starts_with("https://") || href.starts_with("//") {
        return LinkKind::External;
    }

    if href.starts_with('/')
        || href.starts_with("./")
        || href.starts_with("../")
        || !href.contains(':')
    {
        return LinkKind::Internal;
    }

    LinkKind::Other
}

fn merge_rel(existing: Option<String>, required: &[&str]) -> String {
    let mut tokens: BTreeSet<String> = existing
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    for &token in required {
        tokens.insert(token.to_string());
    }
    tokens.into_iter().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_headings_receive_suffixed_ids() {
        let augmented = augment(
            "<h2 data-anchor=\"setup\">Setup</h2><p>x</p><h2 data-anchor=\"setup\">Setup</h2><h3 data-anchor=\"setup\">Setup &amp; run</h3>",
        )
        .expect("augment");

        assert_eq!(
            augmented.html,
            "<h2 id=\"setup\">Setup</h2><p>x</p><h2 id=\"setup-2\">Setup</h2><h3 id=\"setup-3\">Setup &amp; run</h3>"
        );
        let anchors: Vec<_> = augmented
            .outline
            .iter()
            .map(|entry| (entry.level, entry.anchor.as_str(), entry.text.as_str()))
            .collect();
        assert_eq!(
            anchors,
            vec![
                (2, "setup", "Setup"),
                (2, "setup-2", "Setup"),
                (3, "setup-3", "Setup & run"),
            ]
        );
    }

    #[test]
    fn links_are_classified_and_counted() {
        let augmented = augment(
            "<p><a href=\"https://example.com\" target=\"_blank\">a</a><a href=\"/projects/folio\">b</a><a href=\"#top\">c</a><a href=\"mailto:me@example.com\">d</a></p>",
        )
        .expect("augment");

        assert!(augmented.html.contains("rel=\"noopener noreferrer\""));
        assert!(augmented.html.contains("data-link-kind=\"external\""));
        assert!(augmented.html.contains("data-link-kind=\"internal\""));
        assert!(augmented.html.contains("data-link-kind=\"anchor\""));
        assert!(augmented.html.contains("data-link-kind=\"other\""));
        assert_eq!(augmented.metrics.external_links_count, 1);
        assert_eq!(augmented.metrics.internal_links_count, 1);
    }

    #[test]
    fn blocks_and_words_are_counted() {
        let augmented = augment(
            "<figure data-role=\"code-block\"><button type=\"button\">Copy</button></figure><figure data-role=\"embed\"></figure><aside data-role=\"callout\"><span class=\"callout__icon\">!</span><p>one two three</p></aside>",
        )
        .expect("augment");

        assert_eq!(augmented.metrics.code_blocks_count, 1);
        assert_eq!(augmented.metrics.embeds_count, 1);
        assert_eq!(augmented.metrics.callouts_count, 1);
        assert_eq!(augmented.metrics.word_count, 3);
        assert_eq!(augmented.metrics.reading_time_minutes, 1);
    }

    #[test]
    fn reading_time_rounds_up() {
        assert_eq!(reading_time(0), 0);
        assert_eq!(reading_time(1), 1);
        assert_eq!(reading_time(225), 1);
        assert_eq!(reading_time(226), 2);
    }
}
