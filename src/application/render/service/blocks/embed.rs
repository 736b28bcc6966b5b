//! Third-party embeds rendered as sandboxed frames.

use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::domain::blocks::{EmbedBlock, EmbedDimension, EmbedProvider};

use super::super::dispatch::Dispatcher;
use super::super::html::{escape_attribute, escape_text};

/// Frame sandbox applied to every embed, whatever the provider.
const EMBED_SANDBOX: &str =
    "allow-scripts allow-same-origin allow-popups allow-presentation";

const DEFAULT_WIDTH: &str = "100%";
const YOUTUBE_ALLOW: &str = "accelerometer; encrypted-media; gyroscope; picture-in-picture; fullscreen";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum EmbedError {
    #[error("no embed URL was provided")]
    MissingUrl,
    #[error("embed URL is not valid: {message}")]
    InvalidUrl { message: String },
    #[error("embed URL scheme `{scheme}` is not allowed")]
    UnsupportedScheme { scheme: String },
    #[error("no video id found in the link")]
    MissingVideoId,
}

/// Derive the frame locator for a provider from the author's URL.
fn embed_source(provider: EmbedProvider, raw: &str) -> Result<String, EmbedError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(EmbedError::MissingUrl);
    }

    let mut url = Url::parse(raw).map_err(|err| EmbedError::InvalidUrl {
        message: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(EmbedError::UnsupportedScheme {
            scheme: url.scheme().to_string(),
        });
    }

    match provider {
        EmbedProvider::Youtube => youtube_video_id(&url)
            .map(|id| format!("https://www.youtube.com/embed/{id}"))
            .ok_or(EmbedError::MissingVideoId),
        EmbedProvider::Codepen => {
            let path = url.path().replacen("/pen/", "/embed/", 1);
            url.set_path(&path);
            Ok(url.to_string())
        }
        EmbedProvider::Jsfiddle => {
            let path = format!("{}/embedded/", url.path().trim_end_matches('/'));
            url.set_path(&path);
            Ok(url.to_string())
        }
        EmbedProvider::Replit => {
            url.query_pairs_mut().append_pair("embed", "true");
            Ok(url.to_string())
        }
        EmbedProvider::Gist | EmbedProvider::Twitter | EmbedProvider::Custom => Ok(raw.to_string()),
    }
}

fn youtube_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(&host);
    let mut segments = url.path_segments()?.filter(|segment| !segment.is_empty());

    let candidate = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" | "music.youtube.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("embed" | "shorts" | "live" | "v") => segments.next().map(str::to_string),
            _ => None,
        },
        _ => None,
    }?;

    let valid = !candidate.is_empty()
        && candidate
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    valid.then_some(candidate)
}

pub(super) fn render_embed(dispatcher: &Dispatcher<'_>, block: &EmbedBlock) -> String {
    let provider = block.provider;
    match embed_source(provider, block.url()) {
        Ok(source) => render_frame(dispatcher, block, &source),
        Err(err) => {
            warn!(
                target = "application::render::blocks",
                slug = dispatcher.slug,
                provider = provider.as_str(),
                error = %err,
                "embed could not be resolved"
            );
            format!(
                "<div class=\"embed embed--unavailable\" data-role=\"embed-error\" data-provider=\"{}\" role=\"note\">{} embed unavailable: {}</div>",
                provider.as_str(),
                provider.display_name(),
                escape_text(&err.to_string())
            )
        }
    }
}

fn render_frame(dispatcher: &Dispatcher<'_>, block: &EmbedBlock, source: &str) -> String {
    let provider = block.provider;
    let width = block
        .width
        .as_ref()
        .map(EmbedDimension::to_attribute)
        .unwrap_or_else(|| DEFAULT_WIDTH.to_string());
    let height = block
        .height
        .as_ref()
        .map(EmbedDimension::to_attribute)
        .unwrap_or_else(|| dispatcher.blocks.embed_height.to_string());
    let frame_title = block.title().unwrap_or_else(|| provider.display_name());
    let allow = match provider {
        EmbedProvider::Youtube => format!(" allow=\"{YOUTUBE_ALLOW}\" allowfullscreen"),
        _ => String::new(),
    };

    let mut html = format!(
        "<figure class=\"embed embed--{kind}\" data-role=\"embed\" data-provider=\"{kind}\">\
<iframe src=\"{src}\" title=\"{title}\" width=\"{width}\" height=\"{height}\" loading=\"lazy\" \
sandbox=\"{EMBED_SANDBOX}\" referrerpolicy=\"strict-origin-when-cross-origin\"{allow}></iframe>",
        kind = provider.as_str(),
        src = escape_attribute(source),
        title = escape_attribute(frame_title),
        width = escape_attribute(&width),
        height = escape_attribute(&height),
    );
    if let Some(title) = block.title() {
        html.push_str(&format!("<figcaption>{}</figcaption>", escape_text(title)));
    }
    html.push_str("</figure>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_links_become_embed_urls() {
        for link in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://m.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(
                embed_source(EmbedProvider::Youtube, link).as_deref(),
                Ok("https://www.youtube.com/embed/dQw4w9WgXcQ"),
                "{link}"
            );
        }
    }

    #[test]
    fn youtube_without_video_id_is_an_error() {
        assert_eq!(
            embed_source(EmbedProvider::Youtube, "https://www.youtube.com/@channel"),
            Err(EmbedError::MissingVideoId)
        );
        assert_eq!(
            embed_source(EmbedProvider::Youtube, "https://vimeo.com/123"),
            Err(EmbedError::MissingVideoId)
        );
        assert_eq!(
            embed_source(EmbedProvider::Youtube, "https://youtu.be/bad%20id"),
            Err(EmbedError::MissingVideoId)
        );
    }

    #[test]
    fn codepen_pen_path_switches_to_embed() {
        assert_eq!(
            embed_source(EmbedProvider::Codepen, "https://codepen.io/ada/pen/abcXYZ").as_deref(),
            Ok("https://codepen.io/ada/embed/abcXYZ")
        );
    }

    #[test]
    fn jsfiddle_gets_embedded_suffix_once() {
        assert_eq!(
            embed_source(EmbedProvider::Jsfiddle, "https://jsfiddle.net/ada/x1y2/").as_deref(),
            Ok("https://jsfiddle.net/ada/x1y2/embedded/")
        );
        assert_eq!(
            embed_source(EmbedProvider::Jsfiddle, "https://jsfiddle.net/ada/x1y2").as_deref(),
            Ok("https://jsfiddle.net/ada/x1y2/embedded/")
        );
    }

    #[test]
    fn replit_gains_embed_flag() {
        assert_eq!(
            embed_source(EmbedProvider::Replit, "https://replit.com/@ada/demo").as_deref(),
            Ok("https://replit.com/@ada/demo?embed=true")
        );
        assert_eq!(
            embed_source(EmbedProvider::Replit, "https://replit.com/@ada/demo?lite=1").as_deref(),
            Ok("https://replit.com/@ada/demo?lite=1&embed=true")
        );
    }

    #[test]
    fn other_providers_pass_through_unchanged() {
        let link = "https://gist.github.com/ada/0123abcd";
        assert_eq!(
            embed_source(EmbedProvider::Gist, link).as_deref(),
            Ok(link)
        );
        assert_eq!(
            embed_source(EmbedProvider::Custom, " https://example.com/widget ").as_deref(),
            Ok("https://example.com/widget")
        );
    }

    #[test]
    fn unsafe_or_missing_urls_are_rejected() {
        assert_eq!(
            embed_source(EmbedProvider::Custom, "   "),
            Err(EmbedError::MissingUrl)
        );
        assert_eq!(
            embed_source(EmbedProvider::Custom, "javascript:alert(1)"),
            Err(EmbedError::UnsupportedScheme {
                scheme: "javascript".to_string()
            })
        );
        assert!(matches!(
            embed_source(EmbedProvider::Codepen, "not a url"),
            Err(EmbedError::InvalidUrl { .. })
        ));
    }
}
