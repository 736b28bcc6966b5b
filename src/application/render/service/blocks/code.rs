use crate::application::clipboard::COPY_RESET_WINDOW;
use crate::domain::blocks::CodePlaygroundBlock;

use super::super::dispatch::{Dispatcher, RenderKey};
use super::super::html::{escape_attribute, escape_text};

/// Prefix of the element id the copy button points at. Heading anchors are
/// slugified and never contain `--`, so these ids cannot collide with them.
const COPY_TARGET_PREFIX: &str = "code-block--";

/// Code snippet figure: optional title, toolbar with copy (and disabled run)
/// controls, optional line-number gutter and the highlighted body.
pub(super) fn render_code_block(
    dispatcher: &Dispatcher<'_>,
    block: &CodePlaygroundBlock,
    key: &RenderKey,
) -> String {
    let code = block.code();
    let target_id = format!("{COPY_TARGET_PREFIX}{key}");
    let body = dispatcher
        .highlighter
        .highlight(block.language(), code, &target_id);

    let language_attr = block
        .language()
        .map(|language| format!(" data-language=\"{}\"", escape_attribute(language)))
        .unwrap_or_default();

    let mut html = format!("<figure class=\"code-block\" data-role=\"code-block\"{language_attr}>");

    if let Some(title) = block.title() {
        html.push_str(&format!(
            "<figcaption class=\"code-block__title\">{}</figcaption>",
            escape_text(title)
        ));
    }

    html.push_str("<div class=\"code-block__toolbar\">");
    if let Some(language) = block.language() {
        html.push_str(&format!(
            "<span class=\"code-block__language\">{}</span>",
            escape_text(language)
        ));
    }
    html.push_str(&format!(
        "<button type=\"button\" class=\"code-block__copy\" data-role=\"code-copy-button\" data-copy-target=\"{}\" data-reset-after-ms=\"{}\" aria-label=\"Copy code\">Copy</button>",
        escape_attribute(&target_id),
        COPY_RESET_WINDOW.as_millis()
    ));
    if block.is_runnable() {
        html.push_str(
            "<button type=\"button\" class=\"code-block__run\" data-role=\"code-run-button\" disabled aria-disabled=\"true\" title=\"Running snippets is not available yet\">Run</button>",
        );
    }
    html.push_str("</div>");

    html.push_str("<div class=\"code-block__body\">");
    if block.shows_line_numbers() {
        html.push_str(&format!(
            "<span class=\"code-block__gutter\" aria-hidden=\"true\">{}</span>",
            line_numbers(code)
        ));
    }
    html.push_str(&body);
    html.push_str("</div></figure>");

    html
}

fn line_numbers(code: &str) -> String {
    let count = code.lines().count().max(1);
    (1..=count)
        .map(|number| number.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
