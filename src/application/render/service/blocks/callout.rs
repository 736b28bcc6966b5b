use crate::domain::blocks::CalloutBlock;

use super::super::dispatch::{Dispatcher, RenderKey};
use super::super::html::escape_text;

pub(super) fn render_callout(
    dispatcher: &Dispatcher<'_>,
    block: &CalloutBlock,
    key: &RenderKey,
) -> String {
    let kind = block.kind.as_str();
    let title = block.title().unwrap_or_else(|| block.kind.label());
    let body = dispatcher.render_nested(&block.content, key);

    format!(
        "<aside class=\"callout callout--{kind}\" data-role=\"callout\" data-callout=\"{kind}\" role=\"note\">\
<div class=\"callout__header\"><span class=\"callout__icon\" aria-hidden=\"true\">{icon}</span>\
<strong class=\"callout__title\">{title}</strong></div>\
<div class=\"callout__body\">{body}</div></aside>",
        icon = block.kind.icon(),
        title = escape_text(title),
    )
}
