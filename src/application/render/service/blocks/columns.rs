use crate::domain::blocks::TwoColumnBlock;

use super::super::dispatch::{Dispatcher, RenderKey};

/// Side-by-side layout. Each column renders its own document; an empty
/// column still emits its container so the grid keeps both tracks.
pub(super) fn render_two_column(
    dispatcher: &Dispatcher<'_>,
    block: &TwoColumnBlock,
    key: &RenderKey,
) -> String {
    let left = dispatcher.render_nested(&block.left_column, &key.scope("left"));
    let right = dispatcher.render_nested(&block.right_column, &key.scope("right"));

    format!(
        "<div class=\"two-column\" data-role=\"two-column\">\
<div class=\"two-column__column two-column__column--left\">{left}</div>\
<div class=\"two-column__column two-column__column--right\">{right}</div></div>"
    )
}
