//! Renderers for `block` nodes.

mod callout;
mod code;
mod columns;
mod embed;

use metrics::counter;
use tracing::{debug, warn};

use crate::domain::blocks::Block;

use super::dispatch::{Dispatcher, RenderKey};

/// Embed frame height used when a block carries none.
pub const DEFAULT_EMBED_HEIGHT: u32 = 400;

/// Render-time defaults for block payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockDefaults {
    pub(crate) embed_height: u32,
}

impl Default for BlockDefaults {
    fn default() -> Self {
        Self {
            embed_height: DEFAULT_EMBED_HEIGHT,
        }
    }
}

pub(crate) fn render_block(dispatcher: &Dispatcher<'_>, block: &Block, key: &RenderKey) -> String {
    match block {
        Block::CodePlayground(code) => code::render_code_block(dispatcher, code, key),
        Block::Callout(callout) => callout::render_callout(dispatcher, callout, key),
        Block::Embed(embed) => embed::render_embed(dispatcher, embed),
        Block::TwoColumn(columns) => columns::render_two_column(dispatcher, columns, key),
        Block::Unsupported { block_type } => {
            counter!("folio_block_skipped_total", "reason" => "unsupported").increment(1);
            debug!(
                target = "application::render::blocks",
                slug = dispatcher.slug,
                key = %key,
                block_type = block_type.as_deref().unwrap_or("<missing>"),
                "skipping unsupported block"
            );
            String::new()
        }
        Block::Malformed {
            block_type,
            message,
        } => {
            counter!("folio_block_skipped_total", "reason" => "malformed").increment(1);
            warn!(
                target = "application::render::blocks",
                slug = dispatcher.slug,
                key = %key,
                block_type = *block_type,
                error = %message,
                "skipping malformed block"
            );
            String::new()
        }
    }
}
