//! Text formatting bitmask carried by `text` nodes.

use serde::{Deserialize, Deserializer};

/// Decoded style flags for a text run.
///
/// Each flag maps to one bit of the stored bitmask; flags combine freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextFormat {
    bits: u32,
}

impl TextFormat {
    pub const BOLD: u32 = 1 << 0;
    pub const ITALIC: u32 = 1 << 1;
    pub const UNDERLINE: u32 = 1 << 3;
    pub const STRIKETHROUGH: u32 = 1 << 4;

    const KNOWN: u32 = Self::BOLD | Self::ITALIC | Self::UNDERLINE | Self::STRIKETHROUGH;

    /// Decode a raw bitmask. Bits without a style meaning are dropped.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            bits: bits & Self::KNOWN,
        }
    }

    pub fn plain() -> Self {
        Self::default()
    }

    pub fn is_plain(self) -> bool {
        self.bits == 0
    }

    pub fn bold(self) -> bool {
        self.bits & Self::BOLD != 0
    }

    pub fn italic(self) -> bool {
        self.bits & Self::ITALIC != 0
    }

    pub fn underline(self) -> bool {
        self.bits & Self::UNDERLINE != 0
    }

    pub fn strikethrough(self) -> bool {
        self.bits & Self::STRIKETHROUGH != 0
    }

    /// HTML elements to wrap the text in, outermost first.
    pub fn wrapping_tags(self) -> impl Iterator<Item = &'static str> {
        [
            (self.bold(), "strong"),
            (self.italic(), "em"),
            (self.underline(), "u"),
            (self.strikethrough(), "s"),
        ]
        .into_iter()
        .filter_map(|(enabled, tag)| enabled.then_some(tag))
    }
}

impl From<u32> for TextFormat {
    fn from(bits: u32) -> Self {
        Self::from_bits(bits)
    }
}

impl<'de> Deserialize<'de> for TextFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(TextFormat::from_json(&value))
    }
}

impl TextFormat {
    /// Lenient conversion: anything that is not a non-negative integer is plain.
    pub fn from_json(value: &serde_json::Value) -> Self {
        value
            .as_u64()
            .and_then(|bits| u32::try_from(bits).ok())
            .map(TextFormat::from_bits)
            .unwrap_or_default()
    }
}
