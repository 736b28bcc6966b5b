//! Payloads of `block` nodes, selected by the `blockType` discriminant.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use super::document::Document;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    CodePlayground(CodePlaygroundBlock),
    Callout(CalloutBlock),
    Embed(EmbedBlock),
    TwoColumn(TwoColumnBlock),
    /// `blockType` missing or not one this renderer knows.
    Unsupported { block_type: Option<String> },
    /// Known `blockType` whose fields could not be decoded.
    Malformed {
        block_type: &'static str,
        message: String,
    },
}

impl Block {
    pub const CODE_PLAYGROUND: &'static str = "codePlayground";
    pub const CALLOUT: &'static str = "callout";
    pub const EMBED: &'static str = "embed";
    pub const TWO_COLUMN: &'static str = "twoColumn";

    pub fn from_fields(fields: Option<&Value>) -> Self {
        let Some(fields) = fields.filter(|fields| fields.is_object()) else {
            return Block::Unsupported { block_type: None };
        };

        match fields.get("blockType").and_then(Value::as_str) {
            Some(Self::CODE_PLAYGROUND) => {
                decode(fields, Self::CODE_PLAYGROUND, Block::CodePlayground)
            }
            Some(Self::CALLOUT) => decode(fields, Self::CALLOUT, Block::Callout),
            Some(Self::EMBED) => decode(fields, Self::EMBED, Block::Embed),
            Some(Self::TWO_COLUMN) => decode(fields, Self::TWO_COLUMN, Block::TwoColumn),
            other => Block::Unsupported {
                block_type: other.map(str::to_string),
            },
        }
    }
}

fn decode<T>(fields: &Value, block_type: &'static str, wrap: fn(T) -> Block) -> Block
where
    T: DeserializeOwned,
{
    match T::deserialize(fields) {
        Ok(payload) => wrap(payload),
        Err(err) => Block::Malformed {
            block_type,
            message: err.to_string(),
        },
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodePlaygroundBlock {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub runnable: Option<bool>,
    #[serde(default)]
    pub show_line_numbers: Option<bool>,
}

impl CodePlaygroundBlock {
    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or_default()
    }

    pub fn language(&self) -> Option<&str> {
        non_blank(self.language.as_deref())
    }

    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    pub fn is_runnable(&self) -> bool {
        self.runnable.unwrap_or(false)
    }

    pub fn shows_line_numbers(&self) -> bool {
        self.show_line_numbers.unwrap_or(false)
    }
}

/// Severity of a callout panel. Unrecognized values read as `Info`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CalloutKind {
    #[default]
    Info,
    Warning,
    Error,
    Success,
    Tip,
}

impl CalloutKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "warning" => CalloutKind::Warning,
            "error" => CalloutKind::Error,
            "success" => CalloutKind::Success,
            "tip" => CalloutKind::Tip,
            _ => CalloutKind::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CalloutKind::Info => "info",
            CalloutKind::Warning => "warning",
            CalloutKind::Error => "error",
            CalloutKind::Success => "success",
            CalloutKind::Tip => "tip",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CalloutKind::Info => "Note",
            CalloutKind::Warning => "Warning",
            CalloutKind::Error => "Error",
            CalloutKind::Success => "Success",
            CalloutKind::Tip => "Tip",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CalloutKind::Info => "ℹ",
            CalloutKind::Warning => "⚠",
            CalloutKind::Error => "✖",
            CalloutKind::Success => "✔",
            CalloutKind::Tip => "★",
        }
    }
}

impl<'de> Deserialize<'de> for CalloutKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(CalloutKind::from_tag)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalloutBlock {
    #[serde(default, rename = "type")]
    pub kind: CalloutKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Document,
}

impl CalloutBlock {
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }
}

/// Embeddable content provider. Unrecognized providers are treated as
/// `Custom`, whose URL is embedded unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EmbedProvider {
    Youtube,
    Codepen,
    Jsfiddle,
    Replit,
    Gist,
    Twitter,
    #[default]
    Custom,
}

impl EmbedProvider {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "youtube" => EmbedProvider::Youtube,
            "codepen" => EmbedProvider::Codepen,
            "jsfiddle" => EmbedProvider::Jsfiddle,
            "replit" => EmbedProvider::Replit,
            "gist" => EmbedProvider::Gist,
            "twitter" => EmbedProvider::Twitter,
            _ => EmbedProvider::Custom,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmbedProvider::Youtube => "youtube",
            EmbedProvider::Codepen => "codepen",
            EmbedProvider::Jsfiddle => "jsfiddle",
            EmbedProvider::Replit => "replit",
            EmbedProvider::Gist => "gist",
            EmbedProvider::Twitter => "twitter",
            EmbedProvider::Custom => "custom",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EmbedProvider::Youtube => "YouTube",
            EmbedProvider::Codepen => "CodePen",
            EmbedProvider::Jsfiddle => "JSFiddle",
            EmbedProvider::Replit => "Replit",
            EmbedProvider::Gist => "GitHub Gist",
            EmbedProvider::Twitter => "Twitter",
            EmbedProvider::Custom => "Embedded content",
        }
    }
}

impl<'de> Deserialize<'de> for EmbedProvider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(EmbedProvider::from_tag)
            .unwrap_or_default())
    }
}

/// Frame dimension: plain pixels or a CSS length such as `100%`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedDimension {
    Pixels(u32),
    Css(String),
}

impl EmbedDimension {
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number
                .as_f64()
                .filter(|pixels| pixels.is_finite() && *pixels > 0.0)
                .map(|pixels| EmbedDimension::Pixels(pixels.round().min(f64::from(u32::MAX)) as u32)),
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else if let Ok(pixels) = trimmed.parse::<u32>() {
                    (pixels > 0).then_some(EmbedDimension::Pixels(pixels))
                } else {
                    Some(EmbedDimension::Css(trimmed.to_string()))
                }
            }
            _ => None,
        }
    }

    pub fn to_attribute(&self) -> String {
        match self {
            EmbedDimension::Pixels(pixels) => pixels.to_string(),
            EmbedDimension::Css(css) => css.clone(),
        }
    }
}

fn lenient_dimension<'de, D>(deserializer: D) -> Result<Option<EmbedDimension>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(EmbedDimension::from_json(&value))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmbedBlock {
    #[serde(default)]
    pub provider: EmbedProvider,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub width: Option<EmbedDimension>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub height: Option<EmbedDimension>,
}

impl EmbedBlock {
    pub fn url(&self) -> &str {
        self.url.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoColumnBlock {
    #[serde(default)]
    pub left_column: Document,
    #[serde(default)]
    pub right_column: Document,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_or_missing_block_type_is_unsupported() {
        assert_eq!(
            Block::from_fields(Some(&json!({ "blockType": "unknownType" }))),
            Block::Unsupported {
                block_type: Some("unknownType".to_string())
            }
        );
        assert_eq!(
            Block::from_fields(Some(&json!({ "code": "x" }))),
            Block::Unsupported { block_type: None }
        );
        assert_eq!(
            Block::from_fields(None),
            Block::Unsupported { block_type: None }
        );
    }

    #[test]
    fn wrongly_typed_known_payload_is_malformed() {
        let block = Block::from_fields(Some(&json!({ "blockType": "codePlayground", "code": 42 })));
        assert!(matches!(
            block,
            Block::Malformed {
                block_type: "codePlayground",
                ..
            }
        ));
    }

    #[test]
    fn code_playground_tolerates_nulls() {
        let block = Block::from_fields(Some(&json!({
            "blockType": "codePlayground",
            "code": "fn main() {}",
            "language": "rust",
            "title": null,
            "runnable": null,
            "showLineNumbers": true
        })));

        let Block::CodePlayground(code) = block else {
            panic!("expected code playground");
        };
        assert_eq!(code.code(), "fn main() {}");
        assert_eq!(code.language(), Some("rust"));
        assert_eq!(code.title(), None);
        assert!(!code.is_runnable());
        assert!(code.shows_line_numbers());
    }

    #[test]
    fn callout_severity_defaults_to_info() {
        let block = Block::from_fields(Some(&json!({
            "blockType": "callout",
            "type": "catastrophe",
            "content": { "root": { "children": [] } }
        })));
        let Block::Callout(callout) = block else {
            panic!("expected callout");
        };
        assert_eq!(callout.kind, CalloutKind::Info);

        let numeric = Block::from_fields(Some(&json!({ "blockType": "callout", "type": 3 })));
        let Block::Callout(callout) = numeric else {
            panic!("expected callout");
        };
        assert_eq!(callout.kind, CalloutKind::Info);
        assert!(callout.content.is_empty());
    }

    #[test]
    fn embed_dimensions_accept_numbers_and_css() {
        assert_eq!(
            EmbedDimension::from_json(&json!(640)),
            Some(EmbedDimension::Pixels(640))
        );
        assert_eq!(
            EmbedDimension::from_json(&json!("480")),
            Some(EmbedDimension::Pixels(480))
        );
        assert_eq!(
            EmbedDimension::from_json(&json!("100%")),
            Some(EmbedDimension::Css("100%".to_string()))
        );
        assert_eq!(EmbedDimension::from_json(&json!(0)), None);
        assert_eq!(EmbedDimension::from_json(&json!(true)), None);
    }

    #[test]
    fn embed_provider_is_case_insensitive() {
        let block = Block::from_fields(Some(&json!({
            "blockType": "embed",
            "provider": "YouTube",
            "url": " https://youtu.be/abc ",
            "height": 315
        })));
        let Block::Embed(embed) = block else {
            panic!("expected embed");
        };
        assert_eq!(embed.provider, EmbedProvider::Youtube);
        assert_eq!(embed.url(), "https://youtu.be/abc");
        assert_eq!(embed.height, Some(EmbedDimension::Pixels(315)));
        assert_eq!(embed.width, None);
    }
}
