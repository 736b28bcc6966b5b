//! Rich-text document tree as authored in the content system.
//!
//! The stored shape is Lexical JSON: a `root` object whose `children` are
//! nodes discriminated by `type`. Conversion from JSON is total. Unknown node
//! kinds survive as [`DocumentNode::Unknown`] so they can render as plain
//! containers, and missing fields fall back to empty values.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::blocks::Block;
use super::format::TextFormat;

/// A complete document. `children` is `None` when the stored value had no
/// `root` or the root had no `children` list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    children: Option<Vec<DocumentNode>>,
}

impl Document {
    pub fn absent() -> Self {
        Self { children: None }
    }

    /// Accepts `{ "root": { "children": [...] } }` or a bare root node.
    pub fn from_json(value: &Value) -> Self {
        let root = match value.get("root") {
            Some(root) => root,
            None if node_kind(value) == Some("root") => value,
            None => return Self::absent(),
        };

        let children = root
            .get("children")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(DocumentNode::from_json).collect());

        Self { children }
    }

    pub fn children(&self) -> &[DocumentNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// True for absent documents and for roots without children.
    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Document::from_json(&value))
    }
}

/// Heading depth, always within `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    /// Clamp any requested depth into the supported range.
    pub fn clamped(requested: i64) -> Self {
        Self(requested.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    /// Reads `2` as well as the Lexical `"h2"` form. Unparseable tags are level 1.
    pub fn from_tag(tag: Option<&Value>) -> Self {
        let requested = match tag {
            Some(Value::Number(number)) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value as i64)),
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                let digits = trimmed
                    .strip_prefix('h')
                    .or_else(|| trimmed.strip_prefix('H'))
                    .unwrap_or(trimmed);
                digits.parse::<i64>().ok()
            }
            _ => None,
        };

        Self::clamped(requested.unwrap_or(i64::from(Self::MIN)))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn tag_name(self) -> &'static str {
        match self.0 {
            1 => "h1",
            2 => "h2",
            3 => "h3",
            _ => "h4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Numbered { start: Option<u32> },
    Bullet,
}

impl ListKind {
    fn from_object(object: &Map<String, Value>) -> Self {
        let start = object
            .get("start")
            .and_then(Value::as_u64)
            .and_then(|value| u32::try_from(value).ok())
            .filter(|value| *value != 1);

        match object.get("listType").and_then(Value::as_str) {
            Some("number") => ListKind::Numbered { start },
            Some(_) => ListKind::Bullet,
            None => match object.get("tag").and_then(Value::as_str) {
                Some("ol") => ListKind::Numbered { start },
                _ => ListKind::Bullet,
            },
        }
    }

    pub fn tag_name(self) -> &'static str {
        match self {
            ListKind::Numbered { .. } => "ol",
            ListKind::Bullet => "ul",
        }
    }
}

/// Anchor target of a `link` node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub url: Option<String>,
    pub new_tab: bool,
}

impl Link {
    /// Payload stores link attributes under `fields`; plain Lexical keeps them
    /// on the node. Both are accepted, `fields` wins.
    fn from_object(object: &Map<String, Value>) -> Self {
        let fields = object.get("fields").and_then(Value::as_object);
        let lookup = |key: &str| {
            fields
                .and_then(|fields| fields.get(key))
                .or_else(|| object.get(key))
        };

        let url = lookup("url")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        let new_tab = lookup("newTab").and_then(Value::as_bool).unwrap_or(false);

        Self { url, new_tab }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub format: TextFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Root { children: Vec<DocumentNode> },
    Paragraph { children: Vec<DocumentNode> },
    Heading {
        level: HeadingLevel,
        children: Vec<DocumentNode>,
    },
    Quote { children: Vec<DocumentNode> },
    List {
        kind: ListKind,
        children: Vec<DocumentNode>,
    },
    ListItem { children: Vec<DocumentNode> },
    Link {
        link: Link,
        children: Vec<DocumentNode>,
    },
    Text(TextRun),
    LineBreak,
    HorizontalRule,
    Block(Block),
    /// Any node kind this renderer does not know; only its children render.
    Unknown {
        kind: Option<String>,
        children: Vec<DocumentNode>,
    },
}

impl DocumentNode {
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return DocumentNode::Unknown {
                kind: None,
                children: Vec::new(),
            };
        };

        let children = || parse_children(object);

        match node_kind(value) {
            Some("root") => DocumentNode::Root {
                children: children(),
            },
            Some("paragraph") => DocumentNode::Paragraph {
                children: children(),
            },
            Some("heading") => DocumentNode::Heading {
                level: HeadingLevel::from_tag(object.get("tag")),
                children: children(),
            },
            Some("quote") => DocumentNode::Quote {
                children: children(),
            },
            Some("list") => DocumentNode::List {
                kind: ListKind::from_object(object),
                children: children(),
            },
            Some("listitem") => DocumentNode::ListItem {
                children: children(),
            },
            Some("link") | Some("autolink") => DocumentNode::Link {
                link: Link::from_object(object),
                children: children(),
            },
            Some("text") => DocumentNode::Text(TextRun {
                text: object
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                format: object
                    .get("format")
                    .map(TextFormat::from_json)
                    .unwrap_or_default(),
            }),
            Some("linebreak") => DocumentNode::LineBreak,
            Some("horizontalrule") => DocumentNode::HorizontalRule,
            Some("block") => DocumentNode::Block(Block::from_fields(object.get("fields"))),
            other => DocumentNode::Unknown {
                kind: other.map(str::to_string),
                children: children(),
            },
        }
    }

    /// Child nodes for container kinds; leaves and blocks have none.
    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Root { children }
            | DocumentNode::Paragraph { children }
            | DocumentNode::Heading { children, .. }
            | DocumentNode::Quote { children }
            | DocumentNode::List { children, .. }
            | DocumentNode::ListItem { children }
            | DocumentNode::Link { children, .. }
            | DocumentNode::Unknown { children, .. } => children,
            DocumentNode::Text(_)
            | DocumentNode::LineBreak
            | DocumentNode::HorizontalRule
            | DocumentNode::Block(_) => &[],
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        let mut buffer = String::new();
        collect_text(self, &mut buffer);
        buffer
    }
}

impl<'de> Deserialize<'de> for DocumentNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(DocumentNode::from_json(&value))
    }
}

fn node_kind(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

fn parse_children(object: &Map<String, Value>) -> Vec<DocumentNode> {
    object
        .get("children")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(DocumentNode::from_json).collect())
        .unwrap_or_default()
}

fn collect_text(node: &DocumentNode, buffer: &mut String) {
    match node {
        DocumentNode::Text(run) => buffer.push_str(&run.text),
        DocumentNode::LineBreak => buffer.push(' '),
        other => {
            for child in other.children() {
                collect_text(child, buffer);
            }
        }
    }
}
