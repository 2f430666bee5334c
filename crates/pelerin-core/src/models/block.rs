//! Content block model: identifiers, type tags and the tagged content union.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{
    content::{
        BannersContent, CardsContent, CtaContent, FeaturesContent, HeadingContent, HeroContent,
        ImageContent, PilgrimagesContent, TextContent,
    },
    StyleMap,
};
use crate::error::{Result, SiteError};

/// Opaque identifier of a block, unique within its section list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Closed set of block type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Heading,
    Text,
    Image,
    Hero,
    Cards,
    Features,
    Banners,
    Cta,
    Pilgrimages,
}

impl BlockType {
    /// Every block type, in the order the add-block menu lists them.
    pub const ALL: [BlockType; 9] = [
        BlockType::Heading,
        BlockType::Text,
        BlockType::Image,
        BlockType::Hero,
        BlockType::Cards,
        BlockType::Features,
        BlockType::Banners,
        BlockType::Cta,
        BlockType::Pilgrimages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Heading => "heading",
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Hero => "hero",
            BlockType::Cards => "cards",
            BlockType::Features => "features",
            BlockType::Banners => "banners",
            BlockType::Cta => "cta",
            BlockType::Pilgrimages => "pilgrimages",
        }
    }
}

impl FromStr for BlockType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Invalid block type: {s}"))
    }
}

/// Content payload of a block, one variant per block type.
///
/// `Unrecognized` carries a stored block whose type tag is unknown or whose
/// content does not match its type. It is kept verbatim so saving the page
/// does not lose it, and renders as a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Heading(HeadingContent),
    Text(TextContent),
    Image(ImageContent),
    Hero(HeroContent),
    Cards(CardsContent),
    Features(FeaturesContent),
    Banners(BannersContent),
    Cta(CtaContent),
    Pilgrimages(PilgrimagesContent),
    Unrecognized { kind: String, content: Value },
}

impl BlockContent {
    /// Type tag of the content, `None` for unrecognized blocks.
    pub fn block_type(&self) -> Option<BlockType> {
        Some(match self {
            BlockContent::Heading(_) => BlockType::Heading,
            BlockContent::Text(_) => BlockType::Text,
            BlockContent::Image(_) => BlockType::Image,
            BlockContent::Hero(_) => BlockType::Hero,
            BlockContent::Cards(_) => BlockType::Cards,
            BlockContent::Features(_) => BlockType::Features,
            BlockContent::Banners(_) => BlockType::Banners,
            BlockContent::Cta(_) => BlockType::Cta,
            BlockContent::Pilgrimages(_) => BlockType::Pilgrimages,
            BlockContent::Unrecognized { .. } => return None,
        })
    }

    /// Type tag as stored, including tags this build does not know.
    pub fn type_name(&self) -> &str {
        match self {
            BlockContent::Unrecognized { kind, .. } => kind,
            other => other.block_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }

    /// Parses stored content for a type tag.
    ///
    /// Never fails: an unknown tag or content that does not fit the tag
    /// yields [`BlockContent::Unrecognized`].
    pub fn from_parts(kind: &str, content: Value) -> Self {
        let Ok(block_type) = kind.parse::<BlockType>() else {
            return BlockContent::Unrecognized {
                kind: kind.to_string(),
                content,
            };
        };
        match Self::typed(block_type, content.clone()) {
            Ok(parsed) => parsed,
            Err(_) => BlockContent::Unrecognized {
                kind: kind.to_string(),
                content,
            },
        }
    }

    /// Parses content for a known type, failing when the shape is wrong.
    pub fn typed(block_type: BlockType, content: Value) -> Result<Self> {
        let content = match content {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Ok(match block_type {
            BlockType::Heading => BlockContent::Heading(serde_json::from_value(content)?),
            BlockType::Text => BlockContent::Text(serde_json::from_value(content)?),
            BlockType::Image => BlockContent::Image(serde_json::from_value(content)?),
            BlockType::Hero => BlockContent::Hero(serde_json::from_value(content)?),
            BlockType::Cards => BlockContent::Cards(serde_json::from_value(content)?),
            BlockType::Features => BlockContent::Features(serde_json::from_value(content)?),
            BlockType::Banners => BlockContent::Banners(serde_json::from_value(content)?),
            BlockType::Cta => BlockContent::Cta(serde_json::from_value(content)?),
            BlockType::Pilgrimages => {
                BlockContent::Pilgrimages(serde_json::from_value(content)?)
            }
        })
    }

    /// Serializes the payload (without type tag) to JSON.
    pub fn to_value(&self) -> Value {
        let value = match self {
            BlockContent::Heading(c) => serde_json::to_value(c),
            BlockContent::Text(c) => serde_json::to_value(c),
            BlockContent::Image(c) => serde_json::to_value(c),
            BlockContent::Hero(c) => serde_json::to_value(c),
            BlockContent::Cards(c) => serde_json::to_value(c),
            BlockContent::Features(c) => serde_json::to_value(c),
            BlockContent::Banners(c) => serde_json::to_value(c),
            BlockContent::Cta(c) => serde_json::to_value(c),
            BlockContent::Pilgrimages(c) => serde_json::to_value(c),
            BlockContent::Unrecognized { content, .. } => return content.clone(),
        };
        // Plain structs of strings, numbers and vecs always serialize.
        value.unwrap_or(Value::Null)
    }

    /// Returns a copy with one field replaced, re-validated against the
    /// content's type.
    pub fn with_field(&self, name: &str, value: Value) -> Result<Self> {
        let Some(block_type) = self.block_type() else {
            return Err(SiteError::invalid_input(name)
                .with_reason(format!("cannot edit unrecognized block '{}'", self.type_name())));
        };
        let mut object = match self.to_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        object.insert(name.to_string(), value);
        Self::typed(block_type, Value::Object(object))
            .map_err(|e| SiteError::invalid_input(name).with_reason(e.to_string()))
    }
}

/// One unit of page content.
///
/// The type of a block is fixed at construction; content updates must keep
/// the same type.
///
/// A block hydrated from storage remembers its content exactly as stored and
/// writes that back until the content is replaced, so saving a page leaves
/// untouched blocks byte for byte as they were.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "StoredBlock", from = "StoredBlock")]
pub struct ContentBlock {
    id: BlockId,
    content: BlockContent,
    styles: StyleMap,
    stored: Option<Value>,
}

impl PartialEq for ContentBlock {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.content == other.content && self.styles == other.styles
    }
}

impl ContentBlock {
    /// Creates a block with a freshly generated id and no style overrides.
    pub fn new(content: BlockContent) -> Self {
        Self::with_id(BlockId::generate(), content)
    }

    /// Creates a block with a known id, used when hydrating stored pages.
    pub fn with_id(id: impl Into<BlockId>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            content,
            styles: StyleMap::new(),
            stored: None,
        }
    }

    /// Builder-style setter for initial styles.
    pub fn styled(mut self, styles: StyleMap) -> Self {
        self.styles = styles;
        self
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.content.block_type()
    }

    pub fn type_name(&self) -> &str {
        self.content.type_name()
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }

    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }

    /// Copy of type, content and styles under a new id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: BlockId::generate(),
            content: self.content.clone(),
            styles: self.styles.clone(),
            stored: self.stored.clone(),
        }
    }

    /// Replaces the content if it has the same type tag. Returns whether the
    /// replacement happened.
    pub(crate) fn replace_content(&mut self, content: BlockContent) -> bool {
        if content.type_name() != self.content.type_name() {
            return false;
        }
        if content != self.content {
            self.content = content;
            self.stored = None;
        }
        true
    }

    pub(crate) fn merge_styles(&mut self, partial: &StyleMap) {
        self.styles.merge(partial);
    }
}

/// Persisted JSON shape of a block: `{id, type, content, styles}`.
#[derive(Serialize, Deserialize)]
struct StoredBlock {
    id: BlockId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    styles: StyleMap,
}

impl From<ContentBlock> for StoredBlock {
    fn from(block: ContentBlock) -> Self {
        Self {
            kind: block.type_name().to_string(),
            content: block.stored.unwrap_or_else(|| block.content.to_value()),
            id: block.id,
            styles: block.styles,
        }
    }
}

impl From<StoredBlock> for ContentBlock {
    fn from(stored: StoredBlock) -> Self {
        Self {
            content: BlockContent::from_parts(&stored.kind, stored.content.clone()),
            stored: Some(stored.content),
            id: stored.id,
            styles: stored.styles,
        }
    }
}
