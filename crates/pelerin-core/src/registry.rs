//! Static block registry.
//!
//! Maps every [`BlockType`] to the content a new block starts with, the
//! edit-form fields its editor shows, and whether its view needs the live
//! pilgrimage feed. The table is closed; adding a block type means adding a
//! variant and a row here.

use serde_json::Value;

use crate::models::{
    content::{
        Alignment, BannersContent, CardsContent, CtaContent, FeaturesContent, HeadingContent,
        HeroContent, ImageContent, PilgrimagesContent, TextContent,
    },
    BlockContent, BlockType,
};

/// Input widget for one editable field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    TextArea,
    /// Whole number; unparseable input falls back to the given value
    Number { fallback: u32 },
    /// Decimal in `[min, max]`; unparseable input falls back to the given value
    Decimal { fallback: f64, min: f64, max: f64 },
    Color,
    Url,
    Choice(&'static [&'static str]),
    Toggle,
    /// Nested records (cards, features, banners) edited as a JSON array
    List,
}

/// One field of a block's edit form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind }
    }

    /// Converts raw form input into the JSON value stored for this field.
    ///
    /// Never fails. Numbers that do not parse become the field's fallback,
    /// unknown choices become the first choice, malformed lists become empty.
    pub fn coerce(&self, raw: &str) -> Value {
        let trimmed = raw.trim();
        match self.kind {
            FieldKind::Text | FieldKind::TextArea | FieldKind::Color | FieldKind::Url => {
                Value::String(raw.to_string())
            }
            FieldKind::Number { fallback } => {
                Value::from(trimmed.parse::<u32>().unwrap_or(fallback))
            }
            FieldKind::Decimal { fallback, min, max } => {
                let parsed = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .unwrap_or(fallback);
                Value::from(parsed.clamp(min, max))
            }
            FieldKind::Choice(choices) => {
                let chosen = choices
                    .iter()
                    .find(|c| c.eq_ignore_ascii_case(trimmed))
                    .or_else(|| choices.first())
                    .copied()
                    .unwrap_or_default();
                Value::String(chosen.to_string())
            }
            FieldKind::Toggle => Value::Bool(matches!(
                trimmed.to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on" | "da"
            )),
            FieldKind::List => match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Array(items)) => Value::Array(items),
                _ => Value::Array(Vec::new()),
            },
        }
    }
}

/// Registry row for a block type.
#[derive(Debug)]
pub struct BlockSpec {
    pub block_type: BlockType,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    /// The view renders entries from the pilgrimage feed
    pub uses_feed: bool,
}

impl BlockSpec {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const ALIGN: FieldKind = FieldKind::Choice(Alignment::NAMES);

const HEADING_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("text", "Text", FieldKind::Text),
    FieldSpec::new("size", "Font size", FieldKind::Number { fallback: 24 }),
    FieldSpec::new("color", "Color", FieldKind::Color),
    FieldSpec::new("alignment", "Alignment", ALIGN),
];

const TEXT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("text", "Text", FieldKind::TextArea),
    FieldSpec::new("size", "Font size", FieldKind::Number { fallback: 16 }),
    FieldSpec::new("color", "Color", FieldKind::Color),
    FieldSpec::new("alignment", "Alignment", ALIGN),
];

const IMAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("url", "Image", FieldKind::Url),
    FieldSpec::new("alt", "Alternative text", FieldKind::Text),
    FieldSpec::new("width", "Width", FieldKind::Text),
    FieldSpec::new("caption", "Caption", FieldKind::Text),
    FieldSpec::new("rounded", "Rounded corners", FieldKind::Toggle),
];

const HERO_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", "Title", FieldKind::Text),
    FieldSpec::new("subtitle", "Subtitle", FieldKind::TextArea),
    FieldSpec::new("backgroundImage", "Background image", FieldKind::Url),
    FieldSpec::new("height", "Height", FieldKind::Number { fallback: 400 }),
    FieldSpec::new(
        "overlayOpacity",
        "Overlay opacity",
        FieldKind::Decimal {
            fallback: 0.4,
            min: 0.0,
            max: 1.0,
        },
    ),
    FieldSpec::new("buttonText", "Button text", FieldKind::Text),
    FieldSpec::new("buttonLink", "Button link", FieldKind::Url),
];

const CARDS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", "Title", FieldKind::Text),
    FieldSpec::new("columns", "Columns", FieldKind::Number { fallback: 3 }),
    FieldSpec::new("cards", "Cards", FieldKind::List),
    FieldSpec::new("fromFeed", "Use pilgrimage feed", FieldKind::Toggle),
];

const FEATURES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", "Title", FieldKind::Text),
    FieldSpec::new("features", "Features", FieldKind::List),
];

const BANNERS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("banners", "Banners", FieldKind::List),
    FieldSpec::new("autoplay", "Autoplay", FieldKind::Toggle),
];

const CTA_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", "Title", FieldKind::Text),
    FieldSpec::new("description", "Description", FieldKind::TextArea),
    FieldSpec::new("buttonText", "Button text", FieldKind::Text),
    FieldSpec::new("buttonLink", "Button link", FieldKind::Url),
    FieldSpec::new("backgroundColor", "Background color", FieldKind::Color),
    FieldSpec::new("textColor", "Text color", FieldKind::Color),
];

const PILGRIMAGES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", "Title", FieldKind::Text),
    FieldSpec::new("limit", "Number of pilgrimages", FieldKind::Number { fallback: 6 }),
    FieldSpec::new("featuredOnly", "Featured only", FieldKind::Toggle),
    FieldSpec::new("location", "Location", FieldKind::Text),
];

static REGISTRY: [BlockSpec; 9] = [
    BlockSpec {
        block_type: BlockType::Heading,
        label: "Heading",
        fields: HEADING_FIELDS,
        uses_feed: false,
    },
    BlockSpec {
        block_type: BlockType::Text,
        label: "Text",
        fields: TEXT_FIELDS,
        uses_feed: false,
    },
    BlockSpec {
        block_type: BlockType::Image,
        label: "Image",
        fields: IMAGE_FIELDS,
        uses_feed: false,
    },
    BlockSpec {
        block_type: BlockType::Hero,
        label: "Hero",
        fields: HERO_FIELDS,
        uses_feed: false,
    },
    BlockSpec {
        block_type: BlockType::Cards,
        label: "Cards",
        fields: CARDS_FIELDS,
        uses_feed: true,
    },
    BlockSpec {
        block_type: BlockType::Features,
        label: "Features",
        fields: FEATURES_FIELDS,
        uses_feed: false,
    },
    BlockSpec {
        block_type: BlockType::Banners,
        label: "Banners",
        fields: BANNERS_FIELDS,
        uses_feed: false,
    },
    BlockSpec {
        block_type: BlockType::Cta,
        label: "Call to action",
        fields: CTA_FIELDS,
        uses_feed: false,
    },
    BlockSpec {
        block_type: BlockType::Pilgrimages,
        label: "Pilgrimages",
        fields: PILGRIMAGES_FIELDS,
        uses_feed: true,
    },
];

/// Registry row for `block_type`.
pub fn spec(block_type: BlockType) -> &'static BlockSpec {
    // REGISTRY is ordered like BlockType::ALL.
    &REGISTRY[BlockType::ALL
        .iter()
        .position(|t| *t == block_type)
        .unwrap_or_default()]
}

/// Every registry row, in menu order.
pub fn all() -> &'static [BlockSpec] {
    &REGISTRY
}

/// Content a newly inserted block of `block_type` starts with.
pub fn default_content(block_type: BlockType) -> BlockContent {
    match block_type {
        BlockType::Heading => BlockContent::Heading(HeadingContent::default()),
        BlockType::Text => BlockContent::Text(TextContent::default()),
        BlockType::Image => BlockContent::Image(ImageContent::default()),
        BlockType::Hero => BlockContent::Hero(HeroContent::default()),
        BlockType::Cards => BlockContent::Cards(CardsContent::default()),
        BlockType::Features => BlockContent::Features(FeaturesContent::default()),
        BlockType::Banners => BlockContent::Banners(BannersContent::default()),
        BlockType::Cta => BlockContent::Cta(CtaContent::default()),
        BlockType::Pilgrimages => BlockContent::Pilgrimages(PilgrimagesContent::default()),
    }
}
