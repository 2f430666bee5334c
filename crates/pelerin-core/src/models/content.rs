//! Typed content records, one per block type.
//!
//! Field-level serde defaults are the edit-form fallbacks: a stored block
//! missing `size` comes back as 24 for a heading or 16 for a text block, so
//! every editor is seeded with a complete shape. The `Default` impls are the
//! content a freshly inserted block starts with.
//!
//! Each record keeps the keys it does not model in `extra`, so editing a
//! page never strips fields written by another client.

use std::{fmt::Display, str::FromStr};

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub const NAMES: &'static [&'static str] = &["left", "center", "right"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

fn black() -> String {
    "#000000".to_string()
}

fn white() -> String {
    "#ffffff".to_string()
}

fn heading_size() -> u32 {
    24
}

fn text_size() -> u32 {
    16
}

fn hero_height() -> u32 {
    400
}

fn hero_overlay() -> f64 {
    0.4
}

fn full_width() -> String {
    "100%".to_string()
}

fn three() -> u32 {
    3
}

fn feed_limit() -> u32 {
    6
}

fn accent() -> String {
    "#8b5a2b".to_string()
}

/// Accepts a scalar either as itself or spelled as a string, as older pages
/// stored form input such as `"size": "32"`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<V> {
        Typed(V),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Typed(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(D::Error::custom),
    }
}

/// Content of a `heading` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingContent {
    #[serde(default)]
    pub text: String,
    /// Font size in pixels
    #[serde(default = "heading_size", deserialize_with = "lenient")]
    pub size: u32,
    #[serde(default = "black")]
    pub color: String,
    #[serde(default)]
    pub alignment: Alignment,
    /// Keys this build does not model, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HeadingContent {
    fn default() -> Self {
        Self {
            text: "Titlu Nou".to_string(),
            size: 32,
            color: black(),
            alignment: Alignment::Left,
            extra: Map::new(),
        }
    }
}

/// Content of a `text` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub text: String,
    #[serde(default = "text_size", deserialize_with = "lenient")]
    pub size: u32,
    #[serde(default = "black")]
    pub color: String,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: "Text nou. Apăsați pentru a edita.".to_string(),
            size: 16,
            color: black(),
            alignment: Alignment::Left,
            extra: Map::new(),
        }
    }
}

/// Content of an `image` block. `url` comes from the upload collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default = "full_width")]
    pub width: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rounded: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ImageContent {
    fn default() -> Self {
        Self {
            url: String::new(),
            alt: "Imagine".to_string(),
            width: full_width(),
            caption: None,
            rounded: false,
            extra: Map::new(),
        }
    }
}

/// Content of a `hero` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub background_image: String,
    /// Height in pixels
    #[serde(default = "hero_height", deserialize_with = "lenient")]
    pub height: u32,
    /// Darkening overlay between 0.0 and 1.0
    #[serde(default = "hero_overlay", deserialize_with = "lenient")]
    pub overlay_opacity: f64,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub button_link: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HeroContent {
    fn default() -> Self {
        Self {
            title: "Pelerinaje la locuri sfinte".to_string(),
            subtitle: "Descoperă mănăstirile și drumurile credinței".to_string(),
            background_image: String::new(),
            height: 400,
            overlay_opacity: 0.4,
            button_text: "Vezi pelerinajele".to_string(),
            button_link: "/pelerinaje".to_string(),
            extra: Map::new(),
        }
    }
}

/// One card of a `cards` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Content of a `cards` block.
///
/// With `fromFeed` set, cards are built from the pilgrimage feed at render
/// time instead of from `cards`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsContent {
    #[serde(default)]
    pub title: String,
    #[serde(default = "three", deserialize_with = "lenient")]
    pub columns: u32,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default, deserialize_with = "lenient")]
    pub from_feed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CardsContent {
    fn default() -> Self {
        let card = |n: u32| Card {
            title: format!("Card {n}"),
            description: "Descriere scurtă".to_string(),
            image: String::new(),
            link: String::new(),
            extra: Map::new(),
        };
        Self {
            title: "Destinații".to_string(),
            columns: 3,
            cards: vec![card(1), card(2), card(3)],
            from_feed: false,
            extra: Map::new(),
        }
    }
}

/// One entry of a `features` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Content of a `features` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FeaturesContent {
    fn default() -> Self {
        let feature = |icon: &str, title: &str, description: &str| Feature {
            icon: icon.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            extra: Map::new(),
        };
        Self {
            title: "De ce să călătorești cu noi".to_string(),
            features: vec![
                feature("bus", "Transport inclus", "Autocar modern pe tot traseul"),
                feature("church", "Ghid spiritual", "Însoțitor preot la fiecare grup"),
                feature("bed", "Cazare la mănăstiri", "Arhondaricuri și pensiuni verificate"),
            ],
            extra: Map::new(),
        }
    }
}

/// One slide of a `banners` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Content of a `banners` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannersContent {
    #[serde(default)]
    pub banners: Vec<Banner>,
    #[serde(default, deserialize_with = "lenient")]
    pub autoplay: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for BannersContent {
    fn default() -> Self {
        Self {
            banners: vec![Banner {
                title: "Banner nou".to_string(),
                subtitle: String::new(),
                image: String::new(),
                link: String::new(),
                extra: Map::new(),
            }],
            autoplay: true,
            extra: Map::new(),
        }
    }
}

/// Content of a `cta` (call to action) block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub button_link: String,
    #[serde(default = "accent")]
    pub background_color: String,
    #[serde(default = "white")]
    pub text_color: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CtaContent {
    fn default() -> Self {
        Self {
            title: "Rezervă-ți locul".to_string(),
            description: "Locurile sunt limitate.".to_string(),
            button_text: "Rezervă acum".to_string(),
            button_link: "/pelerinaje".to_string(),
            background_color: accent(),
            text_color: white(),
            extra: Map::new(),
        }
    }
}

/// Content of a `pilgrimages` block. The listing itself is fetched from the
/// pilgrimage feed at render time and never stored inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PilgrimagesContent {
    #[serde(default)]
    pub title: String,
    #[serde(default = "feed_limit", deserialize_with = "lenient")]
    pub limit: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub featured_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PilgrimagesContent {
    fn default() -> Self {
        Self {
            title: "Pelerinaje disponibile".to_string(),
            limit: 6,
            featured_only: false,
            location: None,
            extra: Map::new(),
        }
    }
}
