//! Parameter structures shared by every interface.
//!
//! The CLI wraps these in clap argument structs and converts with `From`; the
//! MCP server deserializes them directly (with the `schema` feature providing
//! their JSON schema). Keeping them free of interface derives lets both
//! surfaces call the same [`crate::Site`] methods.
//!
//! Section commands carry an optional `expected_version`. When present the
//! save is rejected with [`crate::SiteError::VersionConflict`] if the page
//! changed since that version was read; when absent the command applies to
//! whatever version it loads.

use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{Result, SiteError},
    models::PilgrimageFilter,
    sections::Direction,
};

/// Parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreatePage {
    /// Page title
    pub title: String,
    /// URL slug; derived from the title when omitted
    pub slug: Option<String>,
}

/// Parameters for renaming a page or changing its slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RenamePage {
    pub id: u64,
    pub title: Option<String>,
    pub slug: Option<String>,
}

/// Parameters for adding a section to a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddSection {
    pub page_id: u64,
    /// Block type: heading, text, image, hero, cards, features, banners,
    /// cta or pilgrimages
    pub block_type: String,
    /// Zero-based insert position; appends when omitted or past the end
    pub position: Option<usize>,
    pub expected_version: Option<u64>,
}

/// Parameters addressing one section of a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SectionRef {
    pub page_id: u64,
    pub section_id: String,
    pub expected_version: Option<u64>,
}

/// Single-step move direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    #[default]
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

/// Parameters for moving a section one position up or down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StepSection {
    pub page_id: u64,
    pub section_id: String,
    pub direction: MoveDirection,
    pub expected_version: Option<u64>,
}

/// Parameters for moving a section to an index in one step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ReorderSection {
    pub page_id: u64,
    pub section_id: String,
    /// Zero-based target index, clamped to the last position
    pub target_index: usize,
    pub expected_version: Option<u64>,
}

/// One form field assignment, e.g. `size=32`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct FieldValue {
    pub name: String,
    /// Raw input, coerced through the field's registry definition
    pub value: String,
}

impl std::str::FromStr for FieldValue {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing field name in '{s}'"));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Parameters for replacing a section's content.
///
/// `content` replaces the whole record; `fields` are then applied one by one
/// the way the edit form applies them. At least one of the two is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateSectionContent {
    pub page_id: u64,
    pub section_id: String,
    pub content: Option<Value>,
    #[serde(default)]
    pub fields: Vec<FieldValue>,
    pub expected_version: Option<u64>,
}

/// Parameters for merging style overrides into a section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateSectionStyles {
    pub page_id: u64,
    pub section_id: String,
    /// Properties to set; a null value removes the property
    pub styles: Map<String, Value>,
    pub expected_version: Option<u64>,
}

/// Parameters for attaching an uploaded image to a section. The file
/// bytes travel separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UploadImage {
    pub page_id: u64,
    pub section_id: String,
    /// Original file name; its extension decides the stored type
    pub file_name: String,
    pub expected_version: Option<u64>,
}

/// Parameters for writing a CMS entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetCms {
    pub key: String,
    pub value: String,
    /// text, html or image; defaults to text
    pub content_type: Option<String>,
    pub description: Option<String>,
}

/// Parameters addressing a CMS entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CmsKey {
    pub key: String,
}

/// Parameters for listing CMS entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListCms {
    /// Only keys starting with this prefix
    pub prefix: Option<String>,
}

/// Parameters for adding a pilgrimage to the catalogue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddPilgrimage {
    pub title: String,
    pub location: String,
    /// First day, YYYY-MM-DD
    pub start_date: String,
    /// Last day, YYYY-MM-DD
    pub end_date: String,
    pub price: u32,
    /// Defaults to RON
    pub currency: Option<String>,
    pub capacity: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub images: Vec<String>,
}

impl AddPilgrimage {
    /// Parsed `(start, end)` dates; the end must not precede the start.
    pub fn dates(&self) -> Result<(Date, Date)> {
        let start = parse_date("start_date", &self.start_date)?;
        let end = parse_date("end_date", &self.end_date)?;
        if end < start {
            return Err(SiteError::invalid_input("end_date")
                .with_reason(format!("{end} is before the start date {start}")));
        }
        Ok((start, end))
    }
}

/// Parameters for listing pilgrimages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListPilgrimages {
    /// Case-insensitive location substring
    pub location: Option<String>,
    pub max_price: Option<u32>,
    /// Only pilgrimages starting on or after this date (YYYY-MM-DD)
    pub starts_after: Option<String>,
    #[serde(default)]
    pub featured_only: bool,
    #[serde(default)]
    pub available_only: bool,
    pub limit: Option<u32>,
}

impl ListPilgrimages {
    pub fn to_filter(&self) -> Result<PilgrimageFilter> {
        Ok(PilgrimageFilter {
            location: self.location.clone(),
            max_price: self.max_price,
            starts_after: self
                .starts_after
                .as_deref()
                .map(|d| parse_date("starts_after", d))
                .transpose()?,
            featured_only: self.featured_only,
            available_only: self.available_only,
            limit: self.limit,
        })
    }
}

/// Parameters for creating a builder page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateBuilderPage {
    pub title: String,
    pub slug: Option<String>,
}

/// Parameters for adding a named section to a builder page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddBuilderSection {
    pub page_id: u64,
    pub name: String,
    pub position: Option<usize>,
}

/// Parameters for adding a component to a builder section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddComponent {
    pub page_id: u64,
    pub section_id: String,
    /// heading, text, image, spacer, button or cms
    pub component_type: String,
    pub position: Option<usize>,
    /// Initial content; the type's defaults when omitted
    pub content: Option<Value>,
}

fn parse_date(field: &str, raw: &str) -> Result<Date> {
    raw.trim().parse::<Date>().map_err(|e| {
        SiteError::invalid_input(field).with_reason(format!("'{raw}' is not a YYYY-MM-DD date: {e}"))
    })
}
