//! Command-line argument wrappers using clap.
//!
//! Every command has an argument struct carrying the clap attributes and a
//! `From` conversion into the matching [`pelerin_core::params`] type, so the
//! core parameter types stay free of CLI concerns and are shared with the
//! MCP server:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Site
//! ```

use std::path::PathBuf;

use clap::{Args, Subcommand};
use pelerin_core::params::*;
use serde_json::{Map, Value};

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

// ============================================================================
// Pages
// ============================================================================

/// Create a new page
#[derive(Args)]
pub struct CreatePageArgs {
    /// Title of the page
    pub title: String,
    #[arg(short, long, help = "URL slug; derived from the title when omitted")]
    pub slug: Option<String>,
}

impl From<CreatePageArgs> for CreatePage {
    fn from(val: CreatePageArgs) -> Self {
        CreatePage {
            title: val.title,
            slug: val.slug,
        }
    }
}

/// Arguments naming a page by ID
#[derive(Args)]
pub struct PageIdArgs {
    #[arg(help = "Unique identifier of the page")]
    pub id: u64,
}

impl From<PageIdArgs> for Id {
    fn from(val: PageIdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Render a page to HTML as visitors see it
#[derive(Args)]
pub struct RenderPageArgs {
    #[arg(help = "Page ID or slug")]
    pub page: String,
}

/// Rename a page or change its slug
#[derive(Args)]
pub struct RenamePageArgs {
    #[arg(help = "Unique identifier of the page")]
    pub id: u64,
    #[arg(short, long, help = "New title")]
    pub title: Option<String>,
    #[arg(short, long, help = "New URL slug")]
    pub slug: Option<String>,
}

impl From<RenamePageArgs> for RenamePage {
    fn from(val: RenamePageArgs) -> Self {
        RenamePage {
            id: val.id,
            title: val.title,
            slug: val.slug,
        }
    }
}

#[derive(Subcommand)]
pub enum PageCommands {
    /// Create a new page
    #[command(alias = "c")]
    Create(CreatePageArgs),
    /// List all pages
    #[command(alias = "l")]
    List,
    /// Show a page and its sections
    #[command(alias = "s")]
    Show(PageIdArgs),
    /// Render a page to HTML
    #[command(alias = "r")]
    Render(RenderPageArgs),
    /// Rename a page or change its slug
    Rename(RenamePageArgs),
    /// Permanently delete a page
    Delete(PageIdArgs),
}

// ============================================================================
// Sections
// ============================================================================

/// Add a section of the given type
///
/// Block types: heading, text, image, hero, cards, features, banners, cta,
/// pilgrimages. The section starts with the type's default content.
#[derive(Args)]
pub struct AddSectionArgs {
    #[arg(help = "Page to add the section to")]
    pub page_id: u64,
    #[arg(help = "Block type of the new section")]
    pub block_type: String,
    #[arg(short, long, help = "Zero-based insert position; appends when omitted")]
    pub position: Option<usize>,
    #[arg(long, help = "Reject the change if the page is no longer at this version")]
    pub expected_version: Option<u64>,
}

impl From<AddSectionArgs> for AddSection {
    fn from(val: AddSectionArgs) -> Self {
        AddSection {
            page_id: val.page_id,
            block_type: val.block_type,
            position: val.position,
            expected_version: val.expected_version,
        }
    }
}

/// Arguments naming one section of a page
#[derive(Args)]
pub struct SectionRefArgs {
    #[arg(help = "Page holding the section")]
    pub page_id: u64,
    #[arg(help = "Section ID as shown by `page show`")]
    pub section_id: String,
    #[arg(long, help = "Reject the change if the page is no longer at this version")]
    pub expected_version: Option<u64>,
}

impl From<SectionRefArgs> for SectionRef {
    fn from(val: SectionRefArgs) -> Self {
        SectionRef {
            page_id: val.page_id,
            section_id: val.section_id,
            expected_version: val.expected_version,
        }
    }
}

impl SectionRefArgs {
    pub fn into_step(self, direction: MoveDirection) -> StepSection {
        StepSection {
            page_id: self.page_id,
            section_id: self.section_id,
            direction,
            expected_version: self.expected_version,
        }
    }
}

/// Move a section to a position in one step
#[derive(Args)]
pub struct MoveSectionArgs {
    #[arg(help = "Page holding the section")]
    pub page_id: u64,
    #[arg(help = "Section ID to move")]
    pub section_id: String,
    #[arg(help = "Zero-based target position, clamped to the last one")]
    pub index: usize,
    #[arg(long, help = "Reject the change if the page is no longer at this version")]
    pub expected_version: Option<u64>,
}

impl From<MoveSectionArgs> for ReorderSection {
    fn from(val: MoveSectionArgs) -> Self {
        ReorderSection {
            page_id: val.page_id,
            section_id: val.section_id,
            target_index: val.index,
            expected_version: val.expected_version,
        }
    }
}

/// Replace a section's content
///
/// `--content` replaces the whole record with a JSON object; each
/// `--field name=value` is then applied the way the edit form applies it.
#[derive(Args)]
pub struct SetContentArgs {
    #[arg(help = "Page holding the section")]
    pub page_id: u64,
    #[arg(help = "Section ID to edit")]
    pub section_id: String,
    #[arg(short, long, value_parser = parse_json, help = "Whole content as a JSON object")]
    pub content: Option<Value>,
    #[arg(short, long = "field", help = "Field assignment name=value, repeatable")]
    pub fields: Vec<FieldValue>,
    #[arg(long, help = "Reject the change if the page is no longer at this version")]
    pub expected_version: Option<u64>,
}

impl From<SetContentArgs> for UpdateSectionContent {
    fn from(val: SetContentArgs) -> Self {
        UpdateSectionContent {
            page_id: val.page_id,
            section_id: val.section_id,
            content: val.content,
            fields: val.fields,
            expected_version: val.expected_version,
        }
    }
}

/// One style override, `property=value`.
///
/// The value is read as JSON when it parses (`12`, `0.8`) and as a plain
/// string otherwise (`#f5f0e6`). An empty value or `null` removes the
/// property.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleArg {
    pub property: String,
    pub value: Value,
}

impl std::str::FromStr for StyleArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (property, raw) = s
            .split_once('=')
            .ok_or_else(|| format!("expected property=value, got '{s}'"))?;
        let property = property.trim();
        if property.is_empty() {
            return Err(format!("missing style property in '{s}'"));
        }
        let raw = raw.trim();
        let value = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        };
        Ok(Self {
            property: property.to_string(),
            value,
        })
    }
}

/// Merge style overrides into a section
#[derive(Args)]
pub struct SetStyleArgs {
    #[arg(help = "Page holding the section")]
    pub page_id: u64,
    #[arg(help = "Section ID to style")]
    pub section_id: String,
    #[arg(required = true, help = "Style overrides as property=value")]
    pub styles: Vec<StyleArg>,
    #[arg(long, help = "Reject the change if the page is no longer at this version")]
    pub expected_version: Option<u64>,
}

impl From<SetStyleArgs> for UpdateSectionStyles {
    fn from(val: SetStyleArgs) -> Self {
        let styles: Map<String, Value> = val
            .styles
            .into_iter()
            .map(|s| (s.property, s.value))
            .collect();
        UpdateSectionStyles {
            page_id: val.page_id,
            section_id: val.section_id,
            styles,
            expected_version: val.expected_version,
        }
    }
}

#[derive(Subcommand)]
pub enum SectionCommands {
    /// Add a section to a page
    #[command(alias = "a")]
    Add(AddSectionArgs),
    /// Remove a section from a page
    #[command(alias = "rm")]
    Remove(SectionRefArgs),
    /// Move a section one position up
    Up(SectionRefArgs),
    /// Move a section one position down
    Down(SectionRefArgs),
    /// Move a section to a position
    #[command(alias = "mv")]
    Move(MoveSectionArgs),
    /// Insert a copy of a section right after it
    #[command(alias = "dup")]
    Duplicate(SectionRefArgs),
    /// Replace a section's content
    SetContent(SetContentArgs),
    /// Merge style overrides into a section
    SetStyle(SetStyleArgs),
}

/// Upload an image into an image section's url or a hero's background
#[derive(Args)]
pub struct UploadArgs {
    #[arg(help = "Page holding the section")]
    pub page_id: u64,
    #[arg(help = "Image or hero section receiving the upload")]
    pub section_id: String,
    #[arg(help = "Image file to upload")]
    pub file: PathBuf,
    #[arg(long, help = "Reject the change if the page is no longer at this version")]
    pub expected_version: Option<u64>,
}

impl UploadArgs {
    pub fn to_params(&self) -> UploadImage {
        UploadImage {
            page_id: self.page_id,
            section_id: self.section_id.clone(),
            file_name: self
                .file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            expected_version: self.expected_version,
        }
    }
}

// ============================================================================
// CMS
// ============================================================================

/// Create or update a CMS entry
#[derive(Args)]
pub struct SetCmsArgs {
    #[arg(help = "Entry key, e.g. footer_contact_email")]
    pub key: String,
    #[arg(help = "Entry value")]
    pub value: String,
    #[arg(short = 't', long, help = "Content type: text, html or image (default text)")]
    pub content_type: Option<String>,
    #[arg(short, long, help = "What the entry is used for")]
    pub description: Option<String>,
}

impl From<SetCmsArgs> for SetCms {
    fn from(val: SetCmsArgs) -> Self {
        SetCms {
            key: val.key,
            value: val.value,
            content_type: val.content_type,
            description: val.description,
        }
    }
}

/// Arguments naming a CMS entry
#[derive(Args)]
pub struct CmsKeyArgs {
    #[arg(help = "Entry key")]
    pub key: String,
}

impl From<CmsKeyArgs> for CmsKey {
    fn from(val: CmsKeyArgs) -> Self {
        CmsKey { key: val.key }
    }
}

/// List CMS entries
#[derive(Args)]
pub struct ListCmsArgs {
    #[arg(short, long, help = "Only keys starting with this prefix")]
    pub prefix: Option<String>,
}

impl From<ListCmsArgs> for ListCms {
    fn from(val: ListCmsArgs) -> Self {
        ListCms { prefix: val.prefix }
    }
}

#[derive(Subcommand)]
pub enum CmsCommands {
    /// Create or update an entry
    Set(SetCmsArgs),
    /// Show one entry
    Get(CmsKeyArgs),
    /// List entries
    #[command(alias = "l")]
    List(ListCmsArgs),
    /// Delete an entry
    Delete(CmsKeyArgs),
}

// ============================================================================
// Pilgrimages
// ============================================================================

/// Add a pilgrimage to the catalogue
#[derive(Args)]
pub struct AddPilgrimageArgs {
    #[arg(help = "Title of the pilgrimage")]
    pub title: String,
    #[arg(short, long, help = "Where the pilgrimage goes")]
    pub location: String,
    #[arg(long, help = "First day, YYYY-MM-DD")]
    pub start: String,
    #[arg(long, help = "Last day, YYYY-MM-DD")]
    pub end: String,
    #[arg(short, long, help = "Price per person in whole currency units")]
    pub price: u32,
    #[arg(long, help = "Three-letter currency code (default RON)")]
    pub currency: Option<String>,
    #[arg(short, long, help = "Number of seats")]
    pub capacity: u32,
    #[arg(short, long, help = "Show the pilgrimage in featured listings")]
    pub featured: bool,
    #[arg(long = "image", help = "Image URL, repeatable")]
    pub images: Vec<String>,
}

impl From<AddPilgrimageArgs> for AddPilgrimage {
    fn from(val: AddPilgrimageArgs) -> Self {
        AddPilgrimage {
            title: val.title,
            location: val.location,
            start_date: val.start,
            end_date: val.end,
            price: val.price,
            currency: val.currency,
            capacity: val.capacity,
            featured: val.featured,
            images: val.images,
        }
    }
}

/// List pilgrimages, soonest first
#[derive(Args)]
pub struct ListPilgrimagesArgs {
    #[arg(short, long, help = "Case-insensitive location substring")]
    pub location: Option<String>,
    #[arg(long, help = "Maximum price")]
    pub max_price: Option<u32>,
    #[arg(long, help = "Only pilgrimages starting on or after YYYY-MM-DD")]
    pub starts_after: Option<String>,
    #[arg(short, long, help = "Only featured pilgrimages")]
    pub featured: bool,
    #[arg(short, long, help = "Only pilgrimages with seats left")]
    pub available: bool,
    #[arg(short = 'n', long, help = "Maximum number of results")]
    pub limit: Option<u32>,
}

impl From<ListPilgrimagesArgs> for ListPilgrimages {
    fn from(val: ListPilgrimagesArgs) -> Self {
        ListPilgrimages {
            location: val.location,
            max_price: val.max_price,
            starts_after: val.starts_after,
            featured_only: val.featured,
            available_only: val.available,
            limit: val.limit,
        }
    }
}

#[derive(Subcommand)]
pub enum PilgrimageCommands {
    /// Add a pilgrimage
    #[command(alias = "a")]
    Add(AddPilgrimageArgs),
    /// List pilgrimages
    #[command(alias = "l")]
    List(ListPilgrimagesArgs),
}

// ============================================================================
// Builder pages
// ============================================================================

/// Create a builder page
#[derive(Args)]
pub struct CreateBuilderPageArgs {
    /// Title of the page
    pub title: String,
    #[arg(short, long, help = "URL slug; derived from the title when omitted")]
    pub slug: Option<String>,
}

impl From<CreateBuilderPageArgs> for CreateBuilderPage {
    fn from(val: CreateBuilderPageArgs) -> Self {
        CreateBuilderPage {
            title: val.title,
            slug: val.slug,
        }
    }
}

/// Add a named section to a builder page
#[derive(Args)]
pub struct AddBuilderSectionArgs {
    #[arg(help = "Builder page to add the section to")]
    pub page_id: u64,
    #[arg(help = "Section name")]
    pub name: String,
    #[arg(short, long, help = "Zero-based insert position; appends when omitted")]
    pub position: Option<usize>,
}

impl From<AddBuilderSectionArgs> for AddBuilderSection {
    fn from(val: AddBuilderSectionArgs) -> Self {
        AddBuilderSection {
            page_id: val.page_id,
            name: val.name,
            position: val.position,
        }
    }
}

/// Add a component to a builder section
#[derive(Args)]
pub struct AddComponentArgs {
    #[arg(help = "Builder page holding the section")]
    pub page_id: u64,
    #[arg(help = "Section receiving the component")]
    pub section_id: String,
    #[arg(help = "Component type: heading, text, image, spacer, button or cms")]
    pub component_type: String,
    #[arg(short, long, help = "Zero-based insert position; appends when omitted")]
    pub position: Option<usize>,
    #[arg(short, long, value_parser = parse_json, help = "Initial content as a JSON object")]
    pub content: Option<Value>,
}

impl From<AddComponentArgs> for AddComponent {
    fn from(val: AddComponentArgs) -> Self {
        AddComponent {
            page_id: val.page_id,
            section_id: val.section_id,
            component_type: val.component_type,
            position: val.position,
            content: val.content,
        }
    }
}

#[derive(Subcommand)]
pub enum BuilderCommands {
    /// Create a builder page
    #[command(alias = "c")]
    Create(CreateBuilderPageArgs),
    /// List builder pages
    #[command(alias = "l")]
    List,
    /// Show a builder page
    #[command(alias = "s")]
    Show(PageIdArgs),
    /// Add a named section
    AddSection(AddBuilderSectionArgs),
    /// Add a component to a section
    AddComponent(AddComponentArgs),
    /// Render a builder page to HTML
    #[command(alias = "r")]
    Render(PageIdArgs),
    /// Permanently delete a builder page
    Delete(PageIdArgs),
}
