//! Two-level page model used by the standalone builder tool.
//!
//! A [`BuilderPage`] owns ordered, named [`BuilderSection`]s, each owning
//! ordered [`BuilderComponent`]s. The invariants match the flat section list
//! one level down: stable ids, render order, fixed component types, total
//! operations.

use std::{collections::HashSet, str::FromStr};

use jiff::Timestamp;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    models::{BlockId, StyleMap},
    sections::ordering::{self, Direction, Keyed},
};

#[cfg(test)]
mod tests;

/// Component type tags of the builder tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentType {
    Heading,
    Text,
    Image,
    Spacer,
    Button,
    CmsContent,
}

impl ComponentType {
    pub const ALL: [ComponentType; 6] = [
        ComponentType::Heading,
        ComponentType::Text,
        ComponentType::Image,
        ComponentType::Spacer,
        ComponentType::Button,
        ComponentType::CmsContent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Heading => "heading",
            ComponentType::Text => "text",
            ComponentType::Image => "image",
            ComponentType::Spacer => "spacer",
            ComponentType::Button => "button",
            ComponentType::CmsContent => "cmsContent",
        }
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = if s.eq_ignore_ascii_case("cms") {
            "cmsContent"
        } else {
            s
        };
        ComponentType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Invalid component type: {s}"))
    }
}

fn heading_level() -> u8 {
    2
}

fn spacer_height() -> u32 {
    40
}

fn primary() -> String {
    "primary".to_string()
}

/// Component payload, one variant per [`ComponentType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum ComponentContent {
    Heading {
        #[serde(default)]
        text: String,
        #[serde(default = "heading_level")]
        level: u8,
    },
    Text {
        #[serde(default)]
        text: String,
    },
    Image {
        #[serde(default)]
        url: String,
        #[serde(default)]
        alt: String,
    },
    Spacer {
        #[serde(default = "spacer_height")]
        height: u32,
    },
    Button {
        #[serde(default)]
        label: String,
        #[serde(default)]
        href: String,
        #[serde(default = "primary")]
        variant: String,
    },
    /// Renders the current value of a CMS entry
    CmsContent {
        #[serde(default)]
        key: String,
    },
    /// Stored component of an unknown type, kept verbatim
    #[serde(skip)]
    Unrecognized { kind: String, content: Value },
}

impl ComponentContent {
    /// Content a newly added component starts with.
    pub fn default_for(component_type: ComponentType) -> Self {
        match component_type {
            ComponentType::Heading => ComponentContent::Heading {
                text: "Titlu Nou".to_string(),
                level: 2,
            },
            ComponentType::Text => ComponentContent::Text {
                text: "Text nou".to_string(),
            },
            ComponentType::Image => ComponentContent::Image {
                url: String::new(),
                alt: String::new(),
            },
            ComponentType::Spacer => ComponentContent::Spacer { height: 40 },
            ComponentType::Button => ComponentContent::Button {
                label: "Buton".to_string(),
                href: "#".to_string(),
                variant: primary(),
            },
            ComponentType::CmsContent => ComponentContent::CmsContent { key: String::new() },
        }
    }

    pub fn component_type(&self) -> Option<ComponentType> {
        Some(match self {
            ComponentContent::Heading { .. } => ComponentType::Heading,
            ComponentContent::Text { .. } => ComponentType::Text,
            ComponentContent::Image { .. } => ComponentType::Image,
            ComponentContent::Spacer { .. } => ComponentType::Spacer,
            ComponentContent::Button { .. } => ComponentType::Button,
            ComponentContent::CmsContent { .. } => ComponentType::CmsContent,
            ComponentContent::Unrecognized { .. } => return None,
        })
    }

    pub fn type_name(&self) -> &str {
        match self {
            ComponentContent::Unrecognized { kind, .. } => kind,
            other => other.component_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }

    /// Parses a stored `(type, content)` pair; never fails.
    pub fn from_parts(kind: &str, content: Value) -> Self {
        let body = match &content {
            Value::Null => Value::Object(Map::new()),
            other => other.clone(),
        };
        let mut tagged = Map::new();
        tagged.insert("type".to_string(), Value::String(kind.to_string()));
        tagged.insert("content".to_string(), body);
        serde_json::from_value(Value::Object(tagged)).unwrap_or(ComponentContent::Unrecognized {
            kind: kind.to_string(),
            content,
        })
    }

    /// The payload without its type tag.
    pub fn to_value(&self) -> Value {
        if let ComponentContent::Unrecognized { content, .. } = self {
            return content.clone();
        }
        match serde_json::to_value(self) {
            Ok(Value::Object(mut tagged)) => tagged.remove("content").unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

/// One typed component inside a builder section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StoredComponent", from = "StoredComponent")]
pub struct BuilderComponent {
    id: BlockId,
    content: ComponentContent,
    styles: StyleMap,
}

impl BuilderComponent {
    pub fn new(content: ComponentContent) -> Self {
        Self {
            id: BlockId::generate(),
            content,
            styles: StyleMap::new(),
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn content(&self) -> &ComponentContent {
        &self.content
    }

    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }

    fn duplicate(&self) -> Self {
        Self {
            id: BlockId::generate(),
            content: self.content.clone(),
            styles: self.styles.clone(),
        }
    }
}

impl Keyed for BuilderComponent {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

#[derive(Serialize, Deserialize)]
struct StoredComponent {
    id: BlockId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    styles: StyleMap,
}

impl From<BuilderComponent> for StoredComponent {
    fn from(component: BuilderComponent) -> Self {
        Self {
            kind: component.content.type_name().to_string(),
            content: component.content.to_value(),
            id: component.id,
            styles: component.styles,
        }
    }
}

impl From<StoredComponent> for BuilderComponent {
    fn from(stored: StoredComponent) -> Self {
        Self {
            content: ComponentContent::from_parts(&stored.kind, stored.content),
            id: stored.id,
            styles: stored.styles,
        }
    }
}

/// Named group of components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredSection")]
pub struct BuilderSection {
    pub id: BlockId,
    pub name: String,
    #[serde(default)]
    pub components: Vec<BuilderComponent>,
    #[serde(default)]
    pub styles: StyleMap,
}

#[derive(Deserialize)]
struct StoredSection {
    id: BlockId,
    name: String,
    #[serde(default)]
    components: Vec<BuilderComponent>,
    #[serde(default)]
    styles: StyleMap,
}

impl From<StoredSection> for BuilderSection {
    fn from(stored: StoredSection) -> Self {
        let mut components = stored.components;
        give_fresh_ids(&mut components, &mut HashSet::new());
        Self {
            id: stored.id,
            name: stored.name,
            components,
            styles: stored.styles,
        }
    }
}

/// Replaces ids already in `seen` with generated ones and records every id.
fn give_fresh_ids(components: &mut [BuilderComponent], seen: &mut HashSet<BlockId>) {
    for component in components {
        if !seen.insert(component.id.clone()) {
            warn!(
                "Duplicate component id {} on load, assigning a new one",
                component.id.as_str()
            );
            component.id = BlockId::generate();
            seen.insert(component.id.clone());
        }
    }
}

/// Hydrates stored builder sections so section ids, and component ids
/// across the whole page, are unique again.
pub fn with_unique_ids(mut sections: Vec<BuilderSection>) -> Vec<BuilderSection> {
    let mut section_ids = HashSet::with_capacity(sections.len());
    let mut component_ids = HashSet::new();
    for section in &mut sections {
        if !section_ids.insert(section.id.clone()) {
            warn!(
                "Duplicate builder section id {} on load, assigning a new one",
                section.id.as_str()
            );
            section.id = BlockId::generate();
            section_ids.insert(section.id.clone());
        }
        give_fresh_ids(&mut section.components, &mut component_ids);
    }
    sections
}

impl BuilderSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BlockId::generate(),
            name: name.into(),
            components: Vec::new(),
            styles: StyleMap::new(),
        }
    }

    pub fn component(&self, id: &BlockId) -> Option<&BuilderComponent> {
        self.components.iter().find(|c| c.id() == id)
    }

    pub fn add_component(
        &mut self,
        component_type: ComponentType,
        position: Option<usize>,
    ) -> BlockId {
        let component = BuilderComponent::new(ComponentContent::default_for(component_type));
        let id = component.id().clone();
        ordering::insert_at(&mut self.components, component, position);
        id
    }

    pub fn remove_component(&mut self, id: &BlockId) -> Option<BuilderComponent> {
        ordering::remove(&mut self.components, id.as_str())
    }

    pub fn move_component(&mut self, id: &BlockId, direction: Direction) -> bool {
        ordering::step(&mut self.components, id.as_str(), direction)
    }

    /// Replaces a component's content; rejected when the type differs.
    pub fn update_component(&mut self, id: &BlockId, content: ComponentContent) -> bool {
        match self.components.iter_mut().find(|c| c.id() == id) {
            Some(component) if component.content.type_name() == content.type_name() => {
                component.content = content;
                true
            }
            _ => false,
        }
    }

    pub fn update_component_styles(&mut self, id: &BlockId, partial: &StyleMap) -> bool {
        match self.components.iter_mut().find(|c| c.id() == id) {
            Some(component) => {
                component.styles.merge(partial);
                true
            }
            None => false,
        }
    }

    fn duplicate(&self) -> Self {
        Self {
            id: BlockId::generate(),
            name: self.name.clone(),
            components: self.components.iter().map(BuilderComponent::duplicate).collect(),
            styles: self.styles.clone(),
        }
    }
}

impl Keyed for BuilderSection {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// Page document of the builder tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredPage")]
pub struct BuilderPage {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub sections: Vec<BuilderSection>,
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Deserialize)]
struct StoredPage {
    id: u64,
    title: String,
    slug: String,
    #[serde(default)]
    sections: Vec<BuilderSection>,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl From<StoredPage> for BuilderPage {
    fn from(stored: StoredPage) -> Self {
        Self {
            id: stored.id,
            title: stored.title,
            slug: stored.slug,
            sections: with_unique_ids(stored.sections),
            version: stored.version,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

impl BuilderPage {
    pub fn section(&self, id: &BlockId) -> Option<&BuilderSection> {
        self.sections.iter().find(|s| &s.id == id)
    }

    pub fn section_mut(&mut self, id: &BlockId) -> Option<&mut BuilderSection> {
        self.sections.iter_mut().find(|s| &s.id == id)
    }

    pub fn add_section(&mut self, name: impl Into<String>, position: Option<usize>) -> BlockId {
        let section = BuilderSection::new(name);
        let id = section.id.clone();
        ordering::insert_at(&mut self.sections, section, position);
        id
    }

    pub fn remove_section(&mut self, id: &BlockId) -> Option<BuilderSection> {
        ordering::remove(&mut self.sections, id.as_str())
    }

    pub fn move_section(&mut self, id: &BlockId, direction: Direction) -> bool {
        ordering::step(&mut self.sections, id.as_str(), direction)
    }

    pub fn rename_section(&mut self, id: &BlockId, name: impl Into<String>) -> bool {
        match self.section_mut(id) {
            Some(section) => {
                section.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Deep-copies a section (components get fresh ids too) right after it.
    pub fn duplicate_section(&mut self, id: &BlockId) -> Option<BlockId> {
        let copy = self.section(id)?.duplicate();
        let copy_id = copy.id.clone();
        ordering::insert_after(&mut self.sections, id.as_str(), copy)?;
        Some(copy_id)
    }

    /// Finds a component anywhere on the page.
    pub fn find_component(&self, id: &BlockId) -> Option<(&BuilderSection, &BuilderComponent)> {
        self.sections
            .iter()
            .find_map(|section| section.component(id).map(|c| (section, c)))
    }

    /// CMS keys referenced by `cmsContent` components, in page order.
    pub fn cms_keys(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.components.iter())
            .filter_map(|c| match c.content() {
                ComponentContent::CmsContent { key } if !key.is_empty() => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }
}
