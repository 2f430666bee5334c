//! Display implementations for domain models.
//!
//! Output is markdown, rendered by the CLI's terminal renderer and returned
//! verbatim by the MCP server.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    builder::{BuilderComponent, BuilderPage, ComponentContent, ComponentType},
    models::{
        BlockContent, BlockType, CmsContentType, CmsEntry, ContentBlock, Page, PageSummary,
        Pilgrimage, Role,
    },
};

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for CmsContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One-line description of a block's content for listings.
fn headline(content: &BlockContent) -> String {
    match content {
        BlockContent::Heading(c) => c.text.clone(),
        BlockContent::Text(c) => excerpt(&c.text),
        BlockContent::Image(c) if c.url.is_empty() => format!("{} (no image)", c.alt),
        BlockContent::Image(c) => format!("{} <{}>", c.alt, c.url),
        BlockContent::Hero(c) => c.title.clone(),
        BlockContent::Cards(c) if c.from_feed => format!("{} (from feed)", c.title),
        BlockContent::Cards(c) => format!("{} ({} cards)", c.title, c.cards.len()),
        BlockContent::Features(c) => format!("{} ({} features)", c.title, c.features.len()),
        BlockContent::Banners(c) => format!("{} banners", c.banners.len()),
        BlockContent::Cta(c) => c.title.clone(),
        BlockContent::Pilgrimages(c) => format!("{} (up to {})", c.title, c.limit),
        BlockContent::Unrecognized { .. } => "unknown section type".to_string(),
    }
}

fn excerpt(text: &str) -> String {
    const MAX: usize = 60;
    match text.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

impl fmt::Display for ContentBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "**{}** `{}`: {}",
            self.type_name(),
            self.id().as_str(),
            headline(self.content())
        )?;
        if !self.styles().is_empty() {
            write!(f, " _(style: {})_", self.styles().to_css())?;
        }
        Ok(())
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        writeln!(f, "- Slug: /{}", self.slug)?;
        writeln!(f, "- Version: {}", self.version)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if self.sections.is_empty() {
            writeln!(f, "\nNo sections on this page.")?;
        } else {
            writeln!(f, "\n## Sections")?;
            writeln!(f)?;
            for (index, block) in self.sections.iter().enumerate() {
                writeln!(f, "{}. {block}", index + 1)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.title, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Slug**: /{}", self.slug)?;
        writeln!(f, "- **Sections**: {}", self.section_count)?;
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)
    }
}

impl fmt::Display for CmsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.key, self.content_type)?;
        writeln!(f)?;
        if let Some(description) = &self.description {
            writeln!(f, "_{description}_")?;
            writeln!(f)?;
        }
        writeln!(f, "{}", self.value)?;
        writeln!(f)?;
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)
    }
}

impl fmt::Display for Pilgrimage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.featured { " ★" } else { "" };
        writeln!(f, "## {}. {}{marker}", self.id, self.title)?;
        writeln!(f)?;
        writeln!(f, "- **Location**: {}", self.location)?;
        writeln!(
            f,
            "- **Dates**: {} to {} ({} nights)",
            self.start_date,
            self.end_date,
            self.nights()
        )?;
        writeln!(f, "- **Price**: {} {}", self.price, self.currency)?;
        if self.is_full() {
            writeln!(f, "- **Seats**: full")?;
        } else {
            writeln!(f, "- **Seats**: {} of {} left", self.seats_left(), self.capacity)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for BuilderComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = match self.content() {
            ComponentContent::Heading { text, level } => format!("h{level} {text}"),
            ComponentContent::Text { text } => excerpt(text),
            ComponentContent::Image { url, alt } => format!("{alt} <{url}>"),
            ComponentContent::Spacer { height } => format!("{height}px"),
            ComponentContent::Button { label, href, .. } => format!("{label} -> {href}"),
            ComponentContent::CmsContent { key } if key.is_empty() => "(no key)".to_string(),
            ComponentContent::CmsContent { key } => format!("{{{{{key}}}}}"),
            ComponentContent::Unrecognized { .. } => "unknown component type".to_string(),
        };
        write!(f, "**{}** `{}`: {detail}", self.content().type_name(), self.id().as_str())
    }
}

impl fmt::Display for BuilderPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;
        writeln!(f, "- Slug: /{}", self.slug)?;
        writeln!(f, "- Version: {}", self.version)?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if self.sections.is_empty() {
            return writeln!(f, "\nNo sections on this page.");
        }
        for section in &self.sections {
            writeln!(f, "\n## {} `{}`", section.name, section.id.as_str())?;
            writeln!(f)?;
            if section.components.is_empty() {
                writeln!(f, "_empty_")?;
            }
            for (index, component) in section.components.iter().enumerate() {
                writeln!(f, "{}. {component}", index + 1)?;
            }
        }
        Ok(())
    }
}
