//! View-mode rendering.
//!
//! Rendering is pure: everything a view needs from collaborators (pilgrimage
//! feed entries, CMS values) is fetched up front into a [`RenderContext`].
//! [`crate::Site::render_page`] builds that context; tests build it by hand.

use std::collections::HashMap;

use crate::{
    models::{BlockContent, CmsEntry, Pilgrimage},
    sections::PageSectionList,
};

pub mod html;

pub use html::{render_block, render_builder_page, render_sections};

/// Data a render pass reads besides the page itself.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pilgrimages: Vec<Pilgrimage>,
    cms: HashMap<String, CmsEntry>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed entries, already ordered the way they should be listed.
    pub fn with_pilgrimages(mut self, pilgrimages: Vec<Pilgrimage>) -> Self {
        self.pilgrimages = pilgrimages;
        self
    }

    pub fn with_cms(mut self, entries: impl IntoIterator<Item = CmsEntry>) -> Self {
        self.cms = entries.into_iter().map(|e| (e.key.clone(), e)).collect();
        self
    }

    pub fn pilgrimages(&self) -> &[Pilgrimage] {
        &self.pilgrimages
    }

    pub fn cms_entry(&self, key: &str) -> Option<&CmsEntry> {
        self.cms.get(key)
    }

    /// Replaces `{{key}}` placeholders with CMS values from this context.
    pub fn substitute(&self, template: &str) -> String {
        substitute(template, |key| self.cms.get(key).map(|e| e.value.as_str()))
    }
}

/// Whether rendering `sections` reads the pilgrimage feed.
pub fn needs_feed(sections: &PageSectionList) -> bool {
    sections.iter().any(|block| match block.content() {
        BlockContent::Pilgrimages(_) => true,
        BlockContent::Cards(cards) => cards.from_feed,
        _ => false,
    })
}

/// Replaces every `{{ key }}` in `template` with `lookup(key)`. Placeholders
/// whose key is unknown, and unterminated `{{`, are left as written.
///
/// ```rust
/// use pelerin_core::render::substitute;
///
/// let out = substitute("Scrie-ne la {{ footer_contact_email }}.", |key| {
///     (key == "footer_contact_email").then_some("office@pelerin.ro")
/// });
/// assert_eq!(out, "Scrie-ne la office@pelerin.ro.");
/// ```
pub fn substitute<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);
        let key = after[..end].trim();
        match lookup(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Keys referenced by `{{key}}` placeholders, in order of appearance.
pub fn placeholder_keys(template: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        keys.push(after[..end].trim());
        rest = &after[end + 2..];
    }
    keys
}
