//! Per-block edit state.

use crate::{
    error::{Result, SiteError},
    models::BlockContent,
    registry,
};

/// A block open for editing: the content as last committed and the working
/// copy the form writes to.
///
/// Nothing in the draft reaches the section list until the editor saves it;
/// cancelling drops the draft and the committed content stays authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDraft {
    committed: BlockContent,
    draft: BlockContent,
}

impl BlockDraft {
    /// Opens a draft seeded from the committed content.
    pub fn open(committed: &BlockContent) -> Self {
        Self {
            committed: committed.clone(),
            draft: committed.clone(),
        }
    }

    pub fn committed(&self) -> &BlockContent {
        &self.committed
    }

    pub fn draft(&self) -> &BlockContent {
        &self.draft
    }

    /// Replaces the working copy. Content of another block type is refused.
    pub fn replace(&mut self, content: BlockContent) -> Result<()> {
        if content.type_name() != self.committed.type_name() {
            return Err(SiteError::invalid_input("content").with_reason(format!(
                "expected '{}' content, got '{}'",
                self.committed.type_name(),
                content.type_name()
            )));
        }
        self.draft = content;
        Ok(())
    }

    /// Writes raw form input into one field of the working copy, coercing
    /// it through the registry's field definition.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<()> {
        let Some(block_type) = self.draft.block_type() else {
            return Err(SiteError::invalid_input(name).with_reason(format!(
                "unknown section type: {}",
                self.draft.type_name()
            )));
        };
        let field = registry::spec(block_type).field(name).ok_or_else(|| {
            SiteError::invalid_input(name).with_reason(format!(
                "no such field on '{}' blocks",
                block_type.as_str()
            ))
        })?;
        self.draft = self.draft.with_field(name, field.coerce(raw))?;
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        self.committed != self.draft
    }

    pub fn into_draft(self) -> BlockContent {
        self.draft
    }
}
