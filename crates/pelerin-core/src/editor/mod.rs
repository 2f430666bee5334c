//! Section editor controller.
//!
//! [`SectionEditor`] owns one page's [`PageSectionList`] while it is being
//! edited. It has two modes:
//!
//! - **View** (default): no controls, every operation is a no-op.
//! - **Edit**: entered only for users whose role may edit pages. Every block
//!   exposes a control cluster ([`BlockControls`]) and can be opened into a
//!   [`BlockDraft`].
//!
//! Opening a block snapshots its content; [`SectionEditor::save`] commits the
//! draft to the list with replace semantics and [`SectionEditor::cancel`]
//! drops it. Committing to the list and persisting the list are separate:
//! [`SectionEditor::persist`] hands the whole list to a
//! [`PersistenceGateway`], and a failed persist leaves the in-memory list as
//! it was so the user can retry.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::{
    error::{Result, SiteError},
    gateway::PersistenceGateway,
    models::{BlockContent, BlockId, BlockType, CurrentUser, SaveMode, StyleMap},
    sections::PageSectionList,
};

pub mod draft;
pub mod gesture;

#[cfg(test)]
mod tests;

pub use draft::BlockDraft;
pub use gesture::{DragGesture, HoverRect, ReorderStep};

/// Editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    View,
    Edit,
}

/// One button of a block's floating control cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    AddBefore,
    MoveUp,
    MoveDown,
    Edit,
    Save,
    Cancel,
    Duplicate,
    Delete,
    AddAfter,
}

/// Control state of one block while in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockControls {
    pub id: BlockId,
    pub index: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub editing: bool,
}

impl BlockControls {
    /// Controls to show, in display order. Move buttons are omitted at the
    /// list boundaries; save/cancel replace the edit button while open.
    pub fn available(&self) -> Vec<Control> {
        let mut controls = vec![Control::AddBefore];
        if !self.is_first {
            controls.push(Control::MoveUp);
        }
        if !self.is_last {
            controls.push(Control::MoveDown);
        }
        if self.editing {
            controls.extend([Control::Save, Control::Cancel]);
        } else {
            controls.push(Control::Edit);
        }
        controls.extend([Control::Duplicate, Control::Delete, Control::AddAfter]);
        controls
    }
}

/// Controller for editing one page's sections.
#[derive(Debug, Clone)]
pub struct SectionEditor {
    page_id: u64,
    version: u64,
    sections: PageSectionList,
    mode: EditorMode,
    drafts: HashMap<BlockId, BlockDraft>,
    drag: Option<DragGesture>,
    revision: u64,
    persisted_revision: u64,
}

impl SectionEditor {
    /// Creates an editor over an already loaded list.
    pub fn new(page_id: u64, sections: PageSectionList, version: u64) -> Self {
        Self {
            page_id,
            version,
            sections,
            mode: EditorMode::View,
            drafts: HashMap::new(),
            drag: None,
            revision: 0,
            persisted_revision: 0,
        }
    }

    /// Loads the page's list through the gateway.
    pub async fn load<G: PersistenceGateway>(gateway: &G, page_id: u64) -> Result<Self> {
        let loaded = gateway.load(page_id).await?;
        debug!(
            "Loaded page {page_id} with {} sections at version {}",
            loaded.sections.len(),
            loaded.version
        );
        Ok(Self::new(page_id, loaded.sections, loaded.version))
    }

    pub fn page_id(&self) -> u64 {
        self.page_id
    }

    /// Version of the stored document this editor last loaded or saved.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn sections(&self) -> &PageSectionList {
        &self.sections
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_edit_mode(&self) -> bool {
        self.mode == EditorMode::Edit
    }

    /// Whether the list has committed changes not yet persisted.
    pub fn has_unsaved_changes(&self) -> bool {
        self.revision != self.persisted_revision
    }

    /// Enters edit mode if `user` may edit pages. Returns whether the editor
    /// is now in edit mode.
    pub fn enter_edit_mode(&mut self, user: &CurrentUser) -> bool {
        if !user.role.can_edit_pages() {
            debug!("User '{}' ({}) may not edit pages", user.name, user.role.as_str());
            return false;
        }
        self.mode = EditorMode::Edit;
        true
    }

    /// Returns to view mode. Open drafts are discarded, committed content is
    /// untouched.
    pub fn exit_edit_mode(&mut self) {
        self.mode = EditorMode::View;
        self.drafts.clear();
        self.drag = None;
    }

    /// Toggles between view and edit mode and returns the new mode.
    pub fn toggle_mode(&mut self, user: &CurrentUser) -> EditorMode {
        match self.mode {
            EditorMode::View => {
                self.enter_edit_mode(user);
            }
            EditorMode::Edit => self.exit_edit_mode(),
        }
        self.mode
    }

    /// Control state for a block; `None` in view mode or for unknown ids.
    pub fn controls(&self, id: &BlockId) -> Option<BlockControls> {
        if !self.is_edit_mode() {
            return None;
        }
        let index = self.sections.index_of(id)?;
        Some(BlockControls {
            id: id.clone(),
            index,
            is_first: index == 0,
            is_last: index + 1 == self.sections.len(),
            editing: self.drafts.contains_key(id),
        })
    }

    /// Control state for every block, in order. Empty in view mode.
    pub fn all_controls(&self) -> Vec<BlockControls> {
        self.sections
            .iter()
            .filter_map(|block| self.controls(block.id()))
            .collect()
    }

    fn guard(&self, operation: &str) -> bool {
        if !self.is_edit_mode() {
            debug!("Ignoring {operation} outside edit mode");
        }
        self.is_edit_mode()
    }

    fn touched(&mut self, changed: bool) -> bool {
        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Adds a block of `block_type` at `position` (append when `None`).
    pub fn add(&mut self, block_type: BlockType, position: Option<usize>) -> Option<BlockId> {
        if !self.guard("add") {
            return None;
        }
        let id = self.sections.insert(block_type, position);
        self.touched(true);
        Some(id)
    }

    /// Adds a block directly before `anchor`.
    pub fn add_before(&mut self, anchor: &BlockId, block_type: BlockType) -> Option<BlockId> {
        let index = self.sections.index_of(anchor)?;
        self.add(block_type, Some(index))
    }

    /// Adds a block directly after `anchor`.
    pub fn add_after(&mut self, anchor: &BlockId, block_type: BlockType) -> Option<BlockId> {
        let index = self.sections.index_of(anchor)?;
        self.add(block_type, Some(index + 1))
    }

    pub fn move_up(&mut self, id: &BlockId) -> bool {
        // Boundary guard mirrors the hidden move-up button on the first block.
        if !self.guard("move up") || self.sections.is_first(id) {
            return false;
        }
        let moved = self.sections.move_up(id);
        self.touched(moved)
    }

    pub fn move_down(&mut self, id: &BlockId) -> bool {
        if !self.guard("move down") || self.sections.is_last(id) {
            return false;
        }
        let moved = self.sections.move_down(id);
        self.touched(moved)
    }

    /// Moves a block to `target_index` in one step.
    pub fn reorder(&mut self, id: &BlockId, target_index: usize) -> bool {
        if !self.guard("reorder") {
            return false;
        }
        let moved = self.sections.reorder(id, target_index);
        self.touched(moved)
    }

    pub fn duplicate(&mut self, id: &BlockId) -> Option<BlockId> {
        if !self.guard("duplicate") {
            return None;
        }
        let copy = self.sections.duplicate(id);
        self.touched(copy.is_some());
        copy
    }

    /// Deletes a block and drops its draft if one is open.
    pub fn delete(&mut self, id: &BlockId) -> bool {
        if !self.guard("delete") {
            return false;
        }
        self.drafts.remove(id);
        if self.drag.as_ref().is_some_and(|d| d.dragged() == id) {
            self.drag = None;
        }
        let removed = self.sections.delete(id).is_some();
        self.touched(removed)
    }

    /// Merges style overrides into a block. Styles are edited field by field
    /// and apply immediately, without a draft.
    pub fn update_styles(&mut self, id: &BlockId, partial: &StyleMap) -> bool {
        if !self.guard("update styles") {
            return false;
        }
        let updated = self.sections.update_styles(id, partial);
        self.touched(updated)
    }

    /// Opens a block's form. Re-opening an open block keeps its draft.
    pub fn open(&mut self, id: &BlockId) -> bool {
        if !self.guard("open") {
            return false;
        }
        let Some(block) = self.sections.get(id) else {
            return false;
        };
        if !self.drafts.contains_key(id) {
            self.drafts.insert(id.clone(), BlockDraft::open(block.content()));
        }
        true
    }

    pub fn is_editing(&self, id: &BlockId) -> bool {
        self.drafts.contains_key(id)
    }

    pub fn draft(&self, id: &BlockId) -> Option<&BlockDraft> {
        self.drafts.get(id)
    }

    fn draft_mut(&mut self, id: &BlockId) -> Result<&mut BlockDraft> {
        self.drafts.get_mut(id).ok_or_else(|| SiteError::SectionNotFound {
            id: id.as_str().to_string(),
        })
    }

    /// Writes raw form input into one field of an open draft.
    pub fn set_field(&mut self, id: &BlockId, field: &str, raw: &str) -> Result<()> {
        self.draft_mut(id)?.set_field(field, raw)
    }

    /// Replaces the whole working copy of an open draft.
    pub fn set_draft(&mut self, id: &BlockId, content: BlockContent) -> Result<()> {
        self.draft_mut(id)?.replace(content)
    }

    /// Commits the block's draft to the list and closes the form.
    pub fn save(&mut self, id: &BlockId) -> bool {
        let Some(draft) = self.drafts.remove(id) else {
            return false;
        };
        let updated = self.sections.update_content(id, draft.into_draft());
        self.touched(updated)
    }

    /// Discards the block's draft; the committed content stays.
    pub fn cancel(&mut self, id: &BlockId) -> bool {
        self.drafts.remove(id).is_some()
    }

    /// Starts dragging a block.
    pub fn begin_drag(&mut self, id: &BlockId) -> bool {
        if !self.guard("drag") || !self.sections.contains(id) {
            return false;
        }
        self.drag = Some(DragGesture::new(id.clone()));
        true
    }

    /// Reports the pointer over block `hovered`. Applies and returns at most
    /// one single-position step.
    pub fn drag_over(
        &mut self,
        hovered: &BlockId,
        pointer_y: f64,
        rect: HoverRect,
    ) -> Option<ReorderStep> {
        let dragged = self.drag.as_ref()?.dragged().clone();
        let from = self.sections.index_of(&dragged)?;
        let hover_index = self.sections.index_of(hovered)?;
        let to = gesture::hover_target(from, hover_index, pointer_y, rect)?;
        if !self.sections.reorder(&dragged, to) {
            return None;
        }
        self.touched(true);
        Some(ReorderStep { id: dragged, from, to })
    }

    /// Ends the drag; the list keeps whatever order the steps produced.
    pub fn end_drag(&mut self) -> Option<BlockId> {
        self.drag.take().map(|d| d.dragged().clone())
    }

    /// Saves the whole list through the gateway, expecting the stored
    /// version to be the one this editor loaded.
    ///
    /// On failure the in-memory list and open drafts are left untouched.
    pub async fn persist<G: PersistenceGateway>(&mut self, gateway: &G) -> Result<u64> {
        self.persist_with(gateway, SaveMode::Expect(self.version)).await
    }

    /// Saves with an explicit conflict policy.
    pub async fn persist_with<G: PersistenceGateway>(
        &mut self,
        gateway: &G,
        mode: SaveMode,
    ) -> Result<u64> {
        let revision = self.revision;
        match gateway.save(self.page_id, &self.sections, mode).await {
            Ok(version) => {
                info!("Saved page {} at version {version}", self.page_id);
                self.version = version;
                self.persisted_revision = revision;
                Ok(version)
            }
            Err(e) => {
                warn!("Saving page {} failed: {e}", self.page_id);
                Err(e)
            }
        }
    }
}
