//! The ordered section list of a page.
//!
//! [`PageSectionList`] is the aggregate every page-builder mutation goes
//! through. Order is render order. All operations are total: an id that is no
//! longer in the list (a stale reference from an earlier render) turns the
//! operation into a no-op and the return value says so.
//!
//! ```rust
//! use pelerin_core::{BlockType, PageSectionList};
//!
//! let mut list = PageSectionList::new();
//! let heading = list.insert(BlockType::Heading, None);
//! let text = list.insert(BlockType::Text, Some(0));
//! assert_eq!(list.index_of(&text), Some(0));
//!
//! list.move_down(&text);
//! assert_eq!(list.index_of(&heading), Some(0));
//!
//! list.delete(&heading);
//! assert_eq!(list.len(), 1);
//! ```

use std::collections::HashSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    models::{BlockContent, BlockId, BlockType, ContentBlock, StyleMap},
    registry,
};

pub mod ordering;

#[cfg(test)]
mod tests;

pub use ordering::Direction;
use ordering::Keyed;

impl Keyed for ContentBlock {
    fn key(&self) -> &str {
        self.id().as_str()
    }
}

/// Ordered sequence of content blocks with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ContentBlock>", into = "Vec<ContentBlock>")]
pub struct PageSectionList {
    blocks: Vec<ContentBlock>,
}

impl PageSectionList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Hydrates a list from stored blocks. Duplicate ids are replaced with
    /// fresh ones so the uniqueness invariant holds for legacy data.
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        let mut seen = HashSet::with_capacity(blocks.len());
        let blocks = blocks
            .into_iter()
            .map(|block| {
                if seen.insert(block.id().clone()) {
                    block
                } else {
                    warn!("Duplicate block id {} on load, assigning a new one", block.id().as_str());
                    let fresh = block.duplicate();
                    seen.insert(fresh.id().clone());
                    fresh
                }
            })
            .collect();
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentBlock> {
        self.blocks.iter()
    }

    pub fn get(&self, id: &BlockId) -> Option<&ContentBlock> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        ordering::position_of(&self.blocks, id.as_str())
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn is_first(&self, id: &BlockId) -> bool {
        ordering::is_first(&self.blocks, id.as_str())
    }

    pub fn is_last(&self, id: &BlockId) -> bool {
        ordering::is_last(&self.blocks, id.as_str())
    }

    /// Inserts a new block of `block_type` with its default content at
    /// `position`, or appends when `position` is `None`. Positions past the
    /// end append.
    pub fn insert(&mut self, block_type: BlockType, position: Option<usize>) -> BlockId {
        let block = ContentBlock::new(registry::default_content(block_type));
        self.insert_block(block, position)
    }

    /// Inserts a prepared block. A block whose id is already present is
    /// inserted under a fresh id.
    pub fn insert_block(&mut self, block: ContentBlock, position: Option<usize>) -> BlockId {
        let block = if self.contains(block.id()) {
            block.duplicate()
        } else {
            block
        };
        let id = block.id().clone();
        let index = ordering::insert_at(&mut self.blocks, block, position);
        debug!("Inserted block {} at {index}", id.as_str());
        id
    }

    /// Removes the block. Unknown ids are a no-op returning `None`.
    pub fn delete(&mut self, id: &BlockId) -> Option<ContentBlock> {
        let removed = ordering::remove(&mut self.blocks, id.as_str());
        if removed.is_none() {
            debug!("Delete ignored, block {} not in list", id.as_str());
        }
        removed
    }

    /// Swaps the block with its predecessor. No-op for the first block.
    pub fn move_up(&mut self, id: &BlockId) -> bool {
        ordering::step(&mut self.blocks, id.as_str(), Direction::Up)
    }

    /// Swaps the block with its successor. No-op for the last block.
    pub fn move_down(&mut self, id: &BlockId) -> bool {
        ordering::step(&mut self.blocks, id.as_str(), Direction::Down)
    }

    pub fn step(&mut self, id: &BlockId, direction: Direction) -> bool {
        ordering::step(&mut self.blocks, id.as_str(), direction)
    }

    /// Moves the block to `target_index` (clamped), shifting the blocks in
    /// between by one.
    pub fn reorder(&mut self, id: &BlockId, target_index: usize) -> bool {
        ordering::move_to(&mut self.blocks, id.as_str(), target_index).is_some()
    }

    /// Deep-copies the block under a fresh id right after the source.
    pub fn duplicate(&mut self, id: &BlockId) -> Option<BlockId> {
        let copy = self.get(id)?.duplicate();
        let copy_id = copy.id().clone();
        ordering::insert_after(&mut self.blocks, id.as_str(), copy)?;
        Some(copy_id)
    }

    /// Replaces the block's content wholesale. Content of a different type
    /// is rejected, since a block's type never changes.
    pub fn update_content(&mut self, id: &BlockId, content: BlockContent) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id() == id) else {
            return false;
        };
        let replaced = block.replace_content(content);
        if !replaced {
            warn!(
                "Rejected content update for block {}: type is fixed as '{}'",
                id.as_str(),
                block.type_name()
            );
        }
        replaced
    }

    /// Shallow-merges `partial` onto the block's styles.
    pub fn update_styles(&mut self, id: &BlockId, partial: &StyleMap) -> bool {
        match self.blocks.iter_mut().find(|b| b.id() == id) {
            Some(block) => {
                block.merge_styles(partial);
                true
            }
            None => false,
        }
    }
}

impl From<Vec<ContentBlock>> for PageSectionList {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        Self::from_blocks(blocks)
    }
}

impl From<PageSectionList> for Vec<ContentBlock> {
    fn from(list: PageSectionList) -> Self {
        list.blocks
    }
}

impl<'a> IntoIterator for &'a PageSectionList {
    type Item = &'a ContentBlock;
    type IntoIter = std::slice::Iter<'a, ContentBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
