//! Section commands on a page's list.
//!
//! Each command loads the whole list, applies one list operation and saves
//! the whole list back, expecting the version it loaded (or the caller's
//! `expected_version`). Commands that leave the list unchanged skip the
//! save. Unlike the list operations themselves, a section id that is not on
//! the page is reported as [`SiteError::SectionNotFound`] here, since a
//! command line or tool call naming a missing id is a user mistake rather
//! than a stale render.

use log::{debug, warn};
use serde_json::Value;

use super::Site;
use crate::{
    editor::BlockDraft,
    error::{Result, SiteError},
    gateway::{ImageUploader, PersistenceGateway},
    models::{BlockContent, BlockId, BlockType, ContentBlock, SaveMode, StyleMap},
    params::{
        AddSection, ReorderSection, SectionRef, StepSection, UpdateSectionContent,
        UpdateSectionStyles, UploadImage,
    },
    sections::{Direction, PageSectionList},
};

/// What a section command produced and the page version after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Edited<T> {
    pub value: T,
    pub version: u64,
    /// Whether the list changed and was saved
    pub saved: bool,
}

fn find<'a>(list: &'a PageSectionList, id: &BlockId) -> Result<&'a ContentBlock> {
    list.get(id).ok_or_else(|| SiteError::SectionNotFound {
        id: id.as_str().to_string(),
    })
}

fn committed(list: &PageSectionList, id: &BlockId) -> Result<ContentBlock> {
    find(list, id).cloned()
}

impl Site {
    /// Load, mutate, save. `op` errors abort before anything is written.
    async fn edit_sections<T>(
        &self,
        page_id: u64,
        expected_version: Option<u64>,
        op: impl FnOnce(&mut PageSectionList) -> Result<T>,
    ) -> Result<Edited<T>> {
        let loaded = self.load(page_id).await?;
        let mut sections = loaded.sections.clone();
        let value = op(&mut sections)?;

        if sections == loaded.sections {
            debug!("Page {page_id} unchanged, skipping save");
            return Ok(Edited {
                value,
                version: loaded.version,
                saved: false,
            });
        }

        let mode = SaveMode::Expect(expected_version.unwrap_or(loaded.version));
        let version = self.save(page_id, &sections, mode).await.map_err(|e| {
            if e.is_conflict() {
                warn!("Page {page_id} changed while editing: {e}");
            }
            e
        })?;
        Ok(Edited {
            value,
            version,
            saved: true,
        })
    }

    /// Inserts a block of the given type with its default content.
    pub async fn add_section(&self, params: &AddSection) -> Result<Edited<ContentBlock>> {
        let block_type: BlockType = params
            .block_type
            .parse()
            .map_err(|e: String| SiteError::invalid_input("block_type").with_reason(e))?;
        let position = params.position;

        self.edit_sections(params.page_id, params.expected_version, |list| {
            let id = list.insert(block_type, position);
            committed(list, &id)
        })
        .await
    }

    pub async fn remove_section(&self, params: &SectionRef) -> Result<Edited<ContentBlock>> {
        let id = BlockId::from(params.section_id.as_str());
        self.edit_sections(params.page_id, params.expected_version, |list| {
            list.delete(&id).ok_or_else(|| SiteError::SectionNotFound {
                id: id.as_str().to_string(),
            })
        })
        .await
    }

    /// Moves a section one position. At the boundary nothing changes and
    /// `value` is `false`.
    pub async fn move_section(&self, params: &StepSection) -> Result<Edited<bool>> {
        let id = BlockId::from(params.section_id.as_str());
        let direction = Direction::from(params.direction);
        self.edit_sections(params.page_id, params.expected_version, |list| {
            find(list, &id)?;
            Ok(list.step(&id, direction))
        })
        .await
    }

    /// Moves a section to `target_index` and returns its final index.
    pub async fn reorder_section(&self, params: &ReorderSection) -> Result<Edited<usize>> {
        let id = BlockId::from(params.section_id.as_str());
        let target = params.target_index;
        self.edit_sections(params.page_id, params.expected_version, |list| {
            find(list, &id)?;
            list.reorder(&id, target);
            list.index_of(&id).ok_or_else(|| SiteError::SectionNotFound {
                id: id.as_str().to_string(),
            })
        })
        .await
    }

    /// Inserts a copy with a fresh id right after the section.
    pub async fn duplicate_section(&self, params: &SectionRef) -> Result<Edited<ContentBlock>> {
        let id = BlockId::from(params.section_id.as_str());
        self.edit_sections(params.page_id, params.expected_version, |list| {
            let copy = list.duplicate(&id).ok_or_else(|| SiteError::SectionNotFound {
                id: id.as_str().to_string(),
            })?;
            committed(list, &copy)
        })
        .await
    }

    /// Replaces a section's content and/or sets individual fields, going
    /// through the same draft the edit form uses. The block type never
    /// changes.
    pub async fn update_section_content(
        &self,
        params: &UpdateSectionContent,
    ) -> Result<Edited<ContentBlock>> {
        if params.content.is_none() && params.fields.is_empty() {
            return Err(SiteError::invalid_input("content")
                .with_reason("provide new content or at least one field"));
        }
        let id = BlockId::from(params.section_id.as_str());
        let content = params.content.clone();
        let fields = params.fields.clone();

        self.edit_sections(params.page_id, params.expected_version, |list| {
            let block = find(list, &id)?;
            let mut draft = BlockDraft::open(block.content());
            if let Some(content) = content {
                let block_type = block.block_type().ok_or_else(|| {
                    SiteError::invalid_input("content").with_reason(format!(
                        "cannot edit unrecognized block '{}'",
                        block.type_name()
                    ))
                })?;
                draft.replace(BlockContent::typed(block_type, content).map_err(|e| {
                    SiteError::invalid_input("content").with_reason(e.to_string())
                })?)?;
            }
            for field in &fields {
                draft.set_field(&field.name, &field.value)?;
            }
            list.update_content(&id, draft.into_draft());
            committed(list, &id)
        })
        .await
    }

    /// Merges style overrides into a section; `null` removes a property.
    pub async fn update_section_styles(
        &self,
        params: &UpdateSectionStyles,
    ) -> Result<Edited<ContentBlock>> {
        let id = BlockId::from(params.section_id.as_str());
        let partial = StyleMap::from(params.styles.clone());
        self.edit_sections(params.page_id, params.expected_version, |list| {
            find(list, &id)?;
            list.update_styles(&id, &partial);
            committed(list, &id)
        })
        .await
    }

    /// Uploads an image and points an image block (or a hero's background)
    /// at it. If the page cannot be saved the upload is discarded again.
    pub async fn upload_image(
        &self,
        params: &UploadImage,
        bytes: &[u8],
    ) -> Result<Edited<ContentBlock>> {
        self.upload_image_with(&self.uploader(), params, bytes).await
    }

    pub async fn upload_image_with<U: ImageUploader>(
        &self,
        uploader: &U,
        params: &UploadImage,
        bytes: &[u8],
    ) -> Result<Edited<ContentBlock>> {
        let id = BlockId::from(params.section_id.as_str());
        let loaded = self.load(params.page_id).await?;
        let field = image_field(find(&loaded.sections, &id)?)?;

        let url = uploader.upload(&params.file_name, bytes).await?;
        let expected = params.expected_version.or(Some(loaded.version));

        let linked = url.clone();
        let result = self
            .edit_sections(params.page_id, expected, |list| {
                let block = find(list, &id)?;
                let content = block
                    .content()
                    .with_field(field, Value::String(linked))?;
                list.update_content(&id, content);
                committed(list, &id)
            })
            .await;

        if let Err(e) = &result {
            warn!("Upload {url} not attached to page {}: {e}", params.page_id);
            if let Err(discard) = uploader.discard(&url).await {
                warn!("Failed to remove orphaned upload {url}: {discard}");
            }
        }
        result
    }
}

/// Content field an uploaded image URL goes into.
fn image_field(block: &ContentBlock) -> Result<&'static str> {
    match block.block_type() {
        Some(BlockType::Image) => Ok("url"),
        Some(BlockType::Hero) => Ok("backgroundImage"),
        _ => Err(SiteError::Upload {
            message: format!(
                "section {} is a '{}' block and takes no image",
                block.id().as_str(),
                block.type_name()
            ),
        }),
    }
}
