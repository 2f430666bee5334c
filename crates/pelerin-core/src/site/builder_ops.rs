//! Builder-tool page operations.

use log::info;

use super::{section_ops::Edited, Site};
use crate::{
    builder::{BuilderPage, ComponentContent, ComponentType},
    db::utils::{resolve_slug, validate_title},
    error::{Result, SiteError},
    models::{BlockId, PageSummary, SaveMode},
    params::{AddBuilderSection, AddComponent, CreateBuilderPage, Id},
};

impl Site {
    pub async fn create_builder_page(&self, params: &CreateBuilderPage) -> Result<BuilderPage> {
        let title = validate_title(&params.title)?.to_string();
        let slug = resolve_slug(&title, params.slug.as_deref())?;

        let page = self
            .with_db(move |db| db.create_builder_page(&title, &slug))
            .await?;
        info!("Created builder page {} '{}'", page.id, page.title);
        Ok(page)
    }

    pub async fn get_builder_page(&self, params: &Id) -> Result<Option<BuilderPage>> {
        let id = params.id;
        self.with_db(move |db| db.get_builder_page(id)).await
    }

    pub async fn require_builder_page(&self, params: &Id) -> Result<BuilderPage> {
        self.get_builder_page(params)
            .await?
            .ok_or(SiteError::BuilderPageNotFound { id: params.id })
    }

    /// Writes a whole builder page and returns its new version.
    pub async fn save_builder_page(&self, page: &BuilderPage, mode: SaveMode) -> Result<u64> {
        let page = page.clone();
        self.with_db(move |db| db.save_builder_page(&page, mode))
            .await
    }

    pub async fn list_builder_pages(&self) -> Result<Vec<PageSummary>> {
        self.with_db(|db| db.list_builder_pages()).await
    }

    pub async fn delete_builder_page(&self, params: &Id) -> Result<BuilderPage> {
        let id = params.id;
        let page = self
            .with_db(move |db| db.delete_builder_page(id))
            .await?
            .ok_or(SiteError::BuilderPageNotFound { id })?;
        info!("Deleted builder page {id} '{}'", page.title);
        Ok(page)
    }

    /// Load, mutate, save for builder pages, mirroring the section commands.
    async fn edit_builder_page<T>(
        &self,
        page_id: u64,
        op: impl FnOnce(&mut BuilderPage) -> Result<T>,
    ) -> Result<Edited<T>> {
        let mut page = self.require_builder_page(&Id { id: page_id }).await?;
        let loaded_version = page.version;
        let value = op(&mut page)?;
        let version = self
            .save_builder_page(&page, SaveMode::Expect(loaded_version))
            .await?;
        Ok(Edited {
            value,
            version,
            saved: true,
        })
    }

    /// Adds a named, empty section and returns its id.
    pub async fn add_builder_section(&self, params: &AddBuilderSection) -> Result<Edited<BlockId>> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err(SiteError::invalid_input("name").with_reason("section name cannot be empty"));
        }
        let position = params.position;
        self.edit_builder_page(params.page_id, |page| {
            Ok(page.add_section(name, position))
        })
        .await
    }

    /// Adds a component to a section, with the type's defaults or the given
    /// content, and returns its id.
    pub async fn add_component(&self, params: &AddComponent) -> Result<Edited<BlockId>> {
        let component_type: ComponentType = params
            .component_type
            .parse()
            .map_err(|e: String| SiteError::invalid_input("component_type").with_reason(e))?;
        let content = match params.content.clone() {
            Some(value) => match ComponentContent::from_parts(component_type.as_str(), value) {
                ComponentContent::Unrecognized { .. } => {
                    return Err(SiteError::invalid_input("content").with_reason(format!(
                        "content does not fit a '{component_type}' component"
                    )))
                }
                parsed => Some(parsed),
            },
            None => None,
        };
        let section_id = BlockId::from(params.section_id.as_str());
        let position = params.position;

        self.edit_builder_page(params.page_id, |page| {
            let section = page
                .section_mut(&section_id)
                .ok_or_else(|| SiteError::SectionNotFound {
                    id: section_id.as_str().to_string(),
                })?;
            let id = section.add_component(component_type, position);
            if let Some(content) = content {
                section.update_component(&id, content);
            }
            Ok(id)
        })
        .await
    }
}
