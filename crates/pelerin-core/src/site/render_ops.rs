//! View-mode rendering of stored pages.

use log::debug;

use super::Site;
use crate::{
    error::{Result, SiteError},
    gateway::PilgrimageFeed,
    models::PilgrimageFilter,
    params::Id,
    render::{self, RenderContext},
    sections::PageSectionList,
};

impl Site {
    /// Renders a page's sections to HTML, fetching the pilgrimage feed and
    /// CMS values only when the page uses them.
    pub async fn render_page(&self, params: &Id) -> Result<String> {
        let page = self.require_page(params).await?;
        let ctx = self.render_context(&page.sections).await?;
        debug!("Rendering page {} ({} sections)", page.id, page.sections.len());
        Ok(render::render_sections(&page.sections, &ctx))
    }

    /// Renders the page published under `slug`.
    pub async fn render_slug(&self, slug: &str) -> Result<Option<String>> {
        match self.get_page_by_slug(slug).await? {
            Some(page) => self.render_page(&Id { id: page.id }).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn render_builder_page(&self, params: &Id) -> Result<String> {
        let page = self.require_builder_page(params).await?;
        let cms = self.cms_snapshot(page.cms_keys()).await?;
        let ctx = RenderContext::new().with_cms(cms);
        Ok(render::render_builder_page(&page, &ctx))
    }

    async fn render_context(&self, sections: &PageSectionList) -> Result<RenderContext> {
        let mut ctx = RenderContext::new();
        if render::needs_feed(sections) {
            ctx = ctx.with_pilgrimages(self.list(&PilgrimageFilter::default()).await?);
        }

        // Placeholders can sit in any text field; the stored JSON has them all.
        let stored = serde_json::to_string(sections).map_err(SiteError::from)?;
        let keys = render::placeholder_keys(&stored);
        if !keys.is_empty() {
            ctx = ctx.with_cms(self.cms_snapshot(keys).await?);
        }
        Ok(ctx)
    }
}
