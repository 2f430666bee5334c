//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use pelerin_core::{
    display::{CmsEntries, CreateResult, DeleteResult, OperationStatus, PageSummaries, Pilgrimages},
    params as core, ContentBlock, CurrentUser, Edited, Site, UpdateResult,
};
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::errors::{permission_denied, to_mcp_error};

/// Transparent MCP wrapper around a core parameter type.
///
/// Deserialization and the JSON schema pass straight through to the core
/// type, so the tools accept exactly the fields the CLI converts into.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type CreatePage = McpParams<core::CreatePage>;
pub type AddSection = McpParams<core::AddSection>;
pub type SectionRef = McpParams<core::SectionRef>;
pub type StepSection = McpParams<core::StepSection>;
pub type ReorderSection = McpParams<core::ReorderSection>;
pub type UpdateSectionContent = McpParams<core::UpdateSectionContent>;
pub type UpdateSectionStyles = McpParams<core::UpdateSectionStyles>;
pub type CmsKey = McpParams<core::CmsKey>;
pub type SetCms = McpParams<core::SetCms>;
pub type ListPilgrimages = McpParams<core::ListPilgrimages>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(output: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        output.to_string(),
    )]))
}

/// A section edit as tool output: status line, the block and the version
/// to pass as `expected_version` next time.
fn section_result(message: String, edited: &Edited<ContentBlock>) -> McpResult {
    let status = if edited.saved {
        OperationStatus::success(message)
    } else {
        OperationStatus::unchanged(message)
    };
    text(format!(
        "{status}\n{}\n\nPage version: {}\n",
        edited.value, edited.version
    ))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    site: Arc<Site>,
    user: CurrentUser,
}

impl McpHandlers {
    pub fn new(site: Arc<Site>, user: CurrentUser) -> Self {
        Self { site, user }
    }

    fn require_page_editor(&self) -> Result<(), ErrorData> {
        if self.user.role.can_edit_pages() {
            Ok(())
        } else {
            Err(permission_denied(self.user.role, "edit pages"))
        }
    }

    pub async fn list_pages(&self) -> McpResult {
        debug!("list_pages");
        let pages = self
            .site
            .list_pages()
            .await
            .map_err(|e| to_mcp_error("Failed to list pages", &e))?;
        text(format!("# Pages\n\n{}", PageSummaries(pages)))
    }

    pub async fn show_page(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_page: {:?}", params);
        let page = self
            .site
            .require_page(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to show page", &e))?;
        text(page)
    }

    pub async fn render_page(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("render_page: {:?}", params);
        let html = self
            .site
            .render_page(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to render page", &e))?;
        text(html)
    }

    pub async fn create_page(&self, Parameters(params): Parameters<CreatePage>) -> McpResult {
        debug!("create_page: {:?}", params);
        self.require_page_editor()?;
        let page = self
            .site
            .create_page(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create page", &e))?;
        text(CreateResult::new(page))
    }

    pub async fn add_section(&self, Parameters(params): Parameters<AddSection>) -> McpResult {
        debug!("add_section: {:?}", params);
        self.require_page_editor()?;
        let edited = self
            .site
            .add_section(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to add section", &e))?;
        section_result(
            format!("Added section `{}`", edited.value.id().as_str()),
            &edited,
        )
    }

    pub async fn remove_section(&self, Parameters(params): Parameters<SectionRef>) -> McpResult {
        debug!("remove_section: {:?}", params);
        self.require_page_editor()?;
        let edited = self
            .site
            .remove_section(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to remove section", &e))?;
        text(format!(
            "{}\nPage version: {}\n",
            DeleteResult::new(edited.value),
            edited.version
        ))
    }

    pub async fn move_section(&self, Parameters(params): Parameters<StepSection>) -> McpResult {
        debug!("move_section: {:?}", params);
        self.require_page_editor()?;
        let inner = params.as_ref();
        let edited = self
            .site
            .move_section(inner)
            .await
            .map_err(|e| to_mcp_error("Failed to move section", &e))?;
        let status = if edited.value {
            OperationStatus::success(format!("Moved section `{}`", inner.section_id))
        } else {
            OperationStatus::unchanged(format!(
                "Section `{}` is already at the edge of the page",
                inner.section_id
            ))
        };
        text(format!("{status}\nPage version: {}\n", edited.version))
    }

    pub async fn reorder_section(
        &self,
        Parameters(params): Parameters<ReorderSection>,
    ) -> McpResult {
        debug!("reorder_section: {:?}", params);
        self.require_page_editor()?;
        let inner = params.as_ref();
        let edited = self
            .site
            .reorder_section(inner)
            .await
            .map_err(|e| to_mcp_error("Failed to reorder section", &e))?;
        let message = format!("Section `{}` is at position {}", inner.section_id, edited.value);
        let status = if edited.saved {
            OperationStatus::success(message)
        } else {
            OperationStatus::unchanged(message)
        };
        text(format!("{status}\nPage version: {}\n", edited.version))
    }

    pub async fn update_section_content(
        &self,
        Parameters(params): Parameters<UpdateSectionContent>,
    ) -> McpResult {
        debug!("update_section_content: {:?}", params);
        self.require_page_editor()?;
        let edited = self
            .site
            .update_section_content(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to update section content", &e))?;
        section_result(
            format!("Updated content of `{}`", edited.value.id().as_str()),
            &edited,
        )
    }

    pub async fn update_section_styles(
        &self,
        Parameters(params): Parameters<UpdateSectionStyles>,
    ) -> McpResult {
        debug!("update_section_styles: {:?}", params);
        self.require_page_editor()?;
        let edited = self
            .site
            .update_section_styles(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to update section styles", &e))?;
        section_result(
            format!("Updated styles of `{}`", edited.value.id().as_str()),
            &edited,
        )
    }

    pub async fn get_cms(&self, Parameters(params): Parameters<CmsKey>) -> McpResult {
        debug!("get_cms: {:?}", params);
        let entry = self
            .site
            .cms_require(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get CMS entry", &e))?;
        text(entry)
    }

    pub async fn list_cms(&self) -> McpResult {
        debug!("list_cms");
        let entries = self
            .site
            .cms_list(&core::ListCms::default())
            .await
            .map_err(|e| to_mcp_error("Failed to list CMS entries", &e))?;
        text(CmsEntries(entries))
    }

    pub async fn set_cms(&self, Parameters(params): Parameters<SetCms>) -> McpResult {
        debug!("set_cms: {:?}", params);
        if !self.user.role.can_edit_cms() {
            return Err(permission_denied(self.user.role, "edit CMS content"));
        }
        let (entry, previous) = self
            .site
            .cms_set(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to save CMS entry", &e))?;
        let changes = match previous {
            Some(old) if old != entry.value => vec![format!("value: '{old}' → '{}'", entry.value)],
            _ => Vec::new(),
        };
        text(UpdateResult::with_changes(entry, changes))
    }

    pub async fn list_pilgrimages(
        &self,
        Parameters(params): Parameters<ListPilgrimages>,
    ) -> McpResult {
        debug!("list_pilgrimages: {:?}", params);
        let pilgrimages = self
            .site
            .list_pilgrimages(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list pilgrimages", &e))?;
        text(Pilgrimages(pilgrimages))
    }
}
