//! MCP server for Pelerin
//!
//! Exposes page, section, CMS and pilgrimage operations as tools over the
//! Model Context Protocol so an assistant can build pages. Tool calls act
//! with the role the server was started with.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use pelerin_core::{CurrentUser, Site};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{
    AddSection, CmsKey, CreatePage, Id, ListPilgrimages, McpResult, ReorderSection, SectionRef,
    SetCms, StepSection, UpdateSectionContent, UpdateSectionStyles,
};

use handlers::McpHandlers;

#[derive(Clone)]
pub struct PelerinMcpServer {
    site: Arc<Site>,
    user: CurrentUser,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PelerinMcpServer {
    pub fn new(site: Site, user: CurrentUser) -> Self {
        Self {
            site: Arc::new(site),
            user,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> McpHandlers {
        McpHandlers::new(self.site.clone(), self.user.clone())
    }

    #[tool(
        name = "list_pages",
        description = "List all pages with their slug, number of sections and last update. Use the page ID from here with show_page and the section tools."
    )]
    async fn list_pages(&self) -> McpResult {
        self.handlers().list_pages().await
    }

    #[tool(
        name = "show_page",
        description = "Show one page: title, slug, current version and its sections in order, each with its section ID and type. Pass the version as expected_version to section tools to avoid overwriting concurrent edits."
    )]
    async fn show_page(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_page(params).await
    }

    #[tool(
        name = "render_page",
        description = "Render a page to the HTML visitors see, with pilgrimage listings and CMS placeholders filled in."
    )]
    async fn render_page(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().render_page(params).await
    }

    #[tool(
        name = "create_page",
        description = "Create an empty page. Provide a title; the slug is derived from it (diacritics removed, lowercase, dashes) unless given. Slugs must be unique."
    )]
    async fn create_page(&self, params: Parameters<CreatePage>) -> McpResult {
        self.handlers().create_page(params).await
    }

    #[tool(
        name = "add_section",
        description = "Add a section to a page. block_type is one of heading, text, image, hero, cards, features, banners, cta, pilgrimages; the section starts with that type's default content. position is zero-based and the section is appended when it is omitted or past the end."
    )]
    async fn add_section(&self, params: Parameters<AddSection>) -> McpResult {
        self.handlers().add_section(params).await
    }

    #[tool(
        name = "remove_section",
        description = "Remove a section from a page by its section ID."
    )]
    async fn remove_section(&self, params: Parameters<SectionRef>) -> McpResult {
        self.handlers().remove_section(params).await
    }

    #[tool(
        name = "move_section",
        description = "Move a section one position up or down. Moving the first section up or the last one down changes nothing."
    )]
    async fn move_section(&self, params: Parameters<StepSection>) -> McpResult {
        self.handlers().move_section(params).await
    }

    #[tool(
        name = "reorder_section",
        description = "Move a section to a zero-based position in one step, as drag and drop does. Indexes past the end move it to the last position."
    )]
    async fn reorder_section(&self, params: Parameters<ReorderSection>) -> McpResult {
        self.handlers().reorder_section(params).await
    }

    #[tool(
        name = "update_section_content",
        description = "Edit a section's content. Either pass content with the whole JSON record for the section's type, or fields as name/value pairs which are coerced like the edit form does (numbers, true/false, JSON lists). The section's type never changes."
    )]
    async fn update_section_content(&self, params: Parameters<UpdateSectionContent>) -> McpResult {
        self.handlers().update_section_content(params).await
    }

    #[tool(
        name = "update_section_styles",
        description = "Merge CSS overrides into a section, using camelCase property names such as paddingTop or backgroundColor. Numbers become pixel lengths; a null value removes the property."
    )]
    async fn update_section_styles(&self, params: Parameters<UpdateSectionStyles>) -> McpResult {
        self.handlers().update_section_styles(params).await
    }

    #[tool(
        name = "get_cms",
        description = "Read one CMS entry by key, e.g. footer_contact_email."
    )]
    async fn get_cms(&self, params: Parameters<CmsKey>) -> McpResult {
        self.handlers().get_cms(params).await
    }

    #[tool(name = "list_cms", description = "List all CMS entries ordered by key.")]
    async fn list_cms(&self) -> McpResult {
        self.handlers().list_cms().await
    }

    #[tool(
        name = "set_cms",
        description = "Create or update a CMS entry. content_type is text, html or image (default text). Pages can reference entries with {{key}} placeholders."
    )]
    async fn set_cms(&self, params: Parameters<SetCms>) -> McpResult {
        self.handlers().set_cms(params).await
    }

    #[tool(
        name = "list_pilgrimages",
        description = "List pilgrimages soonest first, optionally filtered by location substring, maximum price, start date (YYYY-MM-DD), featured or available seats."
    )]
    async fn list_pilgrimages(&self, params: Parameters<ListPilgrimages>) -> McpResult {
        self.handlers().list_pilgrimages(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for PelerinMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pelerin".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(r#"Pelerin builds the pages of a pilgrimage marketplace.

## Core Concepts
- **Pages**: a title, a unique slug and an ordered list of sections
- **Sections**: typed blocks (heading, text, image, hero, cards, features, banners, cta, pilgrimages) with content and CSS style overrides
- **CMS entries**: key/value texts referenced from pages as {{key}}
- **Pilgrimages**: the catalogue shown by pilgrimages sections and cards sections with fromFeed

## Workflow
1. `list_pages` or `create_page`
2. `show_page` to see section IDs and the page version
3. `add_section`, then `update_section_content` and `update_section_styles`
4. `move_section` or `reorder_section` to arrange, `remove_section` to drop
5. `render_page` to check the result

## Concurrency
Every saved change bumps the page version. Pass the version you last saw as `expected_version`; if someone else saved in between the tool fails with a version conflict and nothing is written. Re-read the page with `show_page` and retry."#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: PelerinMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Pelerin MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
