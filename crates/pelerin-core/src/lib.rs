//! Core library of the Pelerin page builder.
//!
//! Pages of the pilgrimage marketplace are ordered lists of typed content
//! blocks (headings, heroes, card grids, pilgrimage listings, ...). This
//! crate holds the block model and its registry, the section list every
//! page edit goes through, the in-browser editor's state machine, the
//! standalone builder tool's two-level pages, the CMS key/value store, the
//! pilgrimage catalogue and view-mode HTML rendering, all persisted in
//! SQLite.
//!
//! # Layers
//!
//! - **Model** ([`models`], [`registry`], [`sections`], [`builder`]): pure,
//!   synchronous, total operations
//! - **Editor** ([`editor`]): edit mode, drafts, drag reordering; talks to
//!   storage only through the [`gateway`] traits
//! - **Service** ([`site`]): async [`Site`] over the [`db`] query modules,
//!   implementing the gateways
//! - **Output** ([`render`] for HTML, [`display`] for markdown shown by the
//!   CLI and MCP server)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pelerin_core::{
//!     params::{AddSection, CreatePage, Id},
//!     SiteBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let site = SiteBuilder::new()
//!     .with_database_path(Some("pelerin.db"))
//!     .build()
//!     .await?;
//!
//! let page = site
//!     .create_page(&CreatePage {
//!         title: "Pelerinaje".to_string(),
//!         slug: None,
//!     })
//!     .await?;
//!
//! let hero = site
//!     .add_section(&AddSection {
//!         page_id: page.id,
//!         block_type: "hero".to_string(),
//!         position: None,
//!         expected_version: None,
//!     })
//!     .await?;
//! println!("{}", hero.value);
//!
//! let html = site.render_page(&Id { id: page.id }).await?;
//! assert!(html.contains("section-hero"));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cache;
pub mod db;
pub mod display;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod models;
pub mod params;
pub mod registry;
pub mod render;
pub mod sections;
pub mod site;
pub mod upload;

pub use builder::{BuilderComponent, BuilderPage, BuilderSection, ComponentContent, ComponentType};
pub use db::Database;
pub use display::{
    CmsEntries, CreateResult, DeleteResult, OperationStatus, PageSummaries, Pilgrimages,
    UpdateResult,
};
pub use editor::{EditorMode, SectionEditor};
pub use error::{Result, SiteError};
pub use gateway::{ImageUploader, LoadedSections, PersistenceGateway, PilgrimageFeed};
pub use models::{
    BlockContent, BlockId, BlockType, CmsContentType, CmsEntry, ContentBlock, CurrentUser, Page,
    PageSummary, Pilgrimage, PilgrimageFilter, Role, SaveMode, StyleMap,
};
pub use sections::PageSectionList;
pub use site::{Edited, Site, SiteBuilder};
pub use upload::DirectoryUploader;
