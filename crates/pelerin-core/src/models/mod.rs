//! Data models for pages, blocks, CMS entries and pilgrimages.
//!
//! Display implementations for these models live in
//! [`crate::display::models`]; view-mode HTML lives in [`crate::render`].
//!
//! # Blocks
//!
//! A [`ContentBlock`] pairs a stable [`BlockId`] with a [`BlockContent`]
//! variant (one record type per [`BlockType`]) and a [`StyleMap`] of
//! overrides. Stored JSON keeps the `{id, type, content, styles}` shape:
//!
//! ```rust
//! use pelerin_core::models::{BlockContent, BlockType, ContentBlock};
//!
//! let block: ContentBlock = serde_json::from_str(
//!     r#"{"id": "b1", "type": "heading", "content": {"text": "Athos"}}"#,
//! )?;
//! assert_eq!(block.block_type(), Some(BlockType::Heading));
//! match block.content() {
//!     // Missing fields come back with the edit-form fallbacks.
//!     BlockContent::Heading(heading) => assert_eq!(heading.size, 24),
//!     _ => unreachable!(),
//! }
//! # Ok::<(), serde_json::Error>(())
//! ```

pub mod block;
pub mod cms;
pub mod content;
pub mod page;
pub mod pilgrimage;
pub mod style;
pub mod text;
pub mod user;


pub use block::{BlockContent, BlockId, BlockType, ContentBlock};
pub use cms::{CmsContentType, CmsEntry};
pub use page::{Page, PageSummary, SaveMode};
pub use pilgrimage::{Pilgrimage, PilgrimageFilter};
pub use style::StyleMap;
pub use user::{CurrentUser, Role};
