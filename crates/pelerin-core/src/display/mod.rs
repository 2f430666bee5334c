//! Display formatting and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation outcomes are wrapped in newtypes so the same
//! data can be formatted per context. Everything here produces markdown for
//! the terminal renderer and MCP responses. View-mode HTML is a separate
//! concern handled by [`crate::render`].
//!
//! ```rust
//! use pelerin_core::display::OperationStatus;
//!
//! let done = OperationStatus::success("Moved section up".to_string());
//! assert_eq!(format!("{done}"), "Success: Moved section up\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{CmsEntries, PageSummaries, Pilgrimages};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
