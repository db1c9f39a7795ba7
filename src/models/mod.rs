//! Data models for link boards.
//!
//! Field names are camelCase on the wire so stored documents stay readable by
//! the board editor.

mod cell;
mod link;
mod linker;
mod page;
mod view;

pub use cell::*;
pub use link::*;
pub use linker::*;
pub use page::*;
pub use view::*;
