//! The editable node tree behind the mention editor.
//!
//! A plain string is the source of truth. [`EditorDom::from_value`] derives
//! a tree of text runs, line breaks and atomic mention badges from it, and
//! [`EditorDom::extract`] reads the exact string back. Caret positions move
//! between the two representations with [`EditorDom::cursor_offset`] and
//! [`EditorDom::position_at`].

pub mod cursor;
pub mod edit;
pub mod node;
pub mod sync;

pub use cursor::DomPosition;
pub use node::{Badge, BadgeVisual, Node, badge_visual};
pub use sync::EditorDom;
