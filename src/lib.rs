//! `@[kind:label]` mention tokens for comment text: parsing, a live editor
//! that shows tokens as badges, and a terminal renderer for stored comments.

pub mod cli;
pub mod dom;
pub mod editor;
pub mod io;
pub mod model;
pub mod parse;
pub mod tui;
pub mod util;
