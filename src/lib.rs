//! Chat client for a text-to-SQL assistant.
//!
//! Assistant replies are split into prose, highlighted SQL blocks and query
//! results by [`content`], then rendered by the FLTK views in [`ui`].

pub mod app;
pub mod chat;
pub mod content;
pub mod ui;
pub mod utils;
