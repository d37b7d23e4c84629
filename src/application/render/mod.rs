//! Markdown rendering, split in two deliberately separate surfaces.
//!
//! [`preview`] is the editor's best-effort transform: an ordered list of
//! pattern substitutions covering exactly the syntax the toolbar can insert.
//! [`publish`] is the public site's full renderer. They share nothing but
//! the input type; unifying them would silently change one surface whenever
//! the other moves.

pub mod preview;
pub mod publish;

pub use preview::render_preview;
pub use publish::{RenderError, render_published};
