//! Rendering utilities for the console summary and Markdown reports.
//!
//! Renderers take a [`RenderableReport`] so they stay independent of the report DTOs.

#![forbid(unsafe_code)]

mod markdown;
mod model;
mod text;

pub use markdown::render_markdown;
pub use model::{RenderableReport, RenderableResult};
pub use text::render_text;
