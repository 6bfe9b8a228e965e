//! Use case orchestration for cgad.
//!
//! This crate provides the application layer: use cases that coordinate the loader, domain,
//! settings, and render layers. It is intentionally thin and delegates heavy lifting to them.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod render;
mod report;

pub use check::{
    CheckInput, CheckOutput, exit_code_for_error, preflight, run_check, verdict_exit_code,
};
pub use render::{render_markdown, render_text, write_report, write_text};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
