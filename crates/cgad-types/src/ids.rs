//! Stable identifiers shared by the loader, engine and report.
//!
//! Reason tokens are short snake_case discriminators that end up in `verdict.reasons`.

pub const TOOL_NAME: &str = "cgad-check";

// Model sentinels
pub const UNNAMED_CONSTRAINT: &str = "<unnamed>";
pub const DEFAULT_EXPR: &str = "True";

// Reasons
pub const REASON_CONSTRAINT_VIOLATED: &str = "constraint_violated";
pub const REASON_EVALUATION_ERROR: &str = "evaluation_error";
pub const REASON_PARSER_UNAVAILABLE: &str = "parser_unavailable";
pub const REASON_LOAD_ERROR: &str = "load_error";
pub const REASON_RUNTIME_ERROR: &str = "runtime_error";
