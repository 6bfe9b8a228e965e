//! Stable DTOs and IDs used across the cgad workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable string IDs, reason tokens and sentinels

#![forbid(unsafe_code)]

pub mod ids;
pub mod receipt;

pub use receipt::{
    CgadReport, ConstraintResult, ReportInputs, ResultRecord, RunMeta, SCHEMA_REPORT_V1, ToolMeta,
    Verdict, VerdictCounts, VerdictStatus,
};
