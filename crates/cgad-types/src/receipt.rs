use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for cgad reports.
pub const SCHEMA_REPORT_V1: &str = "cgad.report.v1";

/// Outcome of evaluating one named constraint.
///
/// `error` is only populated when evaluation itself failed (syntax error, undefined
/// name, type error, ...). A constraint that evaluated cleanly to a falsy value has
/// `ok == false` and no error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConstraintResult {
    pub name: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConstraintResult {
    pub fn satisfied(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: true,
            error: None,
        }
    }

    pub fn violated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: false,
            error: None,
        }
    }

    pub fn errored(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: false,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A result as it appears in the JSON report, with the source expression and a
/// stable fingerprint for trending across runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultRecord {
    #[serde(flatten)]
    pub result: ConstraintResult,
    pub expr: String,
    pub fingerprint: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Pass,
    Fail,
    Error,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VerdictCounts {
    pub total: u32,
    pub satisfied: u32,
    pub violated: u32,
    /// Subset of `violated` whose evaluation raised an error.
    pub errored: u32,
}

impl VerdictCounts {
    pub fn from_results(results: &[ConstraintResult]) -> Self {
        let mut counts = VerdictCounts::default();
        for r in results {
            counts.total += 1;
            if r.ok {
                counts.satisfied += 1;
            } else {
                counts.violated += 1;
                if r.is_error() {
                    counts.errored += 1;
                }
            }
        }
        counts
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub counts: VerdictCounts,
    /// Reason tokens (see [`crate::ids`]).
    #[serde(default)]
    pub reasons: Vec<String>,
    /// What went wrong when the run aborted before evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMeta {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "Option<String>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportInputs {
    pub model: String,
    pub state: String,
}

/// The report envelope written by `--report-out`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CgadReport {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub run: RunMeta,
    pub inputs: ReportInputs,
    pub verdict: Verdict,
    /// Results in declared model order.
    pub results: Vec<ResultRecord>,
}

impl CgadReport {
    pub fn constraint_results(&self) -> impl Iterator<Item = &ConstraintResult> {
        self.results.iter().map(|r| &r.result)
    }

    pub fn violated(&self) -> impl Iterator<Item = &ConstraintResult> {
        self.constraint_results().filter(|r| !r.ok)
    }
}
