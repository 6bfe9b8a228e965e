use anyhow::Context;
use cgad_render::{RenderableReport, RenderableResult};
use cgad_types::{
    CgadReport, ReportInputs, RunMeta, SCHEMA_REPORT_V1, ToolMeta, Verdict, VerdictCounts,
    VerdictStatus, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<CgadReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }
    serde_json::from_value(value).context("parse cgad report")
}

pub fn serialize_report(report: &CgadReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &CgadReport) -> RenderableReport {
    RenderableReport {
        model: report.inputs.model.clone(),
        state: report.inputs.state.clone(),
        results: report
            .constraint_results()
            .map(|r| RenderableResult {
                name: r.name.clone(),
                ok: r.ok,
                error: r.error.clone(),
            })
            .collect(),
    }
}

/// A report for a run that never reached evaluation (load, config or
/// normalization failure), so `--report-out` still produces a receipt.
pub fn runtime_error_report(model: &str, state: &str, message: &str, reason: &str) -> CgadReport {
    let now = OffsetDateTime::now_utc();
    let mut reasons = vec![reason.to_string()];
    if reason != ids::REASON_RUNTIME_ERROR {
        reasons.push(ids::REASON_RUNTIME_ERROR.to_string());
    }
    tracing::debug!(error = %message, reason, "building runtime error report");

    CgadReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        run: RunMeta {
            started_at: now,
            ended_at: Some(now),
            duration_ms: Some(0),
        },
        inputs: ReportInputs {
            model: model.to_string(),
            state: state.to_string(),
        },
        verdict: Verdict {
            status: VerdictStatus::Error,
            counts: VerdictCounts::default(),
            reasons,
            message: Some(message.to_string()),
        },
        results: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_error_report_has_error_status() {
        let report = runtime_error_report("m.yaml", "s.json", "boom", ids::REASON_LOAD_ERROR);
        assert_eq!(report.verdict.status, VerdictStatus::Error);
        assert_eq!(
            report.verdict.reasons,
            vec!["load_error".to_string(), "runtime_error".to_string()]
        );
        assert!(report.results.is_empty());
    }

    #[test]
    fn runtime_error_report_keeps_the_message() {
        let report = runtime_error_report(
            "m.yaml",
            "s.json",
            "load model: failed to read m.yaml",
            ids::REASON_LOAD_ERROR,
        );
        let text = String::from_utf8(serialize_report(&report).expect("serialize")).expect("utf8");
        assert!(text.contains("\"message\": \"load model: failed to read m.yaml\""));
    }

    #[test]
    fn serialized_report_parses_back() {
        let report = runtime_error_report("m.yaml", "s.json", "boom", ids::REASON_RUNTIME_ERROR);
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        let parsed = parse_report_json(&text).expect("parse");
        assert_eq!(parsed.verdict.reasons, vec!["runtime_error".to_string()]);
        assert_eq!(parsed.inputs.model, "m.yaml");
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let err = parse_report_json(r#"{"schema": "cgad.report.v0"}"#).expect_err("schema");
        assert!(err.to_string().contains("unknown report schema"));
    }
}
