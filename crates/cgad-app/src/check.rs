//! The `check` use case: load inputs, normalize state, evaluate constraints, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use cgad_loader::LoadError;
use cgad_settings::{Overrides, ResolvedConfig};
use cgad_types::{
    CgadReport, ReportInputs, RunMeta, SCHEMA_REPORT_V1, ToolMeta, Verdict, VerdictStatus, ids,
};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Constraint model (YAML or JSON).
    pub model_path: &'a Utf8Path,
    /// Session state snapshot (JSON object).
    pub state_path: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: CgadReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Dependency check that must run before any input file is opened.
pub fn preflight(model_path: &Utf8Path) -> anyhow::Result<()> {
    cgad_loader::ensure_parser_available(model_path)?;
    Ok(())
}

/// Run the check use case: parse config, load inputs, evaluate, produce report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    preflight(input.model_path)?;

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        cgad_settings::CgadConfigV1::default()
    } else {
        cgad_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        cgad_settings::resolve_config(cfg, input.overrides.clone()).context("resolve config")?;

    let model = cgad_loader::load_model(input.model_path).context("load model")?;
    let state = cgad_loader::load_state(input.state_path).context("load state")?;

    let env = cgad_domain::normalize(&state, &resolved.effective).context("normalize state")?;

    let domain_report = cgad_domain::evaluate(&model, &env);
    let cgad_domain::report::DomainReport {
        results,
        verdict: status,
        counts,
    } = domain_report;

    let mut reasons = Vec::new();
    if counts.violated > counts.errored {
        reasons.push(ids::REASON_CONSTRAINT_VIOLATED.to_string());
    }
    if counts.errored > 0 {
        reasons.push(ids::REASON_EVALUATION_ERROR.to_string());
    }

    let finished_at = OffsetDateTime::now_utc();
    let duration_ms = (finished_at - started_at).whole_milliseconds().max(0) as u64;

    tracing::debug!(
        total = counts.total,
        violated = counts.violated,
        errored = counts.errored,
        duration_ms,
        "check finished"
    );

    let report = CgadReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        run: RunMeta {
            started_at,
            ended_at: Some(finished_at),
            duration_ms: Some(duration_ms),
        },
        inputs: ReportInputs {
            model: input.model_path.to_string(),
            state: input.state_path.to_string(),
        },
        verdict: Verdict {
            status,
            counts,
            reasons,
            message: None,
        },
        results,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = every constraint satisfied, 1 = anything else.
pub fn verdict_exit_code(status: VerdictStatus) -> i32 {
    match status {
        VerdictStatus::Pass => 0,
        VerdictStatus::Fail => 1,
        VerdictStatus::Error => 1,
    }
}

/// Map a fatal error to an exit code: 2 when the model parser is missing from
/// this build, 1 for every other load or config failure.
pub fn exit_code_for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<LoadError>() {
        Some(load) if load.is_parser_unavailable() => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use cgad_domain::policy::ConflictPolicy;

    struct Fixture {
        _tmp: tempfile::TempDir,
        model: Utf8PathBuf,
        state: Utf8PathBuf,
    }

    fn fixture(model: &str, state: &str) -> Fixture {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        let model_path = root.join("model.json");
        let state_path = root.join("state.json");
        std::fs::write(&model_path, model).expect("write model");
        std::fs::write(&state_path, state).expect("write state");
        Fixture {
            _tmp: tmp,
            model: model_path,
            state: state_path,
        }
    }

    fn check(f: &Fixture, config_text: &str) -> anyhow::Result<CheckOutput> {
        run_check(CheckInput {
            model_path: &f.model,
            state_path: &f.state,
            config_text,
            overrides: Overrides::default(),
        })
    }

    const MODEL: &str = r#"{"constraints": [
        {"name": "c1", "expr": "tests.status == 'pass'"},
        {"name": "c2", "expr": "plan.ready -> tests.status == 'pass'"}
    ]}"#;

    #[test]
    fn passing_state_produces_pass_report() {
        let f = fixture(MODEL, r#"{"tests.status": "pass", "plan.ready": true}"#);
        let output = check(&f, "").expect("run_check");

        let report = output.report;
        assert_eq!(report.schema, SCHEMA_REPORT_V1);
        assert_eq!(report.tool.name, "cgad-check");
        assert_eq!(report.verdict.status, VerdictStatus::Pass);
        assert!(report.verdict.reasons.is_empty());
        assert_eq!(report.inputs.model, f.model.as_str());
        assert_eq!(output.resolved_config.effective.conflict, ConflictPolicy::Reject);
    }

    #[test]
    fn failing_state_lists_reasons() {
        let f = fixture(
            r#"{"constraints": [
                {"name": "c1", "expr": "tests.status == 'pass'"},
                {"name": "c2", "expr": "nope == 1"}
            ]}"#,
            r#"{"tests.status": "fail"}"#,
        );
        let report = check(&f, "").expect("run_check").report;

        assert_eq!(report.verdict.status, VerdictStatus::Fail);
        assert_eq!(
            report.verdict.reasons,
            vec![
                ids::REASON_CONSTRAINT_VIOLATED.to_string(),
                ids::REASON_EVALUATION_ERROR.to_string(),
            ]
        );
        assert_eq!(verdict_exit_code(report.verdict.status), 1);
    }

    #[test]
    fn config_prefixes_change_grouping() {
        let f = fixture(
            r#"{"constraints": [{"name": "deploy", "expr": "deploy.env.name == 'prod'"}]}"#,
            r#"{"deploy.env.name": "prod"}"#,
        );
        let report = check(&f, "extra_prefixes = [\"deploy\"]").expect("run_check").report;
        assert_eq!(report.verdict.status, VerdictStatus::Pass);
    }

    #[test]
    fn conflicting_state_is_fatal() {
        let f = fixture(MODEL, r#"{"tests": 1, "tests.status": "pass"}"#);
        let err = check(&f, "").expect_err("conflict");
        assert!(format!("{err:#}").contains("normalize state"));
        assert_eq!(exit_code_for_error(&err), 1);

        let relaxed = check(&f, "conflict = \"prefer_nested\"").expect("prefer nested");
        assert_eq!(relaxed.report.results.len(), 2);
    }

    #[test]
    fn missing_state_is_a_load_error() {
        let f = fixture(MODEL, "{}");
        let missing = f.state.with_file_name("absent.json");
        let err = run_check(CheckInput {
            model_path: &f.model,
            state_path: &missing,
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect_err("missing state");
        assert!(err.downcast_ref::<LoadError>().is_some());
        assert_eq!(exit_code_for_error(&err), 1);
    }

    #[test]
    fn parser_unavailable_maps_to_two() {
        let err = anyhow::Error::new(LoadError::ParserUnavailable {
            format: "YAML",
            feature: "yaml",
            path: Utf8PathBuf::from("m.cas.yaml"),
        })
        .context("load model");
        assert_eq!(exit_code_for_error(&err), 2);
    }

    #[cfg(not(feature = "yaml"))]
    #[test]
    fn preflight_rejects_yaml_models_without_parser() {
        let err = preflight(Utf8Path::new("absent.cas.yaml")).expect_err("parser unavailable");
        assert_eq!(exit_code_for_error(&err), 2);
        assert!(preflight(Utf8Path::new("absent.json")).is_ok());
    }

    #[test]
    fn verdict_exit_codes() {
        assert_eq!(verdict_exit_code(VerdictStatus::Pass), 0);
        assert_eq!(verdict_exit_code(VerdictStatus::Fail), 1);
        assert_eq!(verdict_exit_code(VerdictStatus::Error), 1);
    }
}
