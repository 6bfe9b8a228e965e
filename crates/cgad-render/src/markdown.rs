use crate::RenderableReport;

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# CGAD constraint report\n\n");
    let violated = report.violated();
    let verdict = if violated == 0 { "PASS" } else { "FAIL" };
    let errored = report.results.iter().filter(|r| r.error.is_some()).count();
    out.push_str(&format!(
        "- Model: `{}`\n- State: `{}`\n- Verdict: **{}**\n- Constraints: {} total, {} satisfied, {} violated ({} errored)\n\n",
        report.model,
        report.state,
        verdict,
        report.results.len(),
        report.results.len() - violated,
        violated,
        errored
    ));

    if report.results.is_empty() {
        out.push_str("No constraints.\n");
        return out;
    }

    out.push_str("## Results\n\n");

    for r in &report.results {
        let status = if r.ok { "OK" } else { "FAIL" };
        out.push_str(&format!("- [{}] `{}`\n", status, r.name));
        if let Some(error) = &r.error {
            out.push_str(&format!("  - error: {}\n", error));
        }
    }

    out
}
