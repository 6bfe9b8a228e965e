use crate::RenderableReport;

/// Console summary printed to stdout.
///
/// ```text
/// Model: <model>
/// State: <state>
///
/// - [OK] <name>
/// - [FAIL] <name> (error: <message>)
///
/// <n> constraint(s) violated.
/// ```
pub fn render_text(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Model: {}\n", report.model));
    out.push_str(&format!("State: {}\n", report.state));
    out.push('\n');

    for r in &report.results {
        let status = if r.ok { "OK" } else { "FAIL" };
        out.push_str(&format!("- [{}] {}", status, r.name));
        if let Some(error) = r.error.as_deref().filter(|e| !e.is_empty()) {
            out.push_str(&format!(" (error: {})", error));
        }
        out.push('\n');
    }

    out.push('\n');
    match report.violated() {
        0 => out.push_str("All constraints satisfied.\n"),
        n => out.push_str(&format!("{} constraint(s) violated.\n", n)),
    }

    out
}
