//! Render use cases: console text and markdown from in-memory reports, plus file output.

use anyhow::Context;
use camino::Utf8Path;
use cgad_types::CgadReport;

use crate::report::{serialize_report, to_renderable};

pub fn render_text(report: &CgadReport) -> String {
    cgad_render::render_text(&to_renderable(report))
}

pub fn render_markdown(report: &CgadReport) -> String {
    cgad_render::render_markdown(&to_renderable(report))
}

/// Write the JSON report envelope, creating parent directories as needed.
pub fn write_report(path: &Utf8Path, report: &CgadReport) -> anyhow::Result<()> {
    let bytes = serialize_report(report)?;
    write_bytes(path, &bytes)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_error_report;
    use camino::Utf8PathBuf;
    use cgad_types::ids;

    #[test]
    fn error_report_renders_without_results() {
        let report = runtime_error_report("m.yaml", "s.json", "boom", ids::REASON_LOAD_ERROR);
        assert_eq!(
            render_text(&report),
            "Model: m.yaml\nState: s.json\n\n\nAll constraints satisfied.\n"
        );
    }

    #[test]
    fn write_report_creates_parent_dirs() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        let out = root.join("artifacts/cgad/report.json");

        let report = runtime_error_report("m.yaml", "s.json", "boom", ids::REASON_LOAD_ERROR);
        write_report(&out, &report).expect("write report");
        write_text(&root.join("artifacts/cgad/comment.md"), &render_markdown(&report))
            .expect("write markdown");

        let text = std::fs::read_to_string(&out).expect("read report");
        assert!(text.contains("\"schema\": \"cgad.report.v1\""));
        assert!(root.join("artifacts/cgad/comment.md").exists());
    }
}
