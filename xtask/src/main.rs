//! Developer tasks (schema generation, report conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(cgad_types::CgadReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(cgad_settings::CgadConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "cgad.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "cgad.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Token pattern for verdict reasons.
fn is_valid_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn model_file(fixture_dir: &Path) -> Option<&'static str> {
    ["model.cas.yaml", "model.json"]
        .into_iter()
        .find(|name| fixture_dir.join(name).exists())
}

/// Run the built cgad-check binary over every fixture and validate the
/// `--report-out` envelope against the generated report schema.
fn conform() -> anyhow::Result<()> {
    let schema_value = serde_json::to_value(generate_report_schema())?;
    let compiled = jsonschema::validator_for(&schema_value)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))?;

    let bin = project_root().join("target").join("debug").join("cgad-check");
    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");
    if !bin.exists() {
        bail!(
            "cgad-check binary not found at {}.\nRun `cargo build -p cgad-cli` first.",
            bin.display()
        );
    }

    let fixtures_dir = cgad_test_util::fixtures_dir();
    let mut entries: Vec<_> = fs::read_dir(&fixtures_dir)
        .context("Failed to read tests/fixtures/")?
        .collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut errors = Vec::new();
    for entry in entries {
        let fixture_dir = entry.path();
        let Some(model) = model_file(&fixture_dir) else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().to_string();

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let report_out = temp_dir.path().join("report.json");

        let output = std::process::Command::new(&bin)
            .current_dir(&fixture_dir)
            .args(["--model-path", model, "--state-json", "state.json", "--report-out"])
            .arg(&report_out)
            .output()
            .with_context(|| format!("Failed to run cgad-check on fixture '{name}'"))?;

        let Ok(text) = fs::read_to_string(&report_out) else {
            errors.push(format!(
                "fixture '{name}': no report written (exit {:?})",
                output.status.code()
            ));
            continue;
        };
        let report: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse report for fixture '{name}'"))?;

        if let Err(err) = cgad_app::parse_report_json(&text) {
            errors.push(format!("fixture '{name}': typed report: {err:#}"));
        }

        for err in compiled.iter_errors(&report) {
            errors.push(format!("fixture '{name}': schema validation: {err}"));
        }

        let reasons = report["verdict"]["reasons"].as_array().cloned().unwrap_or_default();
        for reason in reasons {
            let token = reason.as_str().unwrap_or_default();
            if !is_valid_token(token) {
                errors.push(format!("fixture '{name}': invalid reason token '{token}'"));
            }
        }

        let status = report["verdict"]["status"].as_str().unwrap_or_default();
        let expected_code = if status == "pass" { 0 } else { 1 };
        if output.status.code() != Some(expected_code) {
            errors.push(format!(
                "fixture '{name}': verdict '{status}' but exit {:?}",
                output.status.code()
            ));
        }

        let normalized = cgad_test_util::normalize_nondeterministic(report);
        let golden_path = fixture_dir.join("expected.report.json");
        if golden_path.exists() {
            let golden: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&golden_path)?)?;
            if golden != normalized {
                errors.push(format!("fixture '{name}': differs from expected.report.json"));
                continue;
            }
        }
        println!("  ✓ fixture '{name}' produces a valid cgad.report.v1 envelope");
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ Conformance checks passed!");
    Ok(())
}

/// Run the test suites that only compile without the `yaml` feature, where a
/// YAML model must fail with exit status 2 before any file is read.
fn test_no_yaml() -> anyhow::Result<()> {
    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let status = std::process::Command::new(cargo)
        .current_dir(project_root())
        .args([
            "test",
            "-p",
            "cgad-loader",
            "-p",
            "cgad-app",
            "-p",
            "cgad-cli",
            "--no-default-features",
        ])
        .status()
        .context("Failed to run cargo test")?;

    if !status.success() {
        bail!("tests without the yaml feature failed ({status})");
    }
    println!("\n✓ Tests without the yaml feature passed!");
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Run cgad-check on tests/fixtures and validate the reports");
    eprintln!("  test-no-yaml      Run loader/app/cli tests built without the yaml feature");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "test-no-yaml" => test_no_yaml(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
