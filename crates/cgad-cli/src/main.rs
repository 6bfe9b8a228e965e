//! CLI entry point for cgad-check.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup, I/O, and
//! exit codes. All business logic lives in the `cgad-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use cgad_app::{
    CheckInput, exit_code_for_error, preflight, render_markdown, render_text, run_check,
    runtime_error_report, verdict_exit_code, write_report, write_text,
};
use cgad_loader::LoadError;
use cgad_settings::Overrides;
use cgad_types::ids;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(
    name = "cgad-check",
    version,
    about = "Check a CGAD constraint model against a JSON session state"
)]
struct Cli {
    /// Path to the constraint model (CGAD-*.cas.yaml, or .json).
    #[arg(long)]
    model_path: Utf8PathBuf,

    /// Path to the JSON file describing session state.
    #[arg(long)]
    state_json: Utf8PathBuf,

    /// Path to cgad config TOML. A missing file means defaults.
    #[arg(long, default_value = "cgad.toml")]
    config: Utf8PathBuf,

    /// Extra prefix to expose as a nested group (repeatable).
    #[arg(long = "prefix", value_name = "NAME")]
    prefixes: Vec<String>,

    /// Override the leaf/prefix conflict policy (reject|prefer_nested).
    #[arg(long)]
    conflict: Option<String>,

    /// Also write the JSON report to this path.
    #[arg(long)]
    report_out: Option<Utf8PathBuf>,

    /// Also write a Markdown report to this path.
    #[arg(long)]
    markdown_out: Option<Utf8PathBuf>,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cmd_check(&cli) {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(err) => {
            if let Some(report_out) = &cli.report_out {
                let report = runtime_error_report(
                    cli.model_path.as_str(),
                    cli.state_json.as_str(),
                    &format!("{err:#}"),
                    error_reason(&err),
                );
                let _ = write_report(report_out, &report);
            }
            eprintln!("cgad-check error: {err:#}");
            std::process::exit(exit_code_for_error(&err));
        }
    }
}

fn cmd_check(cli: &Cli) -> anyhow::Result<i32> {
    // Must happen before any file (config included) is opened.
    preflight(&cli.model_path)?;

    let cfg_text = read_config(&cli.config)?;

    let input = CheckInput {
        model_path: &cli.model_path,
        state_path: &cli.state_json,
        config_text: &cfg_text,
        overrides: Overrides {
            prefixes: cli.prefixes.clone(),
            conflict: cli.conflict.clone(),
        },
    };

    let output = run_check(input)?;
    tracing::info!(
        prefixes = ?output.resolved_config.effective.prefixes,
        conflict = output.resolved_config.effective.conflict.as_str(),
        "resolved config"
    );

    print!("{}", render_text(&output.report));

    if let Some(path) = &cli.report_out {
        write_report(path, &output.report).context("write report json")?;
    }
    if let Some(path) = &cli.markdown_out {
        write_text(path, &render_markdown(&output.report)).context("write markdown")?;
    }

    Ok(verdict_exit_code(output.report.verdict.status))
}

/// Missing config means defaults; any other read failure is fatal.
fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path, "config not found; using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config {path}")),
    }
}

fn error_reason(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<LoadError>() {
        Some(load) if load.is_parser_unavailable() => ids::REASON_PARSER_UNAVAILABLE,
        Some(_) => ids::REASON_LOAD_ERROR,
        None if err.downcast_ref::<cgad_domain::NormalizeError>().is_some() => {
            ids::REASON_LOAD_ERROR
        }
        None => ids::REASON_RUNTIME_ERROR,
    }
}

/// Logs go to stderr so stdout stays reserved for the summary.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}
