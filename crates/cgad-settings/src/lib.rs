//! Config parsing and prefix/policy resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{CgadConfigV1, SCHEMA_CONFIG_V1};
pub use presets::{DEFAULT_PREFIXES, default_prefixes};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `cgad.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<CgadConfigV1> {
    let cfg: CgadConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective normalizer config (defaults + file + overrides).
pub fn resolve_config(cfg: CgadConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
