use crate::model::{CgadConfigV1, SCHEMA_CONFIG_V1};
use crate::presets;
use anyhow::Context;
use cgad_domain::policy::{ConflictPolicy, EffectiveConfig};

/// Command-line overrides layered over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    /// Appended after the configured prefixes.
    pub prefixes: Vec<String>,
    pub conflict: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(cfg: CgadConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let base = cfg.prefixes.unwrap_or_else(presets::default_prefixes);

    let mut prefixes: Vec<String> = Vec::new();
    for prefix in base
        .into_iter()
        .chain(cfg.extra_prefixes)
        .chain(overrides.prefixes)
    {
        validate_prefix(&prefix).with_context(|| format!("invalid prefix '{prefix}'"))?;
        if !prefixes.contains(&prefix) {
            prefixes.push(prefix);
        }
    }

    let conflict = match overrides.conflict.or(cfg.conflict) {
        Some(v) => parse_conflict(&v)?,
        None => ConflictPolicy::default(),
    };

    Ok(ResolvedConfig {
        effective: EffectiveConfig::new(prefixes, conflict),
    })
}

fn validate_prefix(prefix: &str) -> anyhow::Result<()> {
    let mut chars = prefix.chars();
    let Some(first) = chars.next() else {
        anyhow::bail!("prefix must not be empty");
    };
    if !(first == '_' || first.is_ascii_alphabetic())
        || !chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
    {
        anyhow::bail!("prefix must be an identifier (letters, digits, '_'; no dots)");
    }
    Ok(())
}

fn parse_conflict(v: &str) -> anyhow::Result<ConflictPolicy> {
    match v {
        "reject" => Ok(ConflictPolicy::Reject),
        "prefer_nested" | "prefer-nested" => Ok(ConflictPolicy::PreferNested),
        other => anyhow::bail!("unknown conflict policy: {other} (expected reject|prefer_nested)"),
    }
}
