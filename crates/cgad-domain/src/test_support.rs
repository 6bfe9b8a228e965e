use crate::env::{NormalizedEnvironment, SessionState, normalize};
use crate::model::{Constraint, ConstraintModel};
use crate::policy::{ConflictPolicy, EffectiveConfig};

pub const DEFAULT_PREFIXES: [&str; 5] = ["tests", "plan", "cpsc", "command", "ddf"];

pub fn default_config() -> EffectiveConfig {
    EffectiveConfig::new(DEFAULT_PREFIXES, ConflictPolicy::Reject)
}

pub fn state(value: serde_json::Value) -> SessionState {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("test state must be a JSON object, got {other}"),
    }
}

pub fn env_from(value: serde_json::Value) -> NormalizedEnvironment {
    normalize(&state(value), &default_config()).expect("normalize test state")
}

pub fn model(entries: &[(&str, &str)]) -> ConstraintModel {
    entries
        .iter()
        .map(|(name, expr)| Constraint::new(*name, *expr))
        .collect()
}
