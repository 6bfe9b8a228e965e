//! Shared test utilities for the cgad workspace.
//!
//! Lives in its own crate so the CLI integration tests and `xtask` can both use
//! the same report normalization.

use serde_json::Value;
use std::path::PathBuf;

const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
const VERSION_PLACEHOLDER: &str = "__VERSION__";

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// Two concerns are handled separately:
///
/// 1. **Root-only**: `tool.version` is replaced with `"__VERSION__"` only
///    when the *root* object looks like a report envelope (has all five keys:
///    `schema`, `tool`, `run`, `verdict`, `results`).
///
/// 2. **Recursive**: timestamp keys (`started_at`, `ended_at`) and
///    `duration_ms` are normalized at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "run", "verdict", "results"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_envelope
            && let Some(tool_obj) = obj.get_mut("tool").and_then(Value::as_object_mut)
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String(VERSION_PLACEHOLDER.to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "ended_at"] {
                if map.contains_key(key) {
                    map.insert(
                        key.to_string(),
                        Value::String(TIMESTAMP_PLACEHOLDER.to_string()),
                    );
                }
            }
            if map.contains_key("duration_ms") {
                map.insert("duration_ms".to_string(), Value::Number(0.into()));
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

/// `<workspace>/tests/fixtures`, resolved from this crate's manifest directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("fixtures")
}
