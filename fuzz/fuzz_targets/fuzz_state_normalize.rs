//! Fuzz target for session state normalization.
//!
//! Goal: normalization should **never panic**; conflicts come back as errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_state_normalize
//! ```

#![no_main]

use arbitrary::Arbitrary;
use cgad_domain::policy::{ConflictPolicy, EffectiveConfig};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

/// Structured input: dotted keys plus the prefixes to group under.
#[derive(Arbitrary, Debug)]
struct StateInput {
    keys: Vec<(String, i64)>,
    prefixes: Vec<String>,
    prefer_nested: bool,
}

fuzz_target!(|input: StateInput| {
    if input.keys.len() > 64 || input.prefixes.len() > 8 {
        return;
    }

    let state: Map<String, Value> = input
        .keys
        .into_iter()
        .filter(|(k, _)| k.len() <= 128)
        .map(|(k, v)| (k, Value::from(v)))
        .collect();
    let policy = if input.prefer_nested {
        ConflictPolicy::PreferNested
    } else {
        ConflictPolicy::Reject
    };
    let cfg = EffectiveConfig::new(input.prefixes, policy);

    if let Ok(env) = cgad_domain::normalize(&state, &cfg) {
        for name in env.group_names() {
            let _ = env.get(name);
        }
    }
});
