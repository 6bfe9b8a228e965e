//! Fuzz target for constraint expression translation, parsing and evaluation.
//!
//! Goal: a constraint expression should **never panic**, whatever the text.
//! Syntax, name and type errors are expected outcomes.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_expression
//! ```

#![no_main]

use cgad_domain::policy::{ConflictPolicy, EffectiveConfig};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    let state = json!({
        "tests.status": "pass",
        "plan.ready": true,
        "plan.steps": ["design", "build"],
        "command.retries": 3,
        "cpsc.ratio": 0.5,
        "flat": null
    });
    let Some(state) = state.as_object() else {
        return;
    };
    let cfg = EffectiveConfig::new(["tests", "plan", "cpsc", "command", "ddf"], ConflictPolicy::Reject);
    let Ok(env) = cgad_domain::normalize(state, &cfg) else {
        return;
    };

    let translated = cgad_domain::translate(text);
    let _ = cgad_domain::expr::parse(&translated);
    let _ = cgad_domain::expr::evaluate(&translated, &env);
});
