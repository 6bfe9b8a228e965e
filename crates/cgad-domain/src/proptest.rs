//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - The implication rewrite
//! - Flat and grouped views of normalized state agreeing
//! - Group building not depending on key order
//! - Parsing and evaluation of arbitrary input never panicking
//! - Report order following model order

use crate::engine::evaluate;
use crate::env::{Group, NodeRef, normalize};
use crate::policy::ConflictPolicy;
use crate::expr;
use crate::model::{Constraint, ConstraintModel};
use crate::test_support::{default_config, env_from};
use crate::translate::translate;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

// ============================================================================
// Strategies
// ============================================================================

/// Boolean atoms and the expressions they evaluate to.
fn arb_bool_atom() -> impl Strategy<Value = (String, bool)> {
    prop_oneof![
        any::<bool>().prop_map(|b| (if b { "True" } else { "False" }.to_string(), b)),
        any::<bool>().prop_map(|b| (if b { "true" } else { "false" }.to_string(), b)),
        (0i64..5, 0i64..5).prop_map(|(a, b)| (format!("{a} < {b}"), a < b)),
        any::<bool>().prop_map(|b| (format!("not {}", if b { "True" } else { "False" }), !b)),
    ]
}

/// Dotted sub-keys under a prefix, segments drawn from a tiny alphabet so
/// collisions between leaves and groups are frequent.
fn arb_suffix() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 1..4)
        .prop_map(|segments| segments.join("."))
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|i| json!(i)),
        "[a-z]{0,6}".prop_map(Value::String),
        Just(Value::Null),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// `A -> B` evaluates the same as `(not (A)) or (B)` for every assignment.
    #[test]
    fn implication_law((a_src, a) in arb_bool_atom(), (b_src, b) in arb_bool_atom()) {
        let env = env_from(json!({}));
        let arrow = translate(&format!("{a_src} -> {b_src}"));
        let expanded = format!("(not ({a_src})) or ({b_src})");

        let lhs = expr::evaluate(&arrow, &env);
        let rhs = expr::evaluate(&expanded, &env);
        prop_assert_eq!(lhs.clone(), rhs);
        prop_assert_eq!(lhs, Ok(!a || b));
    }

    /// Every key under a configured prefix is reachable both flat and nested,
    /// as long as normalization accepted the state.
    #[test]
    fn flat_and_grouped_views_agree(
        entries in prop::collection::btree_map(arb_suffix(), arb_scalar(), 1..8),
        prefix in prop::sample::select(vec!["tests", "plan", "cpsc", "command", "ddf"]),
    ) {
        let mut raw = Map::new();
        for (suffix, value) in &entries {
            raw.insert(format!("{prefix}.{suffix}"), value.clone());
        }

        if let Ok(env) = normalize(&raw, &default_config()) {
            for (suffix, value) in &entries {
                let key = format!("{prefix}.{suffix}");
                prop_assert_eq!(env.flat().get(&key), Some(value));

                let nested = env
                    .group(prefix)
                    .and_then(|g| g.lookup(suffix.split('.')))
                    .and_then(NodeRef::as_value);
                prop_assert_eq!(nested, Some(value));
            }
        }
    }

    /// Building a group does not depend on the order keys arrive in.
    #[test]
    fn group_building_is_order_independent(
        entries in prop::collection::btree_map(arb_suffix(), arb_scalar(), 1..8),
        prefer_nested in any::<bool>(),
    ) {
        let policy = if prefer_nested {
            ConflictPolicy::PreferNested
        } else {
            ConflictPolicy::Reject
        };
        let build = |items: Vec<(&String, &Value)>| -> Result<Group, usize> {
            let mut group = Group::default();
            for (suffix, value) in items {
                let segments: Vec<&str> = suffix.split('.').collect();
                group.insert_path(&segments, value.clone(), policy)?;
            }
            Ok(group)
        };

        let forward = build(entries.iter().collect());
        let backward = build(entries.iter().rev().collect());
        prop_assert_eq!(forward.is_ok(), backward.is_ok());
        if let (Ok(a), Ok(b)) = (forward, backward) {
            prop_assert_eq!(a, b);
        }
        if prefer_nested {
            prop_assert!(build(entries.iter().collect()).is_ok());
        }
    }

    /// Arbitrary expression text yields a result or an error, never a panic.
    #[test]
    fn arbitrary_input_never_panics(src in "\\PC{0,64}") {
        let env = env_from(json!({ "tests.status": "pass", "plan.steps": [1, 2] }));
        let _ = expr::evaluate(&translate(&src), &env);
    }

    /// Operator soup stresses the parser's error paths.
    #[test]
    fn operator_soup_never_panics(
        tokens in prop::collection::vec(
            prop::sample::select(vec![
                "(", ")", "[", "]", "not", "and", "or", "in", "->", "&&", "==", "<",
                "-", "//", "%", ".", ",", "x", "1", "'s'", "size", "None",
            ]),
            0..40,
        ),
    ) {
        let src = tokens.join(" ");
        let _ = expr::evaluate(&translate(&src), &env_from(json!({ "x": 1 })));
    }

    /// Results come back in declared order whatever their outcomes.
    #[test]
    fn results_follow_declared_order(outcomes in prop::collection::vec(0u8..3, 0..12)) {
        let model: ConstraintModel = outcomes
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let body = match kind {
                    0 => "True",
                    1 => "False",
                    _ => "missing_name",
                };
                Constraint::new(format!("c{i}"), body)
            })
            .collect();

        let report = evaluate(&model, &env_from(json!({})));
        let names: Vec<String> = report.results.iter().map(|r| r.result.name.clone()).collect();
        let expected: Vec<String> = (0..outcomes.len()).map(|i| format!("c{i}")).collect();
        prop_assert_eq!(names, expected);
        prop_assert_eq!(report.all_satisfied(), outcomes.iter().all(|k| *k == 0));
    }
}
