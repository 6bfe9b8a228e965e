use crate::env::NormalizedEnvironment;
use crate::expr;
use crate::fingerprint::fingerprint_for_constraint;
use crate::model::{Constraint, ConstraintModel};
use crate::report::DomainReport;
use crate::translate::translate;
use cgad_types::{ConstraintResult, ResultRecord, VerdictCounts, VerdictStatus};

/// Evaluate every constraint in declared order.
///
/// A violated or erroring constraint never stops evaluation of the rest.
pub fn evaluate(model: &ConstraintModel, env: &NormalizedEnvironment) -> DomainReport {
    let results: Vec<ResultRecord> = model
        .iter()
        .map(|constraint| evaluate_constraint(constraint, env))
        .collect();

    let plain: Vec<ConstraintResult> = results.iter().map(|r| r.result.clone()).collect();
    let counts = VerdictCounts::from_results(&plain);
    let verdict = if counts.violated == 0 {
        VerdictStatus::Pass
    } else {
        VerdictStatus::Fail
    };

    DomainReport {
        results,
        verdict,
        counts,
    }
}

/// Translate, parse and evaluate a single constraint.
pub fn evaluate_constraint(constraint: &Constraint, env: &NormalizedEnvironment) -> ResultRecord {
    let translated = translate(&constraint.expr);
    let result = match expr::evaluate(&translated, env) {
        Ok(true) => ConstraintResult::satisfied(&constraint.name),
        Ok(false) => ConstraintResult::violated(&constraint.name),
        Err(err) => ConstraintResult::errored(&constraint.name, err.to_string()),
    };

    tracing::debug!(
        constraint = %constraint.name,
        expr = %translated,
        ok = result.ok,
        error = result.error.as_deref().unwrap_or(""),
        "evaluated constraint"
    );

    ResultRecord {
        fingerprint: fingerprint_for_constraint(&constraint.name, &constraint.expr),
        expr: constraint.expr.clone(),
        result,
    }
}
