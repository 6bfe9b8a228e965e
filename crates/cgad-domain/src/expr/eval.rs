//! Tree-walking evaluation of [`Expr`] against a [`NormalizedEnvironment`].
//!
//! The only capabilities are environment lookups, literals and the `size` builtin.

use super::ast::{BinaryOp, BoolOp, CmpOp, Expr, Literal, UnaryOp};
use super::error::EvalError;
use super::value::{Num, Value};
use crate::env::NormalizedEnvironment;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Allow-listed helper: length of a string, list or mapping.
pub const BUILTIN_SIZE: &str = "size";

pub struct Interpreter<'env> {
    env: &'env NormalizedEnvironment,
}

impl<'env> Interpreter<'env> {
    pub fn new(env: &'env NormalizedEnvironment) -> Self {
        Self { env }
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value<'env>, EvalError> {
        match expr {
            Expr::Literal(lit) => Ok(literal(lit)),
            Expr::Path(segments) => self.path(segments),
            Expr::List(items) => items
                .iter()
                .map(|item| self.eval(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::Attr { target, name } => attribute(self.eval(target)?, name),
            Expr::Index { target, index } => subscript(self.eval(target)?, self.eval(index)?),
            Expr::Call { func, args } => self.call(func, args),
            Expr::Unary { op, operand } => unary(*op, self.eval(operand)?),
            Expr::Binary { op, left, right } => binary(*op, self.eval(left)?, self.eval(right)?),
            Expr::Bool { op, left, right } => {
                let left = self.eval(left)?;
                match (op, left.truthy()) {
                    (BoolOp::And, false) | (BoolOp::Or, true) => Ok(left),
                    _ => self.eval(right),
                }
            }
            Expr::Compare { left, rest } => {
                let mut current = self.eval(left)?;
                for (op, right) in rest {
                    let right = self.eval(right)?;
                    if !compare(*op, &current, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    current = right;
                }
                Ok(Value::Bool(true))
            }
        }
    }

    fn path(&self, segments: &[String]) -> Result<Value<'env>, EvalError> {
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let Some((consumed, node)) = self.env.longest_binding(&segments) else {
            let first = segments.first().copied().unwrap_or_default();
            return Err(EvalError::UndefinedName(first.to_string()));
        };
        segments[consumed..]
            .iter()
            .try_fold(Value::from_node(node), |value, segment| {
                attribute(value, segment)
            })
    }

    fn call(&self, func: &Expr, args: &[Expr]) -> Result<Value<'env>, EvalError> {
        if let Expr::Path(segments) = func
            && let [name] = segments.as_slice()
            && name == BUILTIN_SIZE
        {
            let [arg] = args else {
                return Err(EvalError::Type(format!(
                    "{BUILTIN_SIZE}() takes exactly one argument ({} given)",
                    args.len()
                )));
            };
            return size(self.eval(arg)?);
        }
        // Anything else is either unbound or a plain value.
        let callee = self.eval(func)?;
        Err(EvalError::NotCallable(callee.type_name()))
    }
}

fn literal<'env>(lit: &Literal) -> Value<'env> {
    match lit {
        Literal::None => Value::None,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::Str(s) => Value::Str(Cow::Owned(s.clone())),
    }
}

fn attribute<'env>(value: Value<'env>, name: &str) -> Result<Value<'env>, EvalError> {
    match value {
        Value::Group(group) => group
            .get(name)
            .map(Value::from_node)
            .ok_or_else(|| EvalError::NoAttribute {
                type_name: "namespace",
                attr: name.to_string(),
            }),
        // Object values are addressable like groups, at every level.
        Value::Map(map) => map
            .get(name)
            .map(Value::from_json)
            .ok_or_else(|| EvalError::NoAttribute {
                type_name: "dict",
                attr: name.to_string(),
            }),
        other => Err(EvalError::NoAttribute {
            type_name: other.type_name(),
            attr: name.to_string(),
        }),
    }
}

fn subscript<'env>(target: Value<'env>, index: Value<'env>) -> Result<Value<'env>, EvalError> {
    match (&target, &index) {
        (Value::List(items), _) => {
            let i = normalize_index(&index, items.len(), "list")?;
            Ok(items[i].clone())
        }
        (Value::Str(s), _) => {
            let chars: Vec<char> = s.chars().collect();
            let i = normalize_index(&index, chars.len(), "string")?;
            Ok(Value::Str(Cow::Owned(chars[i].to_string())))
        }
        (Value::Map(map), Value::Str(key)) => map
            .get(&**key)
            .map(Value::from_json)
            .ok_or_else(|| EvalError::MissingKey(key.to_string())),
        (Value::Map(_), other) => Err(EvalError::MissingKey(format!(
            "<{} key>",
            other.type_name()
        ))),
        _ => Err(EvalError::Type(format!(
            "'{}' object is not subscriptable",
            target.type_name()
        ))),
    }
}

fn normalize_index(index: &Value<'_>, len: usize, kind: &'static str) -> Result<usize, EvalError> {
    let raw = match index {
        Value::Int(i) => *i,
        Value::Bool(b) => i64::from(*b),
        other => {
            return Err(EvalError::Type(format!(
                "{kind} indices must be integers, not {}",
                other.type_name()
            )));
        }
    };
    let len = i64::try_from(len).map_err(|_| EvalError::Overflow)?;
    let resolved = if raw < 0 { raw + len } else { raw };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).map_err(|_| EvalError::Overflow)
    } else {
        Err(EvalError::IndexOutOfRange(kind))
    }
}

fn size(value: Value<'_>) -> Result<Value<'static>, EvalError> {
    let len = match &value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(map) => map.len(),
        other => {
            return Err(EvalError::Type(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )));
        }
    };
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| EvalError::Overflow)
}

fn unary<'env>(op: UnaryOp, operand: Value<'env>) -> Result<Value<'env>, EvalError> {
    if op == UnaryOp::Not {
        return Ok(Value::Bool(!operand.truthy()));
    }
    let Some(num) = operand.as_num() else {
        let symbol = if op == UnaryOp::Neg { "-" } else { "+" };
        return Err(EvalError::Type(format!(
            "bad operand type for unary {symbol}: '{}'",
            operand.type_name()
        )));
    };
    Ok(match (op, num) {
        (UnaryOp::Neg, Num::Int(i)) => Value::Int(i.checked_neg().ok_or(EvalError::Overflow)?),
        (UnaryOp::Neg, Num::Float(f)) => Value::Float(-f),
        (_, Num::Int(i)) => Value::Int(i),
        (_, Num::Float(f)) => Value::Float(f),
    })
}

fn binary<'env>(
    op: BinaryOp,
    left: Value<'env>,
    right: Value<'env>,
) -> Result<Value<'env>, EvalError> {
    if let (Some(a), Some(b)) = (left.as_num(), right.as_num()) {
        return arithmetic(op, a, b);
    }
    match (op, left, right) {
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(Cow::Owned(format!("{a}{b}")))),
        (BinaryOp::Add, Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        }
        (op, left, right) => Err(EvalError::Type(format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn arithmetic(op: BinaryOp, a: Num, b: Num) -> Result<Value<'static>, EvalError> {
    if let (Num::Int(a), Num::Int(b)) = (a, b) {
        let result = match op {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
            BinaryOp::Div => return float_div(a as f64, b as f64),
            BinaryOp::FloorDiv | BinaryOp::Mod if b == 0 => return Err(EvalError::DivisionByZero),
            BinaryOp::FloorDiv => floor_div(a, b),
            BinaryOp::Mod => floor_mod(a, b),
        };
        return result.map(Value::Int).ok_or(EvalError::Overflow);
    }

    let (a, b) = (a.as_f64(), b.as_f64());
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => float_div(a, b),
        BinaryOp::FloorDiv | BinaryOp::Mod if b == 0.0 => Err(EvalError::DivisionByZero),
        BinaryOp::FloorDiv => Ok(Value::Float((a / b).floor())),
        BinaryOp::Mod => Ok(Value::Float(a - b * (a / b).floor())),
    }
}

fn float_div(a: f64, b: f64) -> Result<Value<'static>, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Float(a / b))
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

/// Remainder with the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        r.checked_add(b)
    } else {
        Some(r)
    }
}

fn compare(op: CmpOp, left: &Value<'_>, right: &Value<'_>) -> Result<bool, EvalError> {
    let symbol = op.symbol();
    Ok(match op {
        CmpOp::Eq => left.py_eq(right),
        CmpOp::NotEq => !left.py_eq(right),
        CmpOp::Lt => left.py_cmp(right, symbol)? == Ordering::Less,
        CmpOp::Le => left.py_cmp(right, symbol)? != Ordering::Greater,
        CmpOp::Gt => left.py_cmp(right, symbol)? == Ordering::Greater,
        CmpOp::Ge => left.py_cmp(right, symbol)? != Ordering::Less,
        CmpOp::In => contains(right, left)?,
        CmpOp::NotIn => !contains(right, left)?,
    })
}

fn contains(container: &Value<'_>, needle: &Value<'_>) -> Result<bool, EvalError> {
    match (container, needle) {
        (Value::List(items), _) => Ok(items.iter().any(|item| item.py_eq(needle))),
        (Value::Str(haystack), Value::Str(n)) => Ok(haystack.contains(&**n)),
        (Value::Str(_), other) => Err(EvalError::Type(format!(
            "'in <string>' requires string as left operand, not {}",
            other.type_name()
        ))),
        (Value::Map(map), Value::Str(key)) => Ok(map.contains_key(&**key)),
        (Value::Map(_), _) => Ok(false),
        (other, _) => Err(EvalError::Type(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::super::{evaluate, parse};
    use super::*;
    use crate::test_support::env_from;
    use serde_json::json;

    fn eval_ok(src: &str, state: serde_json::Value) -> bool {
        let env = env_from(state);
        evaluate(src, &env).expect("evaluate")
    }

    fn eval_err(src: &str, state: serde_json::Value) -> String {
        let env = env_from(state);
        evaluate(src, &env).expect_err("error").to_string()
    }

    #[test]
    fn object_values_are_attribute_addressable() {
        let state = json!({
            "ddf.meta": { "owner": "infra", "review": { "approvals": 2 } },
            "release": { "channel": "stable" }
        });
        assert!(eval_ok("ddf.meta.owner == 'infra'", state.clone()));
        assert!(eval_ok("ddf.meta.review.approvals >= 2", state.clone()));
        assert!(eval_ok("release.channel == 'stable'", state.clone()));
        assert!(eval_ok("ddf.meta['owner'] == 'infra'", state.clone()));
        assert_eq!(
            eval_err("ddf.meta.team == 'x'", state),
            "'dict' object has no attribute 'team'"
        );
    }

    #[test]
    fn grouped_and_flat_names_resolve() {
        let state = json!({ "tests.status": "pass", "cpsc.ledger.updated": true });
        assert!(eval_ok("tests.status == 'pass'", state.clone()));
        assert!(eval_ok("cpsc.ledger.updated", state.clone()));
        assert!(eval_ok("cpsc.ledger.updated == true", state));
    }

    #[test]
    fn unconfigured_dotted_keys_resolve_as_flat_keys() {
        assert!(eval_ok("deploy.target == 'prod'", json!({ "deploy.target": "prod" })));
    }

    #[test]
    fn undefined_names_are_errors() {
        assert_eq!(
            eval_err("missing.value == 1", json!({})),
            "name 'missing' is not defined"
        );
        assert_eq!(
            eval_err("tests.nope", json!({ "tests.status": "pass" })),
            "'namespace' object has no attribute 'nope'"
        );
        assert_eq!(
            eval_err("tests.status.upper", json!({ "tests.status": "pass" })),
            "'str' object has no attribute 'upper'"
        );
    }

    #[test]
    fn boolean_operators_short_circuit() {
        // The right-hand side would raise if evaluated.
        assert!(!eval_ok("False and missing", json!({})));
        assert!(eval_ok("True or missing", json!({})));
        assert!(eval_ok("not (plan.ready) or undefined_thing", json!({ "plan.ready": false })));
    }

    #[test]
    fn and_or_return_operands() {
        let env = env_from(json!({}));
        let interp = Interpreter::new(&env);
        let value = interp.eval(&parse("0 or 'x'").expect("parse")).expect("eval");
        assert!(matches!(value, Value::Str(ref s) if s == "x"));
        let value = interp.eval(&parse("[] and 1").expect("parse")).expect("eval");
        assert!(matches!(value, Value::List(ref v) if v.is_empty()));
    }

    #[test]
    fn arithmetic_follows_python_rules() {
        let state = json!({});
        assert!(eval_ok("7 // 2 == 3", state.clone()));
        assert!(eval_ok("-7 // 2 == -4", state.clone()));
        assert!(eval_ok("-7 % 3 == 2", state.clone()));
        assert!(eval_ok("7 / 2 == 3.5", state.clone()));
        assert!(eval_ok("True + True == 2", state.clone()));
        assert!(eval_ok("'ab' + 'c' == 'abc'", state.clone()));
        assert!(eval_ok("[1] + [2] == [1, 2]", state.clone()));
        assert!(eval_ok("2 * 3 - 1 == 5", state));
    }

    #[test]
    fn runtime_errors_have_readable_messages() {
        assert_eq!(eval_err("1 / 0", json!({})), "division by zero");
        assert_eq!(eval_err("1 % 0", json!({})), "division by zero");
        assert_eq!(
            eval_err("'a' + 1", json!({})),
            "unsupported operand type(s) for +: 'str' and 'int'"
        );
        assert_eq!(
            eval_err("'a' < 1", json!({})),
            "'<' not supported between instances of 'str' and 'int'"
        );
        assert_eq!(eval_err("9223372036854775807 + 1", json!({})), "integer overflow");
    }

    #[test]
    fn comparison_chains() {
        let state = json!({ "tests.count": 2 });
        assert!(eval_ok("1 < tests.count <= 2", state.clone()));
        assert!(!eval_ok("1 < tests.count < 2", state));
    }

    #[test]
    fn membership() {
        let state = json!({
            "command.kind": "build",
            "command.args": ["--release", "-p"],
            "ddf.meta": { "owner": "infra" },
        });
        assert!(eval_ok("command.kind in ['build', 'test']", state.clone()));
        assert!(eval_ok("'--release' in command.args", state.clone()));
        assert!(eval_ok("'uil' in command.kind", state.clone()));
        assert!(eval_ok("'owner' in ddf.meta", state.clone()));
        assert!(eval_ok("'x' not in command.args", state.clone()));
        assert_eq!(
            eval_err("1 in command.kind", state),
            "'in <string>' requires string as left operand, not int"
        );
    }

    #[test]
    fn subscripts() {
        let state = json!({
            "command.args": ["a", "b", "c"],
            "ddf.meta": { "owner": "infra" },
        });
        assert!(eval_ok("command.args[0] == 'a'", state.clone()));
        assert!(eval_ok("command.args[-1] == 'c'", state.clone()));
        assert!(eval_ok("ddf.meta['owner'] == 'infra'", state.clone()));
        assert!(eval_ok("command.args[1][0] == 'b'", state.clone()));
        assert_eq!(eval_err("command.args[5]", state.clone()), "list index out of range");
        assert_eq!(eval_err("ddf.meta['nope']", state), "key 'nope' not found");
    }

    #[test]
    fn size_is_the_only_callable() {
        let state = json!({
            "plan.steps": ["a", "b"],
            "tests.name": "unit",
            "ddf.meta": { "k": 1 },
        });
        assert!(eval_ok("size(plan.steps) == 2", state.clone()));
        assert!(eval_ok("size(tests.name) == 4", state.clone()));
        assert!(eval_ok("size(ddf.meta) == 1", state.clone()));
        assert!(eval_ok("size([]) == 0", state.clone()));
        assert_eq!(eval_err("len(plan.steps)", state.clone()), "name 'len' is not defined");
        assert_eq!(eval_err("tests.name(1)", state.clone()), "'str' object is not callable");
        assert_eq!(
            eval_err("size(1)", state.clone()),
            "object of type 'int' has no len()"
        );
        assert_eq!(
            eval_err("size(plan.steps, 1)", state),
            "size() takes exactly one argument (2 given)"
        );
    }

    #[test]
    fn host_escape_hatches_are_not_available() {
        for src in [
            "__import__('os')",
            "open('/etc/passwd')",
            "eval('1')",
            "exec('x = 1')",
            "__builtins__",
        ] {
            let msg = eval_err(src, json!({}));
            assert!(msg.contains("is not defined"), "{src}: {msg}");
        }
    }

    #[test]
    fn null_values_compare_to_none() {
        assert!(eval_ok("plan.owner == None", json!({ "plan.owner": null })));
        assert!(!eval_ok("plan.owner", json!({ "plan.owner": null })));
    }
}
