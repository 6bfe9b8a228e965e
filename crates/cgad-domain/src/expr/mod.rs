//! Sandboxed expression language for constraint bodies.
//!
//! Grammar is a small infix language: boolean operators, chained comparisons,
//! membership, arithmetic, list literals, attribute/index access and the `size`
//! builtin. Nothing outside the environment and literals is reachable.

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;
mod value;

pub use ast::{BinaryOp, BoolOp, CmpOp, Expr, Literal, UnaryOp};
pub use error::{EvalError, ParseError};
pub use eval::{BUILTIN_SIZE, Interpreter};
pub use parser::{MAX_DEPTH, parse};
pub use value::Value;

use crate::env::NormalizedEnvironment;

/// Parse and evaluate `src`, reducing the result to its truthiness.
pub fn evaluate(src: &str, env: &NormalizedEnvironment) -> Result<bool, EvalError> {
    let expr = parse(src)?;
    Interpreter::new(env).eval(&expr).map(|value| value.truthy())
}
