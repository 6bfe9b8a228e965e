//! Pure constraint evaluation (no IO).
//!
//! Input: a constraint model and a session state constructed elsewhere.
//! Output: per-constraint results + verdict + counts.

#![forbid(unsafe_code)]

pub mod env;
pub mod expr;
pub mod model;
pub mod policy;
pub mod report;
pub mod translate;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{evaluate, evaluate_constraint};
pub use env::{Group, Node, NodeRef, NormalizeError, NormalizedEnvironment, SessionState, normalize};
pub use fingerprint::fingerprint_for_constraint;
pub use translate::translate;
