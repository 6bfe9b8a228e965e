/// How the normalizer treats a key that is both a value and a prefix of other keys
/// (e.g. `cpsc.ledger` next to `cpsc.ledger.updated`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Refuse to build the environment.
    #[default]
    Reject,
    /// The nested group wins in the grouped view; the flat key keeps its value.
    PreferNested,
}

impl ConflictPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictPolicy::Reject => "reject",
            ConflictPolicy::PreferNested => "prefer_nested",
        }
    }
}

/// Resolved normalizer configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveConfig {
    /// Top-level namespaces whose dotted sub-keys are exposed as nested groups, in order.
    pub prefixes: Vec<String>,
    pub conflict: ConflictPolicy,
}

impl EffectiveConfig {
    pub fn new<I, S>(prefixes: I, conflict: ConflictPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            conflict,
        }
    }
}
