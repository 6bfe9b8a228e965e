use cgad_types::ids;

/// A named boolean expression the session state is expected to satisfy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub name: String,
    pub expr: String,
}

impl Constraint {
    pub fn new(name: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expr: expr.into(),
        }
    }

    /// Build a constraint from optional fields, applying the model defaults
    /// (`<unnamed>` and the literal `True`).
    pub fn with_defaults(name: Option<String>, expr: Option<String>) -> Self {
        Self {
            name: name.unwrap_or_else(|| ids::UNNAMED_CONSTRAINT.to_string()),
            expr: expr.unwrap_or_else(|| ids::DEFAULT_EXPR.to_string()),
        }
    }
}

/// Constraints in declared order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstraintModel {
    pub constraints: Vec<Constraint>,
}

impl ConstraintModel {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.constraints.iter()
    }
}

impl FromIterator<Constraint> for ConstraintModel {
    fn from_iter<T: IntoIterator<Item = Constraint>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
