/// Tokenizer/parser failure. `offset` is a byte offset into the translated source.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid syntax at offset {offset}: {message}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Anything that can go wrong while evaluating one constraint expression.
///
/// Messages keep the wording existing constraint files and CI logs already use.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error("name '{0}' is not defined")]
    UndefinedName(String),

    #[error("'{type_name}' object has no attribute '{attr}'")]
    NoAttribute {
        type_name: &'static str,
        attr: String,
    },

    #[error("'{0}' object is not callable")]
    NotCallable(&'static str),

    #[error("{0}")]
    Type(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("{0} index out of range")]
    IndexOutOfRange(&'static str),

    #[error("key '{0}' not found")]
    MissingKey(String),

    #[error("integer overflow")]
    Overflow,
}
