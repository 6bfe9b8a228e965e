use camino::Utf8PathBuf;

/// Fatal input problems. Any of these aborts the run before evaluation.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The build lacks the parser this input needs. Raised before the file is opened.
    #[error("{format} support is required to load {path} (rebuild with the `{feature}` feature)")]
    ParserUnavailable {
        format: &'static str,
        feature: &'static str,
        path: Utf8PathBuf,
    },

    #[error("failed to read {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    #[error("invalid {path}: {message}")]
    Invalid { path: Utf8PathBuf, message: String },
}

impl LoadError {
    pub fn is_parser_unavailable(&self) -> bool {
        matches!(self, LoadError::ParserUnavailable { .. })
    }

    pub(crate) fn parse(path: &camino::Utf8Path, err: impl std::fmt::Display) -> Self {
        LoadError::Parse {
            path: path.to_owned(),
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid(path: &camino::Utf8Path, message: impl Into<String>) -> Self {
        LoadError::Invalid {
            path: path.to_owned(),
            message: message.into(),
        }
    }
}
