//! Input adapters: read and parse constraint models and session state snapshots.
//!
//! This crate is allowed to do filesystem IO. Everything it produces is handed to
//! `cgad-domain`, which stays IO-free.

#![forbid(unsafe_code)]

mod error;
mod model;

use camino::Utf8Path;
use cgad_domain::SessionState;
use cgad_domain::model::ConstraintModel;
use serde_json::Value;

pub use error::LoadError;
pub use model::ModelFormat;

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a JSON constraint model.
    ///
    /// **Never panics** on any input.
    pub fn parse_model_json(text: &str) -> Result<ConstraintModel, LoadError> {
        model::parse_model_text(Utf8Path::new("<fuzz>.json"), ModelFormat::Json, text)
    }

    /// Parse arbitrary text as a YAML constraint model.
    ///
    /// **Never panics** on any input.
    pub fn parse_model_yaml(text: &str) -> Result<ConstraintModel, LoadError> {
        model::parse_model_text(Utf8Path::new("<fuzz>.yaml"), ModelFormat::Yaml, text)
    }

    /// Parse arbitrary text as a session state snapshot.
    ///
    /// **Never panics** on any input.
    pub fn parse_state(text: &str) -> Result<SessionState, LoadError> {
        super::parse_state_text(Utf8Path::new("<fuzz>"), text)
    }
}

/// Fail early when the build cannot parse the model at `path`.
///
/// Only looks at the file name; the file is not touched.
pub fn ensure_parser_available(path: &Utf8Path) -> Result<ModelFormat, LoadError> {
    let format = ModelFormat::from_path(path);
    if !format.is_available() {
        return Err(LoadError::ParserUnavailable {
            format: format.as_str(),
            feature: "yaml",
            path: path.to_owned(),
        });
    }
    Ok(format)
}

/// Load a constraint model (YAML or JSON, by extension).
pub fn load_model(path: &Utf8Path) -> Result<ConstraintModel, LoadError> {
    let format = ensure_parser_available(path)?;
    let text = read(path)?;
    let model = model::parse_model_text(path, format, &text)?;
    tracing::debug!(path = %path, format = format.as_str(), constraints = model.len(), "loaded model");
    Ok(model)
}

/// Load a session state snapshot: a JSON object of dotted keys.
pub fn load_state(path: &Utf8Path) -> Result<SessionState, LoadError> {
    let text = read(path)?;
    let state = parse_state_text(path, &text)?;
    tracing::debug!(path = %path, keys = state.len(), "loaded state");
    Ok(state)
}

fn read(path: &Utf8Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })
}

fn parse_state_text(path: &Utf8Path, text: &str) -> Result<SessionState, LoadError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(LoadError::Invalid {
            path: path.to_owned(),
            message: "session state must be a JSON object".to_string(),
        }),
        Err(e) => Err(LoadError::Parse {
            path: path.to_owned(),
            message: e.to_string(),
        }),
    }
}
