use crate::error::LoadError;
use camino::Utf8Path;
use cgad_domain::model::{Constraint, ConstraintModel};
use serde_json::Value;

/// Serialization format of a constraint model, chosen from the file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Yaml,
}

impl ModelFormat {
    /// `.json` selects JSON; everything else (`.yaml`, `.yml`, `.cas.yaml`, no extension) is YAML.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ModelFormat::Json,
            _ => ModelFormat::Yaml,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelFormat::Json => "JSON",
            ModelFormat::Yaml => "YAML",
        }
    }

    /// Whether this build can parse the format.
    pub fn is_available(self) -> bool {
        match self {
            ModelFormat::Json => true,
            ModelFormat::Yaml => cfg!(feature = "yaml"),
        }
    }
}

pub(crate) fn parse_model_text(
    path: &Utf8Path,
    format: ModelFormat,
    text: &str,
) -> Result<ConstraintModel, LoadError> {
    let doc = match format {
        ModelFormat::Json => serde_json::from_str::<Value>(text).map_err(|e| LoadError::parse(path, e))?,
        ModelFormat::Yaml => parse_yaml(path, text)?,
    };
    model_from_document(path, doc)
}

#[cfg(feature = "yaml")]
fn parse_yaml(path: &Utf8Path, text: &str) -> Result<Value, LoadError> {
    serde_yaml::from_str::<Value>(text).map_err(|e| LoadError::parse(path, e))
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(path: &Utf8Path, _text: &str) -> Result<Value, LoadError> {
    Err(LoadError::ParserUnavailable {
        format: ModelFormat::Yaml.as_str(),
        feature: "yaml",
        path: path.to_owned(),
    })
}

fn model_from_document(path: &Utf8Path, doc: Value) -> Result<ConstraintModel, LoadError> {
    let Value::Object(mut top) = doc else {
        return Err(LoadError::invalid(
            path,
            format!("top level must be a mapping, found {}", kind(&doc)),
        ));
    };

    let entries = match top.remove("constraints") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(LoadError::invalid(
                path,
                format!("`constraints` must be a list, found {}", kind(&other)),
            ));
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| constraint_from_entry(path, index, entry))
        .collect()
}

fn constraint_from_entry(path: &Utf8Path, index: usize, entry: Value) -> Result<Constraint, LoadError> {
    let Value::Object(mut fields) = entry else {
        return Err(LoadError::invalid(
            path,
            format!("constraint #{index} must be a mapping, found {}", kind(&entry)),
        ));
    };

    let name = scalar_text(path, index, "name", fields.remove("name"))?;
    let expr = scalar_text(path, index, "expr", fields.remove("expr"))?;
    Ok(Constraint::with_defaults(name, expr))
}

/// Text form of a scalar field. Missing and null fields fall back to defaults.
fn scalar_text(
    path: &Utf8Path,
    index: usize,
    field: &str,
    value: Option<Value>,
) -> Result<Option<String>, LoadError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Bool(true)) => Ok(Some("True".to_string())),
        Some(Value::Bool(false)) => Ok(Some("False".to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(LoadError::invalid(
            path,
            format!("constraint #{index} `{field}` must be a scalar, found {}", kind(&other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
