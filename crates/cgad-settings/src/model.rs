use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_CONFIG_V1: &str = "cgad.config.v1";

/// `cgad.toml` schema v1.
///
/// This is a *user-facing* config model: every field is optional and unknown
/// fields are rejected so typos surface early.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CgadConfigV1 {
    /// Optional schema string for tooling (`cgad.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Replaces the default prefix list when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<Vec<String>>,

    /// Appended after `prefixes` (or the defaults).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_prefixes: Vec<String>,

    /// Leaf/prefix conflict handling: `reject` (default) or `prefer_nested`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<String>,
}
