//! State normalization: flat dotted keys plus nested prefix groups.
//!
//! The environment answers two kinds of lookups over the same data:
//! - `get("tests.status")`: the original flat key
//! - `get("tests")` then `.status`: the nested group built for a configured prefix

use crate::policy::{ConflictPolicy, EffectiveConfig};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Raw snapshot: dot-delimited keys to JSON values.
pub type SessionState = Map<String, Value>;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("state key '{key}' holds a value but is also a prefix of other '{prefix}.*' keys")]
    Conflict { prefix: String, key: String },
}

/// A node in a prefix group: either a leaf value or a nested group.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Value(Value),
    Group(Group),
}

impl Node {
    pub fn as_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Value(v) => NodeRef::Value(v),
            Node::Group(g) => NodeRef::Group(g),
        }
    }
}

/// Borrowed view of an environment binding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeRef<'a> {
    Value(&'a Value),
    Group(&'a Group),
}

impl<'a> NodeRef<'a> {
    pub fn as_value(self) -> Option<&'a Value> {
        match self {
            NodeRef::Value(v) => Some(v),
            NodeRef::Group(_) => None,
        }
    }

    pub fn as_group(self) -> Option<&'a Group> {
        match self {
            NodeRef::Group(g) => Some(g),
            NodeRef::Value(_) => None,
        }
    }

    /// Attribute access: group children and the keys of object values.
    pub fn attr(self, name: &str) -> Option<NodeRef<'a>> {
        match self {
            NodeRef::Group(g) => g.get(name),
            NodeRef::Value(Value::Object(map)) => map.get(name).map(NodeRef::Value),
            NodeRef::Value(_) => None,
        }
    }
}

/// An ordered tree of `segment -> node`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    children: BTreeMap<String, Node>,
}

impl Group {
    pub fn get(&self, segment: &str) -> Option<NodeRef<'_>> {
        self.children.get(segment).map(Node::as_ref)
    }

    /// Walk `path` (already split into segments) from this group.
    pub fn lookup<'a, I>(&self, path: I) -> Option<NodeRef<'_>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut current = NodeRef::Group(self);
        for segment in path {
            current = current.attr(segment)?;
        }
        Some(current)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeRef<'_>)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Insert `value` at `segments`, creating intermediate groups.
    ///
    /// On a leaf/prefix collision returns the number of segments leading to the
    /// colliding leaf (under `Reject`), or resolves it in favour of the group.
    pub(crate) fn insert_path(
        &mut self,
        segments: &[&str],
        value: Value,
        policy: ConflictPolicy,
    ) -> Result<(), usize> {
        let Some((last, parents)) = segments.split_last() else {
            return Ok(());
        };

        let mut cursor = self;
        for (depth, segment) in parents.iter().enumerate() {
            let entry = cursor
                .children
                .entry((*segment).to_string())
                .or_insert_with(|| Node::Group(Group::default()));
            if matches!(entry, Node::Value(_)) {
                match policy {
                    ConflictPolicy::Reject => return Err(depth + 1),
                    ConflictPolicy::PreferNested => *entry = Node::Group(Group::default()),
                }
            }
            let Node::Group(next) = entry else {
                return Err(depth + 1);
            };
            cursor = next;
        }

        match cursor.children.get(*last) {
            Some(Node::Group(_)) => match policy {
                ConflictPolicy::Reject => Err(segments.len()),
                ConflictPolicy::PreferNested => Ok(()),
            },
            _ => {
                cursor
                    .children
                    .insert((*last).to_string(), Node::Value(value));
                Ok(())
            }
        }
    }
}

/// Read-only lookup environment derived from a [`SessionState`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedEnvironment {
    flat: SessionState,
    groups: BTreeMap<String, Group>,
}

impl NormalizedEnvironment {
    /// Look up a binding by its exact name.
    ///
    /// Prefix groups shadow a flat key with the same name.
    pub fn get(&self, name: &str) -> Option<NodeRef<'_>> {
        if let Some(group) = self.groups.get(name) {
            return Some(NodeRef::Group(group));
        }
        self.flat.get(name).map(NodeRef::Value)
    }

    /// Longest leading run of `segments` that names a binding.
    ///
    /// Returns how many segments were consumed together with the binding.
    pub fn longest_binding(&self, segments: &[&str]) -> Option<(usize, NodeRef<'_>)> {
        (1..=segments.len()).rev().find_map(|n| {
            let key = segments[..n].join(".");
            self.get(&key).map(|node| (n, node))
        })
    }

    /// Resolve a dotted path, preferring the longest flat key and walking groups
    /// for the remaining segments.
    pub fn lookup_path(&self, path: &str) -> Option<NodeRef<'_>> {
        let segments: Vec<&str> = path.split('.').collect();
        let (consumed, node) = self.longest_binding(&segments)?;
        segments[consumed..]
            .iter()
            .try_fold(node, |node, segment| node.attr(segment))
    }

    pub fn flat(&self) -> &SessionState {
        &self.flat
    }

    pub fn group(&self, prefix: &str) -> Option<&Group> {
        self.groups.get(prefix)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

/// Build the lookup environment for `state`, grouping keys under `cfg.prefixes`.
pub fn normalize(
    state: &SessionState,
    cfg: &EffectiveConfig,
) -> Result<NormalizedEnvironment, NormalizeError> {
    let mut groups = BTreeMap::new();

    for prefix in &cfg.prefixes {
        let needle = format!("{prefix}.");
        let mut group = Group::default();
        let mut matched = 0usize;

        for (key, value) in state.iter() {
            let Some(suffix) = key.strip_prefix(&needle) else {
                continue;
            };
            matched += 1;
            let segments: Vec<&str> = suffix.split('.').collect();
            if let Err(depth) = group.insert_path(&segments, value.clone(), cfg.conflict) {
                // The leaf sits `depth` segments below the prefix; for a leaf that
                // blocks a longer key this is a strict prefix of `key`.
                let colliding = if depth < segments.len() {
                    format!("{prefix}.{}", segments[..depth].join("."))
                } else {
                    key.clone()
                };
                return Err(NormalizeError::Conflict {
                    prefix: prefix.clone(),
                    key: colliding,
                });
            }
        }

        if matched == 0 {
            continue;
        }
        if state.contains_key(prefix.as_str()) && cfg.conflict == ConflictPolicy::Reject {
            return Err(NormalizeError::Conflict {
                prefix: prefix.clone(),
                key: prefix.clone(),
            });
        }

        tracing::debug!(prefix = %prefix, keys = matched, "built prefix group");
        groups.insert(prefix.clone(), group);
    }

    Ok(NormalizedEnvironment {
        flat: state.clone(),
        groups,
    })
}
