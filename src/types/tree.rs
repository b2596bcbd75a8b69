// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Nested configuration trees used for Helm chart values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Leaf value of a configuration tree
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

/// A recursive key/value tree: scalars, string-keyed maps and ordered sequences.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ConfigTree {
    Scalar(Scalar),
    Map(BTreeMap<String, ConfigTree>),
    Sequence(Vec<ConfigTree>),
}

impl ConfigTree {
    pub fn empty() -> Self {
        ConfigTree::Map(BTreeMap::new())
    }

    /// Build a map node from (key, value) pairs
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ConfigTree>,
    {
        ConfigTree::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a nested value by key path
    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigTree> {
        path.iter().try_fold(self, |node, key| match node {
            ConfigTree::Map(entries) => entries.get(*key),
            _ => None,
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigTree::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ConfigTree::Map(entries) => entries.is_empty(),
            ConfigTree::Sequence(items) => items.is_empty(),
            ConfigTree::Scalar(Scalar::Null) => true,
            ConfigTree::Scalar(_) => false,
        }
    }
}

/// Deep-merge `overlay` onto `base`, returning a new tree.
///
/// Maps present on both sides are merged key by key. In every other case the
/// overlay value replaces the base value wholesale, sequences included.
pub fn merge(base: &ConfigTree, overlay: &ConfigTree) -> ConfigTree {
    match (base, overlay) {
        (ConfigTree::Map(base_entries), ConfigTree::Map(overlay_entries)) => {
            let mut merged = base_entries.clone();
            for (key, value) in overlay_entries {
                let next = match base_entries.get(key) {
                    Some(existing) => merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            ConfigTree::Map(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

impl From<&str> for ConfigTree {
    fn from(value: &str) -> Self {
        ConfigTree::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for ConfigTree {
    fn from(value: String) -> Self {
        ConfigTree::Scalar(Scalar::String(value))
    }
}

impl From<bool> for ConfigTree {
    fn from(value: bool) -> Self {
        ConfigTree::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for ConfigTree {
    fn from(value: i64) -> Self {
        ConfigTree::Scalar(Scalar::Int(value))
    }
}

impl From<u64> for ConfigTree {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => ConfigTree::Scalar(Scalar::Int(i)),
            Err(_) => ConfigTree::Scalar(Scalar::UInt(value)),
        }
    }
}

impl From<BTreeMap<String, ConfigTree>> for ConfigTree {
    fn from(value: BTreeMap<String, ConfigTree>) -> Self {
        ConfigTree::Map(value)
    }
}

impl From<serde_json::Value> for ConfigTree {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ConfigTree::Scalar(Scalar::Null),
            Value::Bool(b) => ConfigTree::Scalar(Scalar::Bool(b)),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => ConfigTree::Scalar(Scalar::Int(i)),
                (None, Some(u)) => ConfigTree::Scalar(Scalar::UInt(u)),
                (None, None) => ConfigTree::Scalar(Scalar::Float(n.as_f64().unwrap_or_default())),
            },
            Value::String(s) => ConfigTree::Scalar(Scalar::String(s)),
            Value::Array(items) => {
                ConfigTree::Sequence(items.into_iter().map(ConfigTree::from).collect())
            }
            Value::Object(entries) => ConfigTree::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, ConfigTree::from(v)))
                    .collect(),
            ),
        }
    }
}
