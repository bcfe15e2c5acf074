//! Error tree produced by a validation run.
//!
//! The tree mirrors the shape of the data, populated only where constraints
//! failed. A clean position contributes nothing to its parent, so a fully
//! valid value produces an empty tree.

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

/// Validation failures for one position, plus the sub-results of nested
/// positions.
///
/// - `failures` maps each failing rule name to its resolved message
/// - children hold non-empty subtrees of nested object properties
/// - items hold per-element subtrees when the position's data was an
///   array, index-aligned with the input (clean elements stay empty)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorTree {
    failures: BTreeMap<String, String>,
    children: BTreeMap<String, ErrorTree>,
    items: Vec<ErrorTree>,
}

impl ErrorTree {
    /// An empty tree (the fully-valid outcome)
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this position and everything beneath it is clean
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
            && self.children.values().all(ErrorTree::is_empty)
            && self.items.iter().all(ErrorTree::is_empty)
    }

    /// Message recorded for a failing rule at this position
    pub fn message(&self, rule: &str) -> Option<&str> {
        self.failures.get(rule).map(String::as_str)
    }

    /// Failing rules at this position with their messages
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.failures.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Subtree for a nested object property, if it recorded anything
    pub fn child(&self, property: &str) -> Option<&ErrorTree> {
        self.children.get(property)
    }

    /// Nested object properties that recorded failures
    pub fn children(&self) -> impl Iterator<Item = (&str, &ErrorTree)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Subtree for one array element, when this position validated an array
    pub fn item(&self, index: usize) -> Option<&ErrorTree> {
        self.items.get(index)
    }

    /// Per-element subtrees, index-aligned with the input array.
    ///
    /// Empty unless this position validated an array with at least one
    /// failing element.
    pub fn items(&self) -> &[ErrorTree] {
        &self.items
    }

    pub(crate) fn insert_failure(&mut self, rule: String, message: String) {
        self.failures.insert(rule, message);
    }

    pub(crate) fn insert_child(&mut self, property: String, subtree: ErrorTree) {
        self.children.insert(property, subtree);
    }

    pub(crate) fn set_items(&mut self, items: Vec<ErrorTree>) {
        self.items = items;
    }

    pub(crate) fn into_children(self) -> impl Iterator<Item = (String, ErrorTree)> {
        self.children.into_iter()
    }

    /// Render the tree as a JSON value mirroring the data's shape.
    ///
    /// Rule failures and nested property subtrees merge into one object per
    /// position. A position that validated an array renders as a JSON array
    /// with `{}` at clean indices; if that position also carries its own
    /// rule failures, the elements appear index-keyed next to them instead.
    pub fn to_value(&self) -> Value {
        let has_own = !self.failures.is_empty() || !self.children.is_empty();

        if !has_own && !self.items.is_empty() {
            return Value::Array(self.items.iter().map(ErrorTree::to_value).collect());
        }

        let mut map = serde_json::Map::new();
        for (rule, message) in &self.failures {
            map.insert(rule.clone(), Value::String(message.clone()));
        }
        for (property, subtree) in &self.children {
            map.insert(property.clone(), subtree.to_value());
        }
        for (index, item) in self.items.iter().enumerate() {
            if !item.is_empty() {
                map.insert(index.to_string(), item.to_value());
            }
        }
        Value::Object(map)
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
