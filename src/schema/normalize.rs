//! Normalization of JSON-valued schemas into typed nodes.
//!
//! A JSON object is classified by its key set: a subset of
//! `{rules, messages, properties}` is the canonical form, anything else is
//! the high-level shorthand where every key names a property. The two forms
//! are interchangeable at every level of nesting. Classification is an
//! explicit branch on the key set, applied once at entry; the engine never
//! re-inspects shapes.

use serde_json::{Map, Value};

use crate::errors::{ValidateError, ValidateResult};
use crate::message::MessageSpec;

use super::types::{RuleSpec, SchemaNode};

const RESERVED_KEYS: [&str; 3] = ["rules", "messages", "properties"];

impl SchemaNode {
    /// Build a schema node from a JSON value, accepting both the canonical
    /// form and the high-level shorthand at every nesting level.
    ///
    /// Rule specifications in JSON form are always literals; custom rule
    /// functions and message functions attach through the builder methods
    /// afterwards.
    pub fn from_value(value: &Value) -> ValidateResult<SchemaNode> {
        let obj = value.as_object().ok_or_else(|| {
            ValidateError::InvalidSchema(format!("schema node must be an object, got {}", value))
        })?;

        if is_canonical(obj) {
            Self::from_canonical(obj)
        } else {
            Self::from_shorthand(obj)
        }
    }

    fn from_canonical(obj: &Map<String, Value>) -> ValidateResult<SchemaNode> {
        let mut node = SchemaNode::new();

        if let Some(rules) = obj.get("rules") {
            let rules = rules.as_object().ok_or_else(|| {
                ValidateError::InvalidSchema(format!("'rules' must be an object, got {}", rules))
            })?;
            for (name, spec) in rules {
                node.rules.insert(name.clone(), RuleSpec::Value(spec.clone()));
            }
        }

        if let Some(messages) = obj.get("messages") {
            let messages = messages.as_object().ok_or_else(|| {
                ValidateError::InvalidSchema(format!(
                    "'messages' must be an object, got {}",
                    messages
                ))
            })?;
            for (name, spec) in messages {
                let template = spec.as_str().ok_or_else(|| {
                    ValidateError::InvalidSchema(format!(
                        "message for '{}' must be a string, got {}",
                        name, spec
                    ))
                })?;
                node.messages
                    .insert(name.clone(), MessageSpec::Template(template.to_string()));
            }
        }

        if let Some(properties) = obj.get("properties") {
            let properties = properties.as_object().ok_or_else(|| {
                ValidateError::InvalidSchema(format!(
                    "'properties' must be an object, got {}",
                    properties
                ))
            })?;
            for (name, child) in properties {
                node.properties
                    .insert(name.clone(), SchemaNode::from_value(child)?);
            }
        }

        Ok(node)
    }

    fn from_shorthand(obj: &Map<String, Value>) -> ValidateResult<SchemaNode> {
        let mut node = SchemaNode::new();
        for (name, child) in obj {
            node.properties
                .insert(name.clone(), SchemaNode::from_value(child)?);
        }
        Ok(node)
    }
}

fn is_canonical(obj: &Map<String, Value>) -> bool {
    obj.keys().all(|key| RESERVED_KEYS.contains(&key.as_str()))
}
