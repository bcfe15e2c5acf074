//! Schema node and rule specification types.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::message::MessageSpec;
use crate::rules::RuleFn;

/// Specification of one rule at one position.
///
/// Either an expected value consumed by a named rule, or a custom function
/// used directly as the rule. A function-valued specification in the root
/// schema's `rules` map redefines the named rule for the whole run instead.
#[derive(Clone, Debug)]
pub enum RuleSpec {
    /// Expected value handed to the rule function
    Value(Value),
    /// Custom rule function
    Function(RuleFn),
}

impl RuleSpec {
    /// The expected value carried by this specification.
    ///
    /// Function-valued specifications carry no literal; they see `Null`.
    pub fn expected(&self) -> Value {
        match self {
            RuleSpec::Value(v) => v.clone(),
            RuleSpec::Function(_) => Value::Null,
        }
    }

    /// The custom function, when this specification is one
    pub fn as_function(&self) -> Option<&RuleFn> {
        match self {
            RuleSpec::Function(f) => Some(f),
            RuleSpec::Value(_) => None,
        }
    }
}

impl From<Value> for RuleSpec {
    fn from(v: Value) -> Self {
        RuleSpec::Value(v)
    }
}

impl From<bool> for RuleSpec {
    fn from(v: bool) -> Self {
        RuleSpec::Value(Value::Bool(v))
    }
}

impl From<i64> for RuleSpec {
    fn from(v: i64) -> Self {
        RuleSpec::Value(Value::from(v))
    }
}

impl From<f64> for RuleSpec {
    fn from(v: f64) -> Self {
        RuleSpec::Value(Value::from(v))
    }
}

impl From<&str> for RuleSpec {
    fn from(v: &str) -> Self {
        RuleSpec::Value(Value::String(v.to_string()))
    }
}

impl From<RuleFn> for RuleSpec {
    fn from(f: RuleFn) -> Self {
        RuleSpec::Function(f)
    }
}

/// Constraints and nested structure for one position in the data.
///
/// All three maps are optional; a node with none of them is legal and
/// produces no errors for its position. Maps are ordered so traversal and
/// error assembly stay deterministic.
#[derive(Clone, Debug, Default)]
pub struct SchemaNode {
    /// Rule name to specification. In the root node, function-valued
    /// entries redefine rules for the whole run.
    pub rules: BTreeMap<String, RuleSpec>,
    /// Rule name to message override
    pub messages: BTreeMap<String, MessageSpec>,
    /// Child property name to child schema node
    pub properties: BTreeMap<String, SchemaNode>,
}

impl SchemaNode {
    /// An empty node with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a rule at this position
    pub fn rule(mut self, name: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        self.rules.insert(name.into(), spec.into());
        self
    }

    /// Override the message for a rule at this position
    pub fn message(mut self, name: impl Into<String>, spec: impl Into<MessageSpec>) -> Self {
        self.messages.insert(name.into(), spec.into());
        self
    }

    /// Attach a child schema under a property name
    pub fn property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.properties.insert(name.into(), node);
        self
    }

    /// Whether this node declares nothing at all
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.messages.is_empty() && self.properties.is_empty()
    }
}
