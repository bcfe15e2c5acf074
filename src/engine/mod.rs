//! # Validation Engine
//!
//! Recursive traversal of a schema against a data value, producing an
//! error tree that mirrors the data's shape.
//!
//! # Design Principles
//!
//! - Validation never mutates the data or the schema
//! - Every rule and message outcome is awaited through one protocol
//! - Rules, sibling properties, and array elements are initiated together
//!   and joined; completion order never affects the result
//! - A clean position contributes nothing to its parent (sparse results)
//! - Configuration errors and function faults abort the whole call; no
//!   partial tree is ever returned

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::future::try_join_all;
use serde_json::Value;
use tracing::{debug, trace};

use crate::errors::{ValidateError, ValidateResult};
use crate::message::format_message;
use crate::rules::{resolve_rule, RuleContext, RuleRegistry};
use crate::schema::SchemaNode;

mod tree;
mod validator;

pub use tree::ErrorTree;
pub use validator::Validator;

static NULL: Value = Value::Null;

type TreeFuture<'a> = Pin<Box<dyn Future<Output = ValidateResult<ErrorTree>> + Send + 'a>>;

/// Validate a value against a schema using the built-in rule set.
///
/// Convenience entry point; use [`Engine::with_registry`] to validate
/// against a registry carrying custom rules.
pub async fn validate(schema: &SchemaNode, data: &Value) -> ValidateResult<ErrorTree> {
    Engine::new().validate(schema, data).await
}

/// The validation engine.
///
/// Holds a shared rule registry and walks schemas against data values.
/// The engine is cheap to keep around and reuse; each call produces a
/// fresh [`ErrorTree`].
pub struct Engine {
    registry: Arc<RuleRegistry>,
}

impl Engine {
    /// Engine over a registry pre-populated with the built-in rules
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RuleRegistry::with_builtins()),
        }
    }

    /// Engine over a caller-supplied registry
    pub fn with_registry(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this engine resolves rules against
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Validate a value against a schema.
    ///
    /// Resolves to the error tree (empty when fully valid). Fails only on
    /// configuration errors (an unresolvable rule name) or faults raised
    /// by custom rule or message functions; a failing rule is part of the
    /// tree, not an error.
    pub async fn validate(&self, schema: &SchemaNode, data: &Value) -> ValidateResult<ErrorTree> {
        let root = Arc::new(schema.clone());
        self.validate_root(&root, data).await
    }

    pub(crate) async fn validate_root(
        &self,
        root: &Arc<SchemaNode>,
        data: &Value,
    ) -> ValidateResult<ErrorTree> {
        self.validate_node(root, "", data, data, root, true).await
    }

    /// Validate one schema position against the value found there.
    ///
    /// At the root position, function-valued entries in `rules` are
    /// run-wide redefinitions and are not applied as rules; literal-valued
    /// entries are applied against the data value itself.
    fn validate_node<'a>(
        &'a self,
        node: &'a SchemaNode,
        property: &'a str,
        value: &'a Value,
        parent: &'a Value,
        root: &'a Arc<SchemaNode>,
        at_root: bool,
    ) -> TreeFuture<'a> {
        Box::pin(async move {
            trace!(property, "validating position");
            let mut tree = ErrorTree::new();

            let failures = self
                .evaluate_rules(node, property, value, parent, root, at_root)
                .await?;
            for (rule, message) in failures {
                tree.insert_failure(rule, message);
            }

            if !node.properties.is_empty() {
                match value {
                    Value::Array(elements) => {
                        let passes = elements
                            .iter()
                            .map(|element| self.validate_members(node, element, root));
                        let items = try_join_all(passes).await?;
                        if items.iter().any(|item| !item.is_empty()) {
                            tree.set_items(items);
                        }
                    }
                    Value::Object(_) => {
                        let nested = self.validate_members(node, value, root).await?;
                        for (name, subtree) in nested.into_children() {
                            tree.insert_child(name, subtree);
                        }
                    }
                    // Neither object nor array: the nested pass is skipped.
                    // Rules declared at this position already judged the value.
                    _ => {}
                }
            }

            Ok(tree)
        })
    }

    /// Validate every declared property of `node` against the members of
    /// `data`, all initiated before any is awaited.
    ///
    /// A property absent from the data is evaluated as `null`.
    fn validate_members<'a>(
        &'a self,
        node: &'a SchemaNode,
        data: &'a Value,
        root: &'a Arc<SchemaNode>,
    ) -> TreeFuture<'a> {
        Box::pin(async move {
            let passes = node.properties.iter().map(|(name, child)| {
                let value = data.get(name.as_str()).unwrap_or(&NULL);
                async move {
                    let subtree = self
                        .validate_node(child, name, value, data, root, false)
                        .await?;
                    Ok::<_, ValidateError>((name, subtree))
                }
            });

            let mut tree = ErrorTree::new();
            for (name, subtree) in try_join_all(passes).await? {
                if !subtree.is_empty() {
                    tree.insert_child(name.clone(), subtree);
                }
            }
            Ok(tree)
        })
    }

    /// Evaluate every rule declared at one position.
    ///
    /// All rule futures are initiated, then joined; messages for the
    /// failures are then resolved the same way. Returns the failing rules
    /// with their resolved messages.
    async fn evaluate_rules(
        &self,
        node: &SchemaNode,
        property: &str,
        value: &Value,
        parent: &Value,
        root: &Arc<SchemaNode>,
        at_root: bool,
    ) -> ValidateResult<Vec<(String, String)>> {
        if node.rules.is_empty() {
            return Ok(Vec::new());
        }

        let mut pending = Vec::new();
        for (name, spec) in &node.rules {
            if at_root && spec.as_function().is_some() {
                // Run-wide redefinition, consumed by the resolver
                continue;
            }

            let resolved = resolve_rule(name, property, spec, root, &self.registry)?;
            let expected = spec.expected();
            let ctx = RuleContext {
                actual: value.clone(),
                expected: expected.clone(),
                property: property.to_string(),
                parent: parent.clone(),
                schema: root.clone(),
                default_rule: resolved.default_rule,
            };
            let outcome = resolved.func.call(ctx);
            pending.push(async move { Ok::<_, ValidateError>((name.as_str(), expected, outcome.await?)) });
        }

        let mut formats = Vec::new();
        for (name, expected, passed) in try_join_all(pending).await? {
            if passed {
                trace!(property, rule = name, "rule passed");
                continue;
            }
            debug!(property, rule = name, "rule failed");

            let spec = node
                .messages
                .get(name)
                .or_else(|| root.messages.get(name))
                .or_else(|| self.registry.default_message(name));
            formats.push(async move {
                let message = format_message(spec, value, &expected).await?;
                Ok::<_, ValidateError>((name.to_string(), message))
            });
        }

        try_join_all(formats).await
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
