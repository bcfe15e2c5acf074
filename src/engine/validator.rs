//! Convenience wrapper binding a schema to a `validate` method.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::ValidateResult;
use crate::rules::RuleRegistry;
use crate::schema::SchemaNode;

use super::{Engine, ErrorTree};

/// A schema pre-bound for repeated validations.
///
/// Stores the schema (and the registry handle) and delegates to the
/// engine; adds no behavior of its own.
pub struct Validator {
    schema: Arc<SchemaNode>,
    engine: Engine,
}

impl Validator {
    /// Bind a schema over the built-in rule set
    pub fn new(schema: SchemaNode) -> Self {
        Self {
            schema: Arc::new(schema),
            engine: Engine::new(),
        }
    }

    /// Bind a schema over a caller-supplied registry
    pub fn with_registry(schema: SchemaNode, registry: Arc<RuleRegistry>) -> Self {
        Self {
            schema: Arc::new(schema),
            engine: Engine::with_registry(registry),
        }
    }

    /// The bound schema
    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Validate a value against the bound schema
    pub async fn validate(&self, data: &Value) -> ValidateResult<ErrorTree> {
        self.engine.validate_root(&self.schema, data).await
    }
}
