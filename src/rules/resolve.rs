//! Rule resolution across the override precedence chain.
//!
//! Precedence, highest first:
//! 1. A function-valued entry for the rule name in the root schema's
//!    `rules` map (redefines the rule for the whole run)
//! 2. A function-valued property-level rule specification (a custom rule
//!    used directly at that property)
//! 3. The registry's default function for the name
//!
//! The overridden function from the next level down travels with the result
//! so the engine can pass it to the winning rule as its `default_rule`.

use crate::errors::{ValidateError, ValidateResult};
use crate::schema::{RuleSpec, SchemaNode};

use super::context::RuleFn;
use super::registry::RuleRegistry;

/// Outcome of rule resolution for one property/rule pair
#[derive(Clone, Debug)]
pub struct ResolvedRule {
    /// The function to invoke
    pub func: RuleFn,
    /// The function from the next precedence level down, if any
    pub default_rule: Option<RuleFn>,
}

/// Resolve the effective rule function for a declared rule.
///
/// `spec` is the property-level specification for `name`; `root` is the
/// root schema of the run. An unresolvable name is a configuration error,
/// not a validation failure.
pub fn resolve_rule(
    name: &str,
    property: &str,
    spec: &RuleSpec,
    root: &SchemaNode,
    registry: &RuleRegistry,
) -> ValidateResult<ResolvedRule> {
    let mut func: Option<RuleFn> = registry.rule_fn(name).cloned();
    let mut default_rule: Option<RuleFn> = None;

    if let RuleSpec::Function(f) = spec {
        default_rule = func;
        func = Some(f.clone());
    }

    if let Some(RuleSpec::Function(f)) = root.rules.get(name) {
        default_rule = func;
        func = Some(f.clone());
    }

    match func {
        Some(func) => Ok(ResolvedRule { func, default_rule }),
        None => Err(ValidateError::UnknownRule {
            rule: name.to_string(),
            property: property.to_string(),
        }),
    }
}
