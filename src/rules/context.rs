//! Rule functions and the payload they are invoked with.
//!
//! Every rule resolves to a future of `bool` regardless of whether the
//! underlying function is synchronous. The orchestrator always awaits, so
//! synchronous predicates are wrapped in an already-resolved future at the
//! boundary.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::future;
use serde_json::Value;

use crate::errors::{ValidateError, ValidateResult};
use crate::schema::SchemaNode;

/// Future returned by a rule invocation
pub type RuleFuture = Pin<Box<dyn Future<Output = ValidateResult<bool>> + Send>>;

/// The operands a rule function is invoked with.
///
/// Beyond the value under test and the expected parameter, a rule sees the
/// name of the property being validated, the object containing it, the root
/// schema of the run, and the rule it overrode (if any). The last two are
/// what make cross-field conditional rules expressible: a custom rule can
/// inspect sibling data through `parent` and hand the final verdict back to
/// the stock behavior through [`RuleContext::delegate`].
#[derive(Clone, Debug)]
pub struct RuleContext {
    /// The value under test (`Null` when the property is absent)
    pub actual: Value,
    /// The declared expected parameter (`Null` for function-valued specs)
    pub expected: Value,
    /// Name of the property being validated ("" at the root position)
    pub property: String,
    /// The object containing the property
    pub parent: Value,
    /// Root schema of this validation run
    pub schema: Arc<SchemaNode>,
    /// The rule from the next precedence level down, when this rule is an
    /// override
    pub default_rule: Option<RuleFn>,
}

impl RuleContext {
    /// Invoke the overridden rule with a substituted expected parameter.
    ///
    /// Delegating when there is no overridden rule is a defect in the
    /// calling rule and faults the validation call.
    pub fn delegate(&self, expected: Value) -> RuleFuture {
        match &self.default_rule {
            Some(default) => {
                let mut ctx = self.clone();
                ctx.expected = expected;
                ctx.default_rule = None;
                default.call(ctx)
            }
            None => Box::pin(future::ready(Err(ValidateError::RuleFault {
                property: self.property.clone(),
                reason: "delegated with no overridden rule to delegate to".to_string(),
            }))),
        }
    }
}

/// A rule function behind a cloneable handle.
///
/// Use [`RuleFn::new`] for natively asynchronous rules,
/// [`RuleFn::from_sync`] for plain predicates, and
/// [`RuleFn::from_fallible`] for predicates that can themselves fail.
#[derive(Clone)]
pub struct RuleFn(Arc<dyn Fn(RuleContext) -> RuleFuture + Send + Sync>);

impl RuleFn {
    /// Wrap an asynchronous rule function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(RuleContext) -> RuleFuture + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap a synchronous predicate in the uniform await protocol
    pub fn from_sync<F>(f: F) -> Self
    where
        F: Fn(&RuleContext) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(move |ctx: RuleContext| {
            let passed = f(&ctx);
            Box::pin(future::ready(Ok(passed)))
        }))
    }

    /// Wrap a synchronous predicate that can fail.
    ///
    /// An `Err` surfaces as [`ValidateError::RuleFault`] and aborts the
    /// validate call; it is never recorded as a per-field failure.
    pub fn from_fallible<F>(f: F) -> Self
    where
        F: Fn(&RuleContext) -> Result<bool, String> + Send + Sync + 'static,
    {
        Self(Arc::new(move |ctx: RuleContext| {
            let outcome = f(&ctx).map_err(|reason| ValidateError::RuleFault {
                property: ctx.property.clone(),
                reason,
            });
            Box::pin(future::ready(outcome))
        }))
    }

    /// Invoke the rule with the given context
    pub fn call(&self, ctx: RuleContext) -> RuleFuture {
        (self.0)(ctx)
    }
}

impl fmt::Debug for RuleFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RuleFn")
    }
}
