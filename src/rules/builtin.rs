//! Built-in rules.
//!
//! Every built-in is an ordinary rule function registered under its public
//! name together with a default message template. They can be overwritten
//! through [`RuleRegistry::register_rule`] or redefined per validation run
//! through a function-valued entry in the root schema's `rules` map.
//!
//! Presence is `required`'s concern alone. Every other rule passes
//! vacuously when the value is `null` or absent, so optional properties do
//! not accumulate noise failures.

use regex::Regex;
use serde_json::Value;

use super::context::{RuleContext, RuleFn};
use super::registry::RuleRegistry;

/// Register all built-in rules with their default messages
pub(crate) fn install(registry: &mut RuleRegistry) {
    registry.register_rule(
        "required",
        RuleFn::from_sync(required),
        Some("is required".into()),
    );
    registry.register_rule(
        "type",
        RuleFn::from_sync(type_of),
        Some("must be of type %{expected}".into()),
    );
    registry.register_rule(
        "min",
        RuleFn::from_sync(min),
        Some("must be at least %{expected}".into()),
    );
    registry.register_rule(
        "max",
        RuleFn::from_sync(max),
        Some("must be at most %{expected}".into()),
    );
    registry.register_rule(
        "minLength",
        RuleFn::from_sync(min_length),
        Some("is too short (minimum is %{expected})".into()),
    );
    registry.register_rule(
        "maxLength",
        RuleFn::from_sync(max_length),
        Some("is too long (maximum is %{expected})".into()),
    );
    registry.register_rule(
        "pattern",
        RuleFn::from_fallible(pattern),
        Some("does not match %{expected}".into()),
    );
    registry.register_rule(
        "enum",
        RuleFn::from_fallible(one_of),
        Some("must be one of %{expected}".into()),
    );
    registry.register_rule(
        "format",
        RuleFn::from_fallible(format),
        Some("is not a valid %{expected}".into()),
    );
}

/// Fails on `null` (which is also how absent properties are presented) and
/// on the empty string.
///
/// Expected forms: `true` enforces, `false` disables, and
/// `{"allowEmpty": true}` enforces presence while permitting the empty
/// string.
fn required(ctx: &RuleContext) -> bool {
    if ctx.expected == Value::Bool(false) {
        return true;
    }
    let allow_empty = ctx
        .expected
        .get("allowEmpty")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    match &ctx.actual {
        Value::Null => false,
        Value::String(s) if s.is_empty() => allow_empty,
        _ => true,
    }
}

/// Exact type match, no coercion. `"integer"` narrows `"number"` to values
/// without a fractional part.
fn type_of(ctx: &RuleContext) -> bool {
    if ctx.actual.is_null() {
        return true;
    }
    let Some(expected) = ctx.expected.as_str() else {
        return true;
    };
    match expected {
        "string" => ctx.actual.is_string(),
        "number" => ctx.actual.is_number(),
        "integer" => ctx.actual.is_i64() || ctx.actual.is_u64(),
        "boolean" => ctx.actual.is_boolean(),
        "object" => ctx.actual.is_object(),
        "array" => ctx.actual.is_array(),
        "null" => false,
        _ => true,
    }
}

/// Inclusive numeric lower bound
fn min(ctx: &RuleContext) -> bool {
    match (ctx.actual.as_f64(), ctx.expected.as_f64()) {
        (Some(actual), Some(expected)) => actual >= expected,
        _ => true,
    }
}

/// Inclusive numeric upper bound
fn max(ctx: &RuleContext) -> bool {
    match (ctx.actual.as_f64(), ctx.expected.as_f64()) {
        (Some(actual), Some(expected)) => actual <= expected,
        _ => true,
    }
}

/// Length of a string in characters, or of an array in elements
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn min_length(ctx: &RuleContext) -> bool {
    match (length_of(&ctx.actual), ctx.expected.as_u64()) {
        (Some(len), Some(expected)) => len as u64 >= expected,
        _ => true,
    }
}

fn max_length(ctx: &RuleContext) -> bool {
    match (length_of(&ctx.actual), ctx.expected.as_u64()) {
        (Some(len), Some(expected)) => len as u64 <= expected,
        _ => true,
    }
}

/// Regular-expression match over string values.
///
/// An invalid pattern is a fault in the schema, not a validation failure.
fn pattern(ctx: &RuleContext) -> Result<bool, String> {
    let Some(actual) = ctx.actual.as_str() else {
        return Ok(true);
    };
    let Some(source) = ctx.expected.as_str() else {
        return Err(format!(
            "pattern rule expects a string pattern, got {}",
            ctx.expected
        ));
    };
    let re = Regex::new(source).map_err(|e| format!("invalid pattern '{}': {}", source, e))?;
    Ok(re.is_match(actual))
}

/// Membership of the value in the expected array
fn one_of(ctx: &RuleContext) -> Result<bool, String> {
    if ctx.actual.is_null() {
        return Ok(true);
    }
    let Some(choices) = ctx.expected.as_array() else {
        return Err(format!(
            "enum rule expects an array of choices, got {}",
            ctx.expected
        ));
    };
    Ok(choices.contains(&ctx.actual))
}

/// Named string formats
fn format(ctx: &RuleContext) -> Result<bool, String> {
    let Some(actual) = ctx.actual.as_str() else {
        return Ok(true);
    };
    let Some(name) = ctx.expected.as_str() else {
        return Err(format!("format rule expects a format name, got {}", ctx.expected));
    };
    let source = match name {
        "email" => r"^[^@\s]+@[^@\s]+\.[^@\s]+$",
        "url" => r"^https?://[^\s/$.?#].[^\s]*$",
        other => return Err(format!("unknown format '{}'", other)),
    };
    let re = Regex::new(source).map_err(|e| format!("invalid format pattern: {}", e))?;
    Ok(re.is_match(actual))
}
