//! Validation Engine Invariant Tests
//!
//! - An empty schema produces an empty error tree for any data
//! - Message overrides resolve property, then root schema, then registry
//!   default, then generic default
//! - Error trees mirror the data's shape, sparsely
//! - Array results are index-aligned with the input
//! - Synchronous and asynchronous rules are observably identical
//! - Validation is deterministic and idempotent

use std::sync::Arc;

use serde_json::{json, Value};
use verdict::{
    validate, Engine, MessageFn, MessageSpec, RuleFn, RuleRegistry, SchemaNode, ValidateError,
    Validator,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn person_schema() -> SchemaNode {
    SchemaNode::new().property("FirstName", SchemaNode::new().rule("required", true))
}

fn double_rule_sync() -> RuleFn {
    RuleFn::from_sync(|ctx| {
        match (ctx.actual.as_i64(), ctx.expected.as_i64()) {
            (Some(actual), Some(expected)) => actual == expected * 2,
            _ => false,
        }
    })
}

// =============================================================================
// Empty Schema and Empty Data
// =============================================================================

/// A schema with no rules or properties anywhere accepts anything.
#[tokio::test]
async fn test_empty_schema_yields_empty_tree() {
    let schema = SchemaNode::new();

    for data in [
        json!({ "FirstName": 2 }),
        json!([1, 2, 3]),
        json!("scalar"),
        Value::Null,
    ] {
        let errors = validate(&schema, &data).await.unwrap();
        assert!(errors.is_empty(), "expected empty tree for {}", data);
        assert_eq!(errors.to_value(), json!({}));
    }
}

/// Validating an empty object still enforces declared rules: the absent
/// property is evaluated as null.
#[tokio::test]
async fn test_absent_property_fails_required() {
    let errors = validate(&person_schema(), &json!({})).await.unwrap();
    assert!(errors.child("FirstName").unwrap().message("required").is_some());
}

#[tokio::test]
async fn test_null_property_fails_required() {
    let errors = validate(&person_schema(), &json!({ "FirstName": null }))
        .await
        .unwrap();
    assert!(errors.child("FirstName").unwrap().message("required").is_some());
}

// =============================================================================
// Rule Overrides
// =============================================================================

/// A function-valued entry in the root schema's rules map redefines the
/// rule for the whole run. Permitting the empty string makes the stock
/// failure disappear.
#[tokio::test]
async fn test_root_override_changes_required_outcome() {
    let data = json!({ "FirstName": "" });

    let stock = validate(&person_schema(), &data).await.unwrap();
    assert!(stock.child("FirstName").is_some());

    let schema = person_schema().rule(
        "required",
        RuleFn::from_sync(|ctx| !ctx.actual.is_null()),
    );
    let overridden = validate(&schema, &data).await.unwrap();
    assert!(overridden.is_empty());
}

/// A property-level function is used directly as the rule.
#[tokio::test]
async fn test_property_level_function_is_the_rule() {
    let schema = SchemaNode::new().property(
        "Code",
        SchemaNode::new().rule("required", RuleFn::from_sync(|ctx| ctx.actual.is_string())),
    );

    let errors = validate(&schema, &json!({ "Code": 5 })).await.unwrap();
    assert!(errors.child("Code").unwrap().message("required").is_some());

    let errors = validate(&schema, &json!({ "Code": "ok" })).await.unwrap();
    assert!(errors.is_empty());
}

/// A custom rule can delegate to the rule it overrode, conditioning the
/// stock behavior on sibling data.
#[tokio::test]
async fn test_override_delegates_to_stock_rule_per_row() {
    let row_required = RuleFn::new(|ctx| {
        let filled = ctx.parent.get("Sku").map(truthy).unwrap_or(false)
            || ctx.parent.get("Price").map(truthy).unwrap_or(false);
        let expected = if filled {
            json!(true)
        } else {
            json!({ "allowEmpty": true })
        };
        ctx.delegate(expected)
    });

    fn truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    let row = SchemaNode::new()
        .property("Sku", SchemaNode::new().rule("required", row_required.clone()))
        .property("Price", SchemaNode::new().rule("required", row_required));
    let schema = SchemaNode::new().property("Rows", row);

    let data = json!({
        "Rows": [
            { "Sku": "rp1111", "Price": "33.33" },
            { "Sku": "aa", "Price": "" },
            { "Sku": "", "Price": "" }
        ]
    });

    let errors = validate(&schema, &data).await.unwrap();
    let rows = errors.child("Rows").unwrap();

    // Fully filled row: clean. Half-filled row: the empty field is now
    // required. Fully empty row: both fields allowed empty.
    assert!(rows.item(0).unwrap().is_empty());
    assert!(rows.item(1).unwrap().child("Price").is_some());
    assert!(rows.item(1).unwrap().child("Sku").is_none());
    assert!(rows.item(2).unwrap().is_empty());
}

// =============================================================================
// Message Precedence
// =============================================================================

/// Property-level message beats root-schema message beats registered
/// default beats generic default; each level is used verbatim.
#[tokio::test]
async fn test_message_precedence_chain() {
    let data = json!({ "FirstName": null });

    // Registered default
    let errors = validate(&person_schema(), &data).await.unwrap();
    assert_eq!(
        errors.child("FirstName").unwrap().message("required"),
        Some("is required")
    );

    // Root-schema override
    let schema = person_schema().message("required", "Field is required");
    let errors = validate(&schema, &data).await.unwrap();
    assert_eq!(
        errors.child("FirstName").unwrap().message("required"),
        Some("Field is required")
    );

    // Property-level override beats the root-schema one
    let schema = SchemaNode::new()
        .message("required", "Field is required")
        .property(
            "FirstName",
            SchemaNode::new()
                .rule("required", true)
                .message("required", "FirstName is required"),
        );
    let errors = validate(&schema, &data).await.unwrap();
    assert_eq!(
        errors.child("FirstName").unwrap().message("required"),
        Some("FirstName is required")
    );
}

/// A rule registered without a default message falls back to the generic
/// default.
#[tokio::test]
async fn test_generic_default_message() {
    let mut registry = RuleRegistry::with_builtins();
    registry.register_rule("never", RuleFn::from_sync(|_| false), None);

    let engine = Engine::with_registry(Arc::new(registry));
    let schema = SchemaNode::new().property("X", SchemaNode::new().rule("never", true));

    let errors = engine.validate(&schema, &json!({ "X": 1 })).await.unwrap();
    let message = errors.child("X").unwrap().message("never").unwrap();
    assert!(!message.is_empty());
}

/// Template placeholders substitute the operands' string forms.
#[tokio::test]
async fn test_custom_rule_with_template_message() {
    let schema = SchemaNode::new()
        .rule("myRule", double_rule_sync())
        .message("myRule", "%{actual} !== %{expected} * 2")
        .property(
            "FirstName",
            SchemaNode::new().rule("min", 6).rule("myRule", 2),
        );

    let errors = validate(&schema, &json!({ "FirstName": 2 })).await.unwrap();
    let first_name = errors.child("FirstName").unwrap();
    assert!(first_name.message("min").is_some());
    assert_eq!(first_name.message("myRule"), Some("2 !== 2 * 2"));
}

// =============================================================================
// Nesting and Arrays
// =============================================================================

#[tokio::test]
async fn test_nested_schema_mirrors_shape() {
    let schema = SchemaNode::new().property(
        "Person",
        SchemaNode::new()
            .rule("required", true)
            .property("FirstName", SchemaNode::new().rule("required", true)),
    );

    let errors = validate(&schema, &json!({ "Person": { "FirstName": null } }))
        .await
        .unwrap();

    let person = errors.child("Person").unwrap();
    // The object itself is present, so its own rule passes
    assert!(person.message("required").is_none());
    assert!(person.child("FirstName").unwrap().message("required").is_some());
}

#[tokio::test]
async fn test_deep_nesting() {
    let schema = SchemaNode::new().property(
        "A",
        SchemaNode::new().property("B", SchemaNode::new().rule("required", true)),
    );

    let errors = validate(&schema, &json!({ "A": { "B": null } })).await.unwrap();
    assert!(errors
        .child("A")
        .unwrap()
        .child("B")
        .unwrap()
        .message("required")
        .is_some());
}

/// Array results are index-aligned; clean elements stay empty rather than
/// being dropped or null-filled.
#[tokio::test]
async fn test_array_elements_index_aligned() {
    let schema = SchemaNode::new().property(
        "Persons",
        SchemaNode::new().property("FirstName", SchemaNode::new().rule("required", true)),
    );

    let data = json!({
        "Persons": [
            { "FirstName": "John" },
            { "FirstName": null },
            { "FirstName": "Bob" }
        ]
    });

    let errors = validate(&schema, &data).await.unwrap();
    let persons = errors.child("Persons").unwrap();

    assert_eq!(persons.items().len(), 3);
    assert!(persons.item(0).unwrap().is_empty());
    assert!(persons.item(1).unwrap().child("FirstName").is_some());
    assert!(persons.item(2).unwrap().is_empty());
}

/// Nested properties against a scalar skip the nested pass entirely.
#[tokio::test]
async fn test_nested_schema_against_scalar_is_skipped() {
    let schema = SchemaNode::new().property(
        "Person",
        SchemaNode::new()
            .rule("type", "object")
            .property("FirstName", SchemaNode::new().rule("required", true)),
    );

    let errors = validate(&schema, &json!({ "Person": "not-an-object" }))
        .await
        .unwrap();

    let person = errors.child("Person").unwrap();
    assert!(person.message("type").is_some());
    assert!(person.child("FirstName").is_none());
    assert!(person.items().is_empty());
}

// =============================================================================
// High-Level Shorthand
// =============================================================================

/// Property names directly as schema keys, no enclosing properties wrapper.
#[tokio::test]
async fn test_high_level_schema_equivalent_to_canonical() {
    let shorthand = SchemaNode::from_value(&json!({
        "FirstName": { "rules": { "required": true } }
    }))
    .unwrap();

    let canonical = SchemaNode::from_value(&json!({
        "properties": {
            "FirstName": { "rules": { "required": true } }
        }
    }))
    .unwrap();

    let data = json!({ "FirstName": null });
    let from_shorthand = validate(&shorthand, &data).await.unwrap();
    let from_canonical = validate(&canonical, &data).await.unwrap();

    assert_eq!(from_shorthand, from_canonical);
    assert!(from_shorthand.child("FirstName").unwrap().message("required").is_some());
}

// =============================================================================
// Asynchronous Rules and Messages
// =============================================================================

/// An asynchronous rule produces the same tree as its synchronous twin.
#[tokio::test]
async fn test_async_rule_matches_sync_rule() {
    let async_double = RuleFn::new(|ctx| {
        Box::pin(async move {
            tokio::task::yield_now().await;
            Ok(match (ctx.actual.as_i64(), ctx.expected.as_i64()) {
                (Some(actual), Some(expected)) => actual == expected * 2,
                _ => false,
            })
        })
    });

    let schema_sync = SchemaNode::new()
        .rule("myRule", double_rule_sync())
        .message("myRule", "%{actual} !== %{expected} * 2")
        .property("FirstName", SchemaNode::new().rule("myRule", 2));
    let schema_async = SchemaNode::new()
        .rule("myRule", async_double)
        .message("myRule", "%{actual} !== %{expected} * 2")
        .property("FirstName", SchemaNode::new().rule("myRule", 2));

    let data = json!({ "FirstName": 2 });
    let sync_tree = validate(&schema_sync, &data).await.unwrap();
    let async_tree = validate(&schema_async, &data).await.unwrap();

    assert_eq!(sync_tree, async_tree);
    assert_eq!(
        async_tree.child("FirstName").unwrap().message("myRule"),
        Some("2 !== 2 * 2")
    );
}

/// An asynchronous message function produces the same tree as a template.
#[tokio::test]
async fn test_async_message_matches_template() {
    let async_message = MessageSpec::Function(MessageFn::new(|actual: &Value, expected: &Value| {
        let rendered = format!("{} !== {} * 2", actual, expected);
        Box::pin(async move {
            tokio::task::yield_now().await;
            Ok(rendered)
        })
    }));

    let schema = SchemaNode::new()
        .rule("myRule", double_rule_sync())
        .message("myRule", async_message)
        .property("FirstName", SchemaNode::new().rule("myRule", 2));

    let errors = validate(&schema, &json!({ "FirstName": 2 })).await.unwrap();
    assert_eq!(
        errors.child("FirstName").unwrap().message("myRule"),
        Some("2 !== 2 * 2")
    );
}

// =============================================================================
// Determinism and Idempotence
// =============================================================================

/// Same schema, same data, no registry mutation: structurally equal trees.
#[tokio::test]
async fn test_validation_is_idempotent() {
    let schema = SchemaNode::from_value(&json!({
        "properties": {
            "FirstName": {
                "rules": { "type": "string", "required": true, "maxLength": 45 }
            },
            "Email": {
                "rules": { "type": "string", "required": true, "format": "email" }
            },
            "Zip": {
                "rules": { "type": "string", "required": true, "pattern": "^[0-9]{5}$" }
            }
        }
    }))
    .unwrap();

    let data = json!({ "FirstName": null, "Email": "not-an-email", "Zip": "92620" });

    let first = validate(&schema, &data).await.unwrap();
    let second = validate(&schema, &data).await.unwrap();
    assert_eq!(first, second);

    assert!(first.child("FirstName").unwrap().message("required").is_some());
    assert!(first.child("Email").unwrap().message("format").is_some());
    assert!(first.child("Zip").is_none());
}

// =============================================================================
// Configuration Errors and Faults
// =============================================================================

/// A declared rule with no resolvable function aborts the whole call; no
/// partial tree is returned.
#[tokio::test]
async fn test_unknown_rule_aborts_whole_call() {
    let schema = SchemaNode::new()
        .property("A", SchemaNode::new().rule("required", true))
        .property("B", SchemaNode::new().rule("noSuchRule", true));

    let result = validate(&schema, &json!({ "A": null, "B": 1 })).await;
    match result {
        Err(ValidateError::UnknownRule { rule, property }) => {
            assert_eq!(rule, "noSuchRule");
            assert_eq!(property, "B");
        }
        other => panic!("expected UnknownRule, got {:?}", other),
    }
}

/// A faulting rule function is a programming defect, not a validation
/// outcome.
#[tokio::test]
async fn test_rule_fault_propagates() {
    let schema = SchemaNode::new().property(
        "X",
        SchemaNode::new().rule(
            "required",
            RuleFn::from_fallible(|_| Err("backend unavailable".to_string())),
        ),
    );

    let result = validate(&schema, &json!({ "X": 1 })).await;
    assert!(matches!(result, Err(ValidateError::RuleFault { .. })));
}

/// An invalid pattern is a schema defect and faults the call.
#[tokio::test]
async fn test_invalid_pattern_faults() {
    let schema = SchemaNode::new().property("X", SchemaNode::new().rule("pattern", "("));

    let result = validate(&schema, &json!({ "X": "abc" })).await;
    assert!(matches!(result, Err(ValidateError::RuleFault { .. })));
}

// =============================================================================
// Registry and Wrapper
// =============================================================================

#[tokio::test]
async fn test_registered_rule_usable_in_schema() {
    let mut registry = RuleRegistry::with_builtins();
    registry.register_rule(
        "even",
        RuleFn::from_sync(|ctx| ctx.actual.as_i64().map(|n| n % 2 == 0).unwrap_or(true)),
        Some("must be even".into()),
    );
    assert!(registry.has_rule("even"));

    let engine = Engine::with_registry(Arc::new(registry));
    let schema = SchemaNode::new().property("N", SchemaNode::new().rule("even", true));

    let errors = engine.validate(&schema, &json!({ "N": 3 })).await.unwrap();
    assert_eq!(errors.child("N").unwrap().message("even"), Some("must be even"));
}

/// The wrapper stores the schema and delegates; repeated validations see
/// identical behavior.
#[tokio::test]
async fn test_bound_validator_delegates() {
    let schema = SchemaNode::new()
        .rule("myRule", double_rule_sync())
        .message("myRule", "%{actual} !== %{expected} * 2")
        .property("FirstName", SchemaNode::new().rule("min", 6).rule("myRule", 2));
    let validator = Validator::new(schema);

    let errors = validator.validate(&json!({ "FirstName": 2 })).await.unwrap();
    let first_name = errors.child("FirstName").unwrap();
    assert!(first_name.message("min").is_some());
    assert_eq!(first_name.message("myRule"), Some("2 !== 2 * 2"));

    let again = validator.validate(&json!({ "FirstName": 2 })).await.unwrap();
    assert_eq!(errors, again);
}
