//! verdict - a strict, declarative, asynchronous object validation engine
//!
//! Given a schema describing constraints on the shape and content of a
//! data structure, `verdict` walks an arbitrary `serde_json::Value` and
//! produces an [`ErrorTree`] mirroring the value's shape, populated only
//! where constraints failed.
//!
//! # Design Principles
//!
//! - Declarative schemas; the engine never mutates data or schema
//! - Synchronous and asynchronous rules share one await protocol
//! - Rule and message overrides resolve through an explicit precedence
//!   chain (root schema, property, registry default)
//! - Sparse results: a fully valid value yields an empty tree
//! - Deterministic traversal and assembly
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use verdict::{validate, SchemaNode};
//!
//! # async fn demo() -> verdict::ValidateResult<()> {
//! let schema = SchemaNode::from_value(&json!({
//!     "FirstName": { "rules": { "required": true } }
//! }))?;
//!
//! let errors = validate(&schema, &json!({ "FirstName": null })).await?;
//! assert!(errors.child("FirstName").unwrap().message("required").is_some());
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod errors;
pub mod message;
pub mod rules;
pub mod schema;

pub use engine::{validate, Engine, ErrorTree, Validator};
pub use errors::{ValidateError, ValidateResult};
pub use message::{format_message, MessageFn, MessageFuture, MessageSpec};
pub use rules::{RuleContext, RuleFn, RuleFuture, RuleRegistry};
pub use schema::{RuleSpec, SchemaNode};
