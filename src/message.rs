//! # Message Formatter
//!
//! Resolves a message specification plus the two rule operands into the
//! final display string for a failed rule.
//!
//! A specification is either a template string with `%{actual}` and
//! `%{expected}` placeholders, or a function over the two operands.
//! Synchronous and asynchronous message functions share one return
//! protocol: every outcome is a future, and synchronous results are
//! wrapped in an already-resolved future at the boundary.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::future;
use serde_json::Value;

use crate::errors::{ValidateError, ValidateResult};

/// Fallback used when no message specification applies anywhere
const GENERIC_MESSAGE: &str = "is invalid";

/// Future returned by message resolution
pub type MessageFuture = Pin<Box<dyn Future<Output = ValidateResult<String>> + Send>>;

/// A message function behind a cloneable handle.
///
/// Wraps `Fn(&actual, &expected) -> future of String`. Use [`MessageFn::new`]
/// for natively asynchronous functions and [`MessageFn::from_sync`] for plain
/// closures.
#[derive(Clone)]
pub struct MessageFn(Arc<dyn Fn(&Value, &Value) -> MessageFuture + Send + Sync>);

impl MessageFn {
    /// Wrap an asynchronous message function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> MessageFuture + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap a synchronous message function in the uniform await protocol
    pub fn from_sync<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(move |actual, expected| {
            let message = f(actual, expected);
            Box::pin(future::ready(Ok(message)))
        }))
    }

    /// Wrap a synchronous message function that can fail.
    ///
    /// An `Err` surfaces as [`ValidateError::MessageFault`] and aborts the
    /// validate call.
    pub fn from_fallible<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<String, String> + Send + Sync + 'static,
    {
        Self(Arc::new(move |actual, expected| {
            let outcome = f(actual, expected)
                .map_err(|reason| ValidateError::MessageFault { reason });
            Box::pin(future::ready(outcome))
        }))
    }

    /// Invoke the message function with the two operands
    pub fn call(&self, actual: &Value, expected: &Value) -> MessageFuture {
        (self.0)(actual, expected)
    }
}

impl fmt::Debug for MessageFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MessageFn")
    }
}

/// How to produce a failure message for a rule
#[derive(Clone, Debug)]
pub enum MessageSpec {
    /// Template string; `%{actual}` and `%{expected}` are substituted with
    /// the operands' string forms
    Template(String),
    /// Function invoked with the two operands
    Function(MessageFn),
}

impl From<&str> for MessageSpec {
    fn from(template: &str) -> Self {
        MessageSpec::Template(template.to_string())
    }
}

impl From<String> for MessageSpec {
    fn from(template: String) -> Self {
        MessageSpec::Template(template)
    }
}

impl From<MessageFn> for MessageSpec {
    fn from(f: MessageFn) -> Self {
        MessageSpec::Function(f)
    }
}

/// Resolves a message specification into the final display string.
///
/// With no specification, resolves to the generic default. Template strings
/// resolve immediately after placeholder substitution. Functions are invoked
/// with the operands and awaited; a failing function propagates as
/// [`ValidateError::MessageFault`].
pub async fn format_message(
    spec: Option<&MessageSpec>,
    actual: &Value,
    expected: &Value,
) -> ValidateResult<String> {
    match spec {
        None => Ok(substitute(GENERIC_MESSAGE, actual, expected)),
        Some(MessageSpec::Template(template)) => Ok(substitute(template, actual, expected)),
        Some(MessageSpec::Function(f)) => f.call(actual, expected).await,
    }
}

/// String form of an operand for display.
///
/// Strings render without JSON quoting; everything else renders as its JSON
/// text.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn substitute(template: &str, actual: &Value, expected: &Value) -> String {
    template
        .replace("%{actual}", &display_value(actual))
        .replace("%{expected}", &display_value(expected))
}
