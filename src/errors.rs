//! # Validation Errors
//!
//! Error types for the validation engine.
//!
//! A failing rule is NOT an error: it is recorded in the error tree and the
//! call still resolves. The variants here cover the abnormal outcomes that
//! abort a `validate` call:
//! - Configuration errors (unresolvable rule name, malformed schema value)
//! - Faults raised by custom rule or message functions

use thiserror::Error;

/// Result type for validation operations
pub type ValidateResult<T> = Result<T, ValidateError>;

/// Abnormal outcomes of a validation call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidateError {
    // ==================
    // Configuration Errors
    // ==================
    /// A declared rule name has no resolvable function anywhere in the
    /// override chain or the registry
    #[error("no rule function for '{rule}' on property '{property}'")]
    UnknownRule {
        /// The declared rule name
        rule: String,
        /// The property that declared it ("" for the root position)
        property: String,
    },

    /// A schema value could not be normalized into schema nodes
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    // ==================
    // Function Faults
    // ==================
    /// A rule function returned an error instead of a verdict
    #[error("rule fault on property '{property}': {reason}")]
    RuleFault {
        /// The property being validated when the rule faulted
        property: String,
        /// What went wrong inside the rule function
        reason: String,
    },

    /// A message function failed while formatting a failure message
    #[error("message fault: {reason}")]
    MessageFault {
        /// What went wrong inside the message function
        reason: String,
    },
}
