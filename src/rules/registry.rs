//! Rule registry holding default rule functions and default messages.
//!
//! The registry is explicit, constructible state. It is built once,
//! pre-populated with the built-in rules, handed to the engine, and mutated
//! only through [`RuleRegistry::register_rule`]. Entries are inserted or
//! overwritten, never removed. Registration takes `&mut self`, so writes
//! cannot race in-flight validations holding a shared reference.

use std::collections::BTreeMap;

use crate::message::MessageSpec;

use super::builtin;
use super::context::RuleFn;

/// A registered rule: its default function and default message
#[derive(Clone, Debug)]
struct RuleEntry {
    func: RuleFn,
    message: Option<MessageSpec>,
}

/// Store of default rule functions and messages, indexed by rule name
#[derive(Debug)]
pub struct RuleRegistry {
    rules: BTreeMap<String, RuleEntry>,
}

impl RuleRegistry {
    /// Create a registry with no rules at all
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in rules
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        builtin::install(&mut registry);
        registry
    }

    /// Register a rule under the given name.
    ///
    /// Inserts or overwrites; overwriting a built-in is allowed.
    pub fn register_rule(
        &mut self,
        name: impl Into<String>,
        func: RuleFn,
        default_message: Option<MessageSpec>,
    ) {
        self.rules.insert(
            name.into(),
            RuleEntry {
                func,
                message: default_message,
            },
        );
    }

    /// Whether a rule is registered under the given name
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// The default function for a rule, if registered
    pub fn rule_fn(&self, name: &str) -> Option<&RuleFn> {
        self.rules.get(name).map(|entry| &entry.func)
    }

    /// The default message for a rule, if one was registered with it
    pub fn default_message(&self, name: &str) -> Option<&MessageSpec> {
        self.rules.get(name).and_then(|entry| entry.message.as_ref())
    }

    /// Names of all registered rules, in deterministic order
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
