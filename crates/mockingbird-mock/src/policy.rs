//! Name-based default return values.
//!
//! When neither the method nor the instance has a configured behavior, the
//! instance asks its [`DefaultPolicy`] for a value. The legacy policy guesses
//! from the method name (a `deleteUser` method returns `true`, a `listUsers`
//! method returns `[]`). This is a weak contract: it can hide a missing stub.
//! Use [`DefaultPolicy::strict`] to make unconfigured calls fail with
//! `NotConfigured` instead.

use serde_json::{json, Value};

/// How a rule matches a method id. Matching ignores ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    Contains(String),
    Prefix(String),
    Suffix(String),
    Exact(String),
}

impl NamePattern {
    /// Returns true if `method` matches this pattern.
    pub fn matches(&self, method: &str) -> bool {
        let method = method.to_ascii_lowercase();
        match self {
            NamePattern::Contains(needle) => method.contains(&needle.to_ascii_lowercase()),
            NamePattern::Prefix(prefix) => method.starts_with(&prefix.to_ascii_lowercase()),
            NamePattern::Suffix(suffix) => method.ends_with(&suffix.to_ascii_lowercase()),
            NamePattern::Exact(name) => method == name.to_ascii_lowercase(),
        }
    }
}

/// One row of the policy table.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultRule {
    /// Method names the rule applies to.
    pub pattern: NamePattern,
    /// Value returned for a matching method.
    pub value: Value,
}

impl DefaultRule {
    /// A rule returning `value` for names matching `pattern`.
    pub fn new(pattern: NamePattern, value: Value) -> Self {
        Self { pattern, value }
    }
}

/// Ordered table of method-name patterns to default values, plus an optional
/// generic fallback. The first matching rule wins.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultPolicy {
    rules: Vec<DefaultRule>,
    fallback: Option<Value>,
}

impl DefaultPolicy {
    /// The name heuristics existing test suites rely on.
    pub fn legacy() -> Self {
        let truthy = ["delete", "save", "update", "remove", "insert"]
            .into_iter()
            .map(|verb| DefaultRule::new(NamePattern::Contains(verb.into()), json!(true)));

        let collections = ["list", "search", "getall", "get_all", "fetchall", "fetch_all"]
            .into_iter()
            .map(|verb| DefaultRule::new(NamePattern::Prefix(verb.into()), json!([])));

        let predicates = ["exists", "is", "has"]
            .into_iter()
            .map(|verb| DefaultRule::new(NamePattern::Prefix(verb.into()), json!(false)));

        let mut rules: Vec<DefaultRule> = truthy.chain(collections).collect();
        rules.push(DefaultRule::new(NamePattern::Prefix("count".into()), json!(0)));
        rules.extend(predicates);

        Self {
            rules,
            fallback: Some(Value::Null),
        }
    }

    /// No rules and no fallback.
    pub fn strict() -> Self {
        Self {
            rules: Vec::new(),
            fallback: None,
        }
    }

    /// Picks the policy matching the `strict_defaults` setting.
    pub fn from_settings(settings: &mockingbird_core::MockSettings) -> Self {
        if settings.strict_defaults {
            Self::strict()
        } else {
            Self::legacy()
        }
    }

    /// Appends a rule. Rules added later have lower priority.
    pub fn with_rule(mut self, pattern: NamePattern, value: Value) -> Self {
        self.rules.push(DefaultRule::new(pattern, value));
        self
    }

    /// Inserts a rule ahead of all existing rules.
    pub fn with_priority_rule(mut self, pattern: NamePattern, value: Value) -> Self {
        self.rules.insert(0, DefaultRule::new(pattern, value));
        self
    }

    /// Sets or clears the generic fallback.
    pub fn with_fallback(mut self, fallback: Option<Value>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Rules in match order.
    pub fn rules(&self) -> &[DefaultRule] {
        &self.rules
    }

    /// The default value for `method`, or `None` if the policy has none.
    pub fn default_for(&self, method: &str) -> Option<Value> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(method))
            .map(|rule| rule.value.clone())
            .or_else(|| self.fallback.clone())
    }
}

impl Default for DefaultPolicy {
    fn default() -> Self {
        Self::legacy()
    }
}
