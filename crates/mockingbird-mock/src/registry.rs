//! Registry creating, caching and resetting mock instances.
//!
//! A registry is an ordinary value owned by the test run. Nothing is global:
//! tests that share a registry must call [`MockRegistry::reset_mocks`]
//! between independent cases, otherwise cached instances (and their call
//! ledgers) carry over.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::behavior::MockBehavior;
use crate::error::{MockError, Result};
use crate::instance::{MockInstance, ANONYMOUS_CAPABILITY};
use crate::policy::DefaultPolicy;

/// Declared shape of a capability and its preset behaviors.
#[derive(Debug, Clone)]
pub struct CapabilityTemplate {
    capability: String,
    methods: Vec<String>,
    behaviors: HashMap<String, MockBehavior>,
    default_behavior: Option<MockBehavior>,
}

impl CapabilityTemplate {
    /// A template with no declared methods.
    pub fn new(capability: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            methods: Vec::new(),
            behaviors: HashMap::new(),
            default_behavior: None,
        }
    }

    /// Declares a method of the capability.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.methods.push(method.into());
        self
    }

    /// Declares several methods.
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods.extend(methods.into_iter().map(Into::into));
        self
    }

    /// Presets the behavior of a declared method.
    pub fn behavior(mut self, method: impl Into<String>, behavior: MockBehavior) -> Self {
        self.behaviors.insert(method.into(), behavior);
        self
    }

    /// Presets the instance default behavior.
    pub fn default_behavior(mut self, behavior: MockBehavior) -> Self {
        self.default_behavior = Some(behavior);
        self
    }

    /// Capability the template describes.
    pub fn capability(&self) -> &str {
        &self.capability
    }

    /// Methods declared on the capability.
    pub fn declared_methods(&self) -> &[String] {
        &self.methods
    }

    /// Checks that the template can produce a mock.
    pub fn validate(&self) -> Result<()> {
        validate_capability_id(&self.capability)?;

        let mut seen = HashSet::new();
        for method in &self.methods {
            if method.trim().is_empty() {
                return Err(MockError::generation_failed(
                    &self.capability,
                    "template declares a blank method id",
                ));
            }
            if !seen.insert(method.as_str()) {
                return Err(MockError::generation_failed(
                    &self.capability,
                    format!("method {method} is declared twice"),
                ));
            }
        }

        let mut preset: Vec<&String> = self.behaviors.keys().collect();
        preset.sort();
        for method in preset {
            if !seen.contains(method.as_str()) {
                return Err(MockError::generation_failed(
                    &self.capability,
                    format!("behavior preset for undeclared method {method}"),
                ));
            }
        }

        Ok(())
    }
}

fn validate_capability_id(capability: &str) -> Result<()> {
    if capability.trim().is_empty() {
        return Err(MockError::generation_failed(
            capability,
            "capability id must not be blank",
        ));
    }
    Ok(())
}

/// Settings applied to every instance a registry builds.
#[derive(Debug, Clone, Default)]
pub struct MockRegistryConfig {
    /// Policy for methods without a configured behavior.
    pub default_policy: DefaultPolicy,
    /// Instance default behavior for generated mocks without a template default.
    pub default_behavior: Option<MockBehavior>,
}

impl MockRegistryConfig {
    /// Builds a registry config from the `[mocks]` settings.
    pub fn from_settings(settings: &mockingbird_core::MockSettings) -> Self {
        Self {
            default_policy: DefaultPolicy::from_settings(settings),
            default_behavior: None,
        }
    }
}

/// Creates and caches mock instances keyed by capability id.
#[derive(Debug, Default)]
pub struct MockRegistry {
    config: MockRegistryConfig,
    templates: HashMap<String, CapabilityTemplate>,
    cache: Mutex<HashMap<String, Arc<MockInstance>>>,
}

impl MockRegistry {
    /// Creates a registry with the legacy default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry with the given configuration.
    pub fn with_config(config: MockRegistryConfig) -> Self {
        Self {
            config,
            templates: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a template used when the capability is generated.
    ///
    /// Templates are setup-time configuration; validation happens when the
    /// capability is first generated.
    pub fn register_template(&mut self, template: CapabilityTemplate) {
        info!(capability = %template.capability, methods = template.methods.len(), "Registering capability template");
        self.templates
            .insert(template.capability.clone(), template);
    }

    /// The template registered for `capability`.
    pub fn template(&self, capability: &str) -> Option<&CapabilityTemplate> {
        self.templates.get(capability)
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, Arc<MockInstance>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn build(&self, capability: &str, behavior: Option<MockBehavior>) -> Result<MockInstance> {
        validate_capability_id(capability)?;

        let mut instance = MockInstance::new(capability, self.config.default_policy.clone());

        match self.templates.get(capability) {
            Some(template) => {
                template.validate()?;
                instance = instance.with_behaviors(
                    template
                        .behaviors
                        .iter()
                        .map(|(method, behavior)| (method.clone(), behavior.clone())),
                );
                if let Some(default) = behavior
                    .or_else(|| template.default_behavior.clone())
                    .or_else(|| self.config.default_behavior.clone())
                {
                    instance = instance.with_default_behavior(default);
                }
            }
            None => {
                // Unregistered capabilities get a generic instance.
                if let Some(default) = behavior.or_else(|| self.config.default_behavior.clone()) {
                    instance = instance.with_default_behavior(default);
                }
            }
        }

        Ok(instance)
    }

    /// Returns the cached mock for `capability`, creating it on first use.
    pub fn generate_mock(&self, capability: &str) -> Result<Arc<MockInstance>> {
        self.generate(capability, None)
    }

    /// Like [`generate_mock`](Self::generate_mock), with a default behavior
    /// for a newly created instance. A cached instance is returned unchanged.
    pub fn generate_mock_with(
        &self,
        capability: &str,
        default_behavior: MockBehavior,
    ) -> Result<Arc<MockInstance>> {
        self.generate(capability, Some(default_behavior))
    }

    #[instrument(skip(self, behavior))]
    fn generate(&self, capability: &str, behavior: Option<MockBehavior>) -> Result<Arc<MockInstance>> {
        let mut cache = self.cache();

        if let Some(existing) = cache.get(capability) {
            debug!(instance_id = %existing.id(), "Returning cached mock");
            return Ok(Arc::clone(existing));
        }

        let instance = Arc::new(self.build(capability, behavior)?);
        info!(instance_id = %instance.id(), "Generated mock");
        cache.insert(capability.to_string(), Arc::clone(&instance));

        Ok(instance)
    }

    /// Creates an uncached instance using `behavior` for every method.
    pub fn create_mock(&self, behavior: MockBehavior) -> Arc<MockInstance> {
        Arc::new(
            MockInstance::new(ANONYMOUS_CAPABILITY, self.config.default_policy.clone())
                .with_default_behavior(behavior),
        )
    }

    /// Creates an uncached instance returning the given value per method.
    pub fn create_mock_with_values<I, S>(&self, values: I) -> Arc<MockInstance>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let behaviors = values
            .into_iter()
            .map(|(method, value)| (method.into(), MockBehavior::Success(value)));

        let mut instance =
            MockInstance::new(ANONYMOUS_CAPABILITY, self.config.default_policy.clone())
                .with_behaviors(behaviors);
        if let Some(default) = self.config.default_behavior.clone() {
            instance = instance.with_default_behavior(default);
        }
        Arc::new(instance)
    }

    /// Drops every cached instance. Callers still holding an `Arc` keep a
    /// working mock, but it is no longer returned by the registry.
    pub fn reset_mocks(&self) {
        let mut cache = self.cache();
        info!(count = cache.len(), "Resetting all cached mocks");
        cache.clear();
    }

    /// Drops the cached instance for one capability. Returns true if one was cached.
    pub fn reset_mock(&self, capability: &str) -> bool {
        let removed = self.cache().remove(capability).is_some();
        debug!(capability, removed, "Resetting mock");
        removed
    }

    /// True when a cached instance exists for `capability`.
    pub fn is_cached(&self, capability: &str) -> bool {
        self.cache().contains_key(capability)
    }

    /// Number of cached instances.
    pub fn cached_count(&self) -> usize {
        self.cache().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockingbird_core::ErrorValue;
    use serde_json::json;

    #[test]
    fn test_generate_mock_is_cached_until_reset() {
        let registry = MockRegistry::new();

        let first = registry.generate_mock("Foo").unwrap();
        let second = registry.generate_mock("Foo").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        assert!(registry.reset_mock("Foo"));
        let third = registry.generate_mock("Foo").unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_ne!(first.id(), third.id());
    }

    #[test]
    fn test_reset_mocks_clears_cache_but_keeps_held_instances() {
        let registry = MockRegistry::new();
        let held = registry.generate_mock("Mailer").unwrap();
        registry.generate_mock("Clock").unwrap();
        assert_eq!(registry.cached_count(), 2);

        registry.reset_mocks();

        assert_eq!(registry.cached_count(), 0);
        assert!(!registry.is_cached("Mailer"));
        held.set_return_value("send", json!("queued"));
        assert_eq!(held.resolve_blocking("send", &[]).unwrap(), json!("queued"));
        assert!(!Arc::ptr_eq(&held, &registry.generate_mock("Mailer").unwrap()));
    }

    #[test]
    fn test_unregistered_capability_gets_generic_instance() {
        let registry = MockRegistry::new();
        let mock = registry.generate_mock("NeverDeclared").unwrap();

        assert_eq!(mock.capability(), "NeverDeclared");
        assert_eq!(mock.resolve_blocking("removeAll", &[]).unwrap(), json!(true));
    }

    #[test]
    fn test_blank_capability_fails() {
        let registry = MockRegistry::new();
        let err = registry.generate_mock("  ").unwrap_err();
        assert!(matches!(err, MockError::MockGenerationFailed { .. }));
        assert_eq!(registry.cached_count(), 0);
    }

    #[test]
    fn test_template_presets_behaviors() {
        let mut registry = MockRegistry::new();
        registry.register_template(
            CapabilityTemplate::new("WeatherApi")
                .methods(["forecast", "current"])
                .behavior("forecast", MockBehavior::success(json!({"temp": 21})))
                .behavior(
                    "current",
                    MockBehavior::failure(ErrorValue::network("offline")),
                ),
        );

        let mock = registry.generate_mock("WeatherApi").unwrap();
        assert_eq!(
            mock.resolve_blocking("forecast", &[]).unwrap(),
            json!({"temp": 21})
        );
        assert!(mock.resolve_blocking("current", &[]).is_err());
    }

    #[test]
    fn test_invalid_template_fails_generation() {
        let mut registry = MockRegistry::new();
        registry.register_template(
            CapabilityTemplate::new("Broken")
                .method("a")
                .behavior("b", MockBehavior::success(json!(1))),
        );
        registry.register_template(CapabilityTemplate::new("Dupes").methods(["a", "a"]));

        let err = registry.generate_mock("Broken").unwrap_err();
        assert!(err.to_string().contains("undeclared method b"));
        assert!(registry.generate_mock("Dupes").is_err());
        assert!(!registry.is_cached("Broken"));
    }

    #[test]
    fn test_generate_with_default_behavior_only_applies_on_creation() {
        let registry = MockRegistry::new();

        let mock = registry
            .generate_mock_with("Feed", MockBehavior::success(json!("first")))
            .unwrap();
        let again = registry
            .generate_mock_with("Feed", MockBehavior::success(json!("second")))
            .unwrap();

        assert!(Arc::ptr_eq(&mock, &again));
        assert_eq!(again.resolve_blocking("next", &[]).unwrap(), json!("first"));
    }

    #[test]
    fn test_create_mock_is_never_cached() {
        let registry = MockRegistry::new();

        let a = registry.create_mock(MockBehavior::success(json!(1)));
        let b = registry.create_mock(MockBehavior::success(json!(1)));

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.cached_count(), 0);
        assert_eq!(a.resolve_blocking("anything", &[]).unwrap(), json!(1));
        assert_eq!(a.call_count("anything"), 1);
        assert_eq!(b.call_count("anything"), 0);
    }

    #[test]
    fn test_create_mock_with_values() {
        let registry = MockRegistry::with_config(MockRegistryConfig {
            default_policy: DefaultPolicy::strict(),
            default_behavior: None,
        });

        let mock = registry.create_mock_with_values([
            ("name", json!("ana")),
            ("age", json!(31)),
        ]);

        assert_eq!(mock.resolve_blocking("name", &[]).unwrap(), json!("ana"));
        assert_eq!(mock.resolve_blocking("age", &[]).unwrap(), json!(31));
        assert!(matches!(
            mock.resolve_blocking("email", &[]),
            Err(MockError::NotConfigured { .. })
        ));
    }

    #[test]
    fn test_registry_config_from_settings() {
        let settings = mockingbird_core::MockSettings {
            strict_defaults: true,
        };
        let registry = MockRegistry::with_config(MockRegistryConfig::from_settings(&settings));

        let mock = registry.generate_mock("Repo").unwrap();
        assert!(mock.resolve_blocking("deleteUser", &[]).is_err());
    }
}
